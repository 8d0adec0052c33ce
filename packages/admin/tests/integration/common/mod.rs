use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use admin::{AdminState, ApiError, JudgingApi, ToastLog};
use common::{
    Criteria, CriteriaId, CriteriaPayload, CriteriaRef, MemberRole, Role, Round, RoundId,
    RoundPayload, Team, TeamId, TeamMember, TeamPayload, User, UserId, UserRef,
    ValidationRules,
};

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// A call the forms made against the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListActiveCriteria,
    GetCriteria(CriteriaId),
    CreateCriteria(CriteriaPayload),
    UpdateCriteria(CriteriaId, CriteriaPayload),
    GetRound(RoundId),
    CreateRound(RoundPayload),
    UpdateRound(RoundId, RoundPayload),
    GetTeam(TeamId),
    CreateTeam(TeamPayload),
    UpdateTeam(TeamId, TeamPayload),
    GetUser(UserId),
}

/// How the next write should fail.
#[derive(Debug, Clone)]
pub enum Failure {
    Status(u16, Option<String>),
    Transport,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Failure::Status(status, message) => ApiError::Status {
                status: *status,
                message: message.clone(),
            },
            Failure::Transport => ApiError::Transport("connection refused".into()),
        }
    }
}

#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<Failure>>,
    active_criteria: Vec<Criteria>,
    delay: Option<Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active_criteria(mut self, list: Vec<Criteria>) -> Self {
        self.active_criteria = list;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every subsequent call fail.
    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than reads of the active criteria list.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::CreateCriteria(_)
                        | Call::UpdateCriteria(..)
                        | Call::CreateRound(_)
                        | Call::UpdateRound(..)
                        | Call::CreateTeam(_)
                        | Call::UpdateTeam(..)
                )
            })
            .collect()
    }

    async fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &*self.failure.lock().unwrap() {
            Some(f) => Err(f.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JudgingApi for MockApi {
    async fn list_active_criteria(&self) -> Result<Vec<Criteria>, ApiError> {
        self.record(Call::ListActiveCriteria).await?;
        Ok(self.active_criteria.clone())
    }

    async fn get_criteria(&self, id: &CriteriaId) -> Result<Criteria, ApiError> {
        self.record(Call::GetCriteria(id.clone())).await?;
        Ok(criteria(id.as_str(), "Fetched"))
    }

    async fn create_criteria(&self, payload: &CriteriaPayload) -> Result<Criteria, ApiError> {
        self.record(Call::CreateCriteria(payload.clone())).await?;
        Ok(criteria_from_payload("c-new", payload))
    }

    async fn update_criteria(
        &self,
        id: &CriteriaId,
        payload: &CriteriaPayload,
    ) -> Result<Criteria, ApiError> {
        self.record(Call::UpdateCriteria(id.clone(), payload.clone()))
            .await?;
        Ok(criteria_from_payload(id.as_str(), payload))
    }

    async fn get_round(&self, id: &RoundId) -> Result<Round, ApiError> {
        self.record(Call::GetRound(id.clone())).await?;
        Ok(round(id.as_str(), vec![]))
    }

    async fn create_round(&self, payload: &RoundPayload) -> Result<Round, ApiError> {
        self.record(Call::CreateRound(payload.clone())).await?;
        Ok(round_from_payload("r-new", payload))
    }

    async fn update_round(&self, id: &RoundId, payload: &RoundPayload) -> Result<Round, ApiError> {
        self.record(Call::UpdateRound(id.clone(), payload.clone()))
            .await?;
        Ok(round_from_payload(id.as_str(), payload))
    }

    async fn get_team(&self, id: &TeamId) -> Result<Team, ApiError> {
        self.record(Call::GetTeam(id.clone())).await?;
        Ok(team(id.as_str()))
    }

    async fn create_team(&self, payload: &TeamPayload) -> Result<Team, ApiError> {
        self.record(Call::CreateTeam(payload.clone())).await?;
        Ok(team_from_payload("t-new", payload))
    }

    async fn update_team(&self, id: &TeamId, payload: &TeamPayload) -> Result<Team, ApiError> {
        self.record(Call::UpdateTeam(id.clone(), payload.clone()))
            .await?;
        Ok(team_from_payload(id.as_str(), payload))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, ApiError> {
        self.record(Call::GetUser(id.clone())).await?;
        Ok(judge(id.as_str()))
    }
}

/// State wired to `api`, with toasts captured in the returned log.
pub fn test_state(api: Arc<MockApi>) -> (AdminState, Arc<ToastLog>) {
    test_state_with_rules(api, ValidationRules::default())
}

pub fn test_state_with_rules(
    api: Arc<MockApi>,
    rules: ValidationRules,
) -> (AdminState, Arc<ToastLog>) {
    let toasts = Arc::new(ToastLog::new());
    let state = AdminState::new(api, toasts.clone(), rules);
    (state, toasts)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn criteria(id: &str, name: &str) -> Criteria {
    Criteria {
        id: CriteriaId::new(id),
        name: name.to_string(),
        description: format!("{name} of the submitted project"),
        max_score: 20,
        weight: 0.25,
        marking_guide: "Award full marks when the work is exemplary".to_string(),
        is_active: true,
        usage_count: 2,
        created_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 2, 3, 16, 45, 0).unwrap()),
        created_by: Some(UserRef::Populated {
            id: UserId::new("u-admin"),
            username: "admin".into(),
            email: None,
        }),
    }
}

fn criteria_from_payload(id: &str, p: &CriteriaPayload) -> Criteria {
    Criteria {
        name: p.name.clone(),
        description: p.description.clone(),
        max_score: p.max_score,
        weight: p.weight,
        marking_guide: p.marking_guide.clone(),
        usage_count: 0,
        ..criteria(id, &p.name)
    }
}

pub fn round(id: &str, criteria: Vec<CriteriaRef>) -> Round {
    Round {
        id: RoundId::new(id),
        name: "Semi-finals".into(),
        description: Some("Second judging round".into()),
        start_date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, 5, 3, 17, 30, 0).unwrap(),
        criteria,
        is_active: true,
        is_open: false,
        completion_percentage: 40.0,
        total_teams: 12,
        completed_evaluations: 15,
        created_by: None,
    }
}

fn round_from_payload(id: &str, p: &RoundPayload) -> Round {
    Round {
        name: p.name.clone(),
        description: p.description.clone(),
        start_date: p.start_date,
        end_date: p.end_date,
        criteria: p.criteria.iter().cloned().map(CriteriaRef::Id).collect(),
        ..round(id, vec![])
    }
}

pub fn member(name: &str, number: &str, role: MemberRole) -> TeamMember {
    TeamMember {
        name: name.into(),
        student_number: number.into(),
        email: format!("{}@students.example.edu", name.to_lowercase()),
        role,
    }
}

pub fn team(id: &str) -> Team {
    Team {
        id: TeamId::new(id),
        team_name: "Null Pointers".into(),
        team_number: 7,
        project_title: "Smart Parking".into(),
        project_description: None,
        members: vec![
            member("Ayanda", "20230001", MemberRole::Leader),
            member("Bongani", "20230002", MemberRole::Member),
            member("Chloe", "20230003", MemberRole::Member),
        ],
    }
}

fn team_from_payload(id: &str, p: &TeamPayload) -> Team {
    Team {
        id: TeamId::new(id),
        team_name: p.team_name.clone(),
        team_number: p.team_number,
        project_title: p.project_title.clone(),
        project_description: p.project_description.clone(),
        members: p.members.clone(),
    }
}

pub fn judge(id: &str) -> User {
    User {
        id: UserId::new(id),
        username: "judge.mokoena".into(),
        email: "mokoena@example.com".into(),
        role: Role::Judge,
        is_active: true,
        judge_info: None,
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()),
        last_login: None,
        created_by: Some(UserRef::Id(UserId::new("u-admin"))),
    }
}

// ---------------------------------------------------------------------------
// Fake HTTP backend
// ---------------------------------------------------------------------------

/// A request the fake backend received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path_and_query: String,
    pub authorization: Option<String>,
    pub body: Value,
}

type RequestLog = Arc<Mutex<Vec<Recorded>>>;

/// A running fake backend.
pub struct FakeBackend {
    pub addr: SocketAddr,
    log: RequestLog,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let log: RequestLog = Arc::default();
        let app = Router::new().fallback(respond).with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, log }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }
}

fn criteria_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": "Originality of the idea",
        "maxScore": 20,
        "weight": 0.2,
        "markingGuide": "Full marks for a novel approach",
        "isActive": true,
        "usageCount": 1,
        "createdBy": {"_id": "u1", "username": "admin"}
    })
}

async fn respond(
    State(log): State<RequestLog>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|p| p.to_string())
        .unwrap_or_default();
    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path_and_query: path_and_query.clone(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: parsed.clone(),
    });

    match (method, uri.path()) {
        (Method::GET, "/health") => (StatusCode::OK, "ok").into_response(),
        (Method::GET, "/slow") => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            (StatusCode::OK, "late").into_response()
        }
        (Method::GET, "/maintenance") => {
            (StatusCode::SERVICE_UNAVAILABLE, "down").into_response()
        }
        (Method::GET, "/api/criteria") => axum::Json(json!({
            "success": true,
            "data": [criteria_json("c1", "Innovation"), criteria_json("c2", "Impact")]
        }))
        .into_response(),
        (Method::GET, "/api/criteria/missing") => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"message": "Criteria not found"})),
        )
            .into_response(),
        (Method::GET, path) if path.starts_with("/api/criteria/") => {
            let id = path.trim_start_matches("/api/criteria/");
            axum::Json(criteria_json(id, "Innovation")).into_response()
        }
        (Method::POST, "/api/criteria") => {
            if parsed["name"] == "Duplicate" {
                return (
                    StatusCode::CONFLICT,
                    axum::Json(json!({"message": "Criteria with this name already exists"})),
                )
                    .into_response();
            }
            let mut created = parsed;
            created["_id"] = json!("c-created");
            (StatusCode::CREATED, axum::Json(json!({ "data": created }))).into_response()
        }
        (Method::PUT, path) if path.starts_with("/api/criteria/") => {
            let mut updated = parsed;
            updated["_id"] = json!(path.trim_start_matches("/api/criteria/"));
            axum::Json(updated).into_response()
        }
        (Method::POST, "/api/rounds") => {
            (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
        }
        (Method::GET, path) if path.starts_with("/api/users/") => axum::Json(json!({
            "_id": path.trim_start_matches("/api/users/"),
            "username": "root",
            "email": "root@example.com",
            "role": "admin",
            "lastLogin": "2024-06-01T12:00:00Z"
        }))
        .into_response(),
        (Method::GET, "/api/teams/garbled") => {
            axum::Json(json!({"unexpected": true})).into_response()
        }
        _ => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({"message": "Route not found"})),
        )
            .into_response(),
    }
}
