use axum::http::Method;
use chrono::{TimeZone, Utc};

use admin::{ApiConfig, ApiError, HttpApi, JudgingApi};
use common::{CriteriaId, CriteriaPayload, Role, RoundPayload, TeamId, UserId};

use crate::common::FakeBackend;

fn client(backend: &FakeBackend, token: Option<&str>) -> HttpApi {
    HttpApi::new(&ApiConfig {
        base_url: format!("{}/", backend.url("")),
        timeout_secs: 5,
        token: token.map(String::from),
    })
    .expect("client builds")
}

fn payload(name: &str) -> CriteriaPayload {
    CriteriaPayload {
        name: name.into(),
        description: "Originality of the idea".into(),
        max_score: 50,
        weight: 0.3,
        marking_guide: "Full marks for novel work".into(),
    }
}

#[tokio::test]
async fn lists_active_criteria_from_wrapped_body() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    let list = api.list_active_criteria().await.unwrap();
    let names: Vec<_> = list.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Innovation", "Impact"]);
    assert_eq!(list[0].created_by.as_ref().unwrap().username(), Some("admin"));

    let requests = backend.requests();
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].path_and_query, "/api/criteria?isActive=true");
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn decodes_bare_body_and_sends_token() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, Some("s3cret"));

    let c = api.get_criteria(&CriteriaId::new("c42")).await.unwrap();
    assert_eq!(c.id.as_str(), "c42");
    assert_eq!(c.max_score, 20);

    let requests = backend.requests();
    assert_eq!(requests[0].path_and_query, "/api/criteria/c42");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer s3cret"));
}

#[tokio::test]
async fn create_posts_camel_case_payload() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    let created = api.create_criteria(&payload("Innovation")).await.unwrap();
    assert_eq!(created.id.as_str(), "c-created");
    assert_eq!(created.usage_count, 0);
    assert!(created.is_active);

    let body = &backend.requests()[0].body;
    assert_eq!(body["maxScore"], 50);
    assert_eq!(body["markingGuide"], "Full marks for novel work");
}

#[tokio::test]
async fn update_puts_to_entity_path() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    let updated = api
        .update_criteria(&CriteriaId::new("c7"), &payload("Impact"))
        .await
        .unwrap();
    assert_eq!(updated.id.as_str(), "c7");
    assert_eq!(updated.name, "Impact");

    let request = &backend.requests()[0];
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path_and_query, "/api/criteria/c7");
}

#[tokio::test]
async fn error_message_is_extracted() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    let err = api.create_criteria(&payload("Duplicate")).await.unwrap_err();
    match &err {
        ApiError::Status { status, .. } => assert_eq!(*status, 409),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.server_message(), Some("Criteria with this name already exists"));

    let err = api.get_criteria(&CriteriaId::new("missing")).await.unwrap_err();
    assert_eq!(err.server_message(), Some("Criteria not found"));
}

#[tokio::test]
async fn plain_text_error_has_no_message() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    let err = api
        .create_round(&RoundPayload {
            name: "Finals".into(),
            description: None,
            start_date: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap(),
            criteria: vec![CriteriaId::new("c1")],
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Status {
            status: 500,
            message: None
        }
    ));
    assert_eq!(err.server_message(), None);
    assert!(backend.requests()[0].body.get("description").is_none());
}

#[tokio::test]
async fn unexpected_shape_is_a_decode_error() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    let err = api.get_team(&TeamId::new("garbled")).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn user_is_decoded_with_optional_fields_missing() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    let user = api.get_user(&UserId::new("u1")).await.unwrap();
    assert_eq!(user.username, "root");
    assert_eq!(user.role, Role::Admin);
    assert!(user.is_active);
    assert!(user.judge_info.is_none());
    assert_eq!(
        user.last_login,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let api = HttpApi::new(&ApiConfig {
        base_url: "http://127.0.0.1:1".into(),
        timeout_secs: 2,
        token: None,
    })
    .unwrap();
    let err = api.get_user(&UserId::new("u1")).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn ids_are_encoded_as_one_path_segment() {
    let backend = FakeBackend::spawn().await;
    let api = client(&backend, None);

    api.get_criteria(&CriteriaId::new("a/b?c")).await.unwrap();
    api.update_criteria(&CriteriaId::new("x#1"), &payload("Impact"))
        .await
        .unwrap();

    let requests = backend.requests();
    assert_eq!(requests[0].path_and_query, "/api/criteria/a%2Fb%3Fc");
    assert_eq!(requests[1].path_and_query, "/api/criteria/x%231");
}

#[tokio::test]
async fn base_path_prefix_is_kept() {
    let backend = FakeBackend::spawn().await;
    let api = HttpApi::new(&ApiConfig {
        base_url: backend.url("/proxy"),
        timeout_secs: 5,
        token: None,
    })
    .unwrap();

    let _ = api.get_user(&UserId::new("u1")).await;
    assert_eq!(backend.requests()[0].path_and_query, "/proxy/api/users/u1");
}

#[test]
fn malformed_base_url_is_rejected() {
    for base_url in ["not a url", "mailto:admin@uni.example.edu"] {
        let err = HttpApi::new(&ApiConfig {
            base_url: base_url.into(),
            timeout_secs: 5,
            token: None,
        })
        .err()
        .expect("base url rejected");
        assert!(matches!(err, ApiError::InvalidUrl(_)), "got {err:?}");
    }
}
