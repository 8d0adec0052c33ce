use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use common::{
    Criteria, CriteriaId, CriteriaPayload, Round, RoundId, RoundPayload, Team, TeamId,
    TeamPayload, User, UserId,
};

use super::JudgingApi;
use crate::config::ApiConfig;
use crate::error::ApiError;

/// Success bodies arrive either bare or wrapped in `{ "data": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } | Envelope::Bare(data) => data,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `JudgingApi` over the backend's REST interface.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as a single
    /// path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "API request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        Ok(envelope.into_inner())
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        self.execute(self.request(Method::GET, url)).await
    }

    async fn send<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        self.execute(self.request(method, url).json(body)).await
    }
}

#[async_trait]
impl JudgingApi for HttpApi {
    #[instrument(skip(self))]
    async fn list_active_criteria(&self) -> Result<Vec<Criteria>, ApiError> {
        let mut url = self.url(&["api", "criteria"])?;
        url.query_pairs_mut().append_pair("isActive", "true");
        self.execute(self.request(Method::GET, url)).await
    }

    #[instrument(skip(self))]
    async fn get_criteria(&self, id: &CriteriaId) -> Result<Criteria, ApiError> {
        self.get(&["api", "criteria", id.as_str()]).await
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_criteria(&self, payload: &CriteriaPayload) -> Result<Criteria, ApiError> {
        self.send(Method::POST, &["api", "criteria"], payload).await
    }

    #[instrument(skip(self, payload))]
    async fn update_criteria(
        &self,
        id: &CriteriaId,
        payload: &CriteriaPayload,
    ) -> Result<Criteria, ApiError> {
        self.send(Method::PUT, &["api", "criteria", id.as_str()], payload).await
    }

    #[instrument(skip(self))]
    async fn get_round(&self, id: &RoundId) -> Result<Round, ApiError> {
        self.get(&["api", "rounds", id.as_str()]).await
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_round(&self, payload: &RoundPayload) -> Result<Round, ApiError> {
        self.send(Method::POST, &["api", "rounds"], payload).await
    }

    #[instrument(skip(self, payload))]
    async fn update_round(&self, id: &RoundId, payload: &RoundPayload) -> Result<Round, ApiError> {
        self.send(Method::PUT, &["api", "rounds", id.as_str()], payload).await
    }

    #[instrument(skip(self))]
    async fn get_team(&self, id: &TeamId) -> Result<Team, ApiError> {
        self.get(&["api", "teams", id.as_str()]).await
    }

    #[instrument(skip(self, payload), fields(team_name = %payload.team_name))]
    async fn create_team(&self, payload: &TeamPayload) -> Result<Team, ApiError> {
        self.send(Method::POST, &["api", "teams"], payload).await
    }

    #[instrument(skip(self, payload))]
    async fn update_team(&self, id: &TeamId, payload: &TeamPayload) -> Result<Team, ApiError> {
        self.send(Method::PUT, &["api", "teams", id.as_str()], payload).await
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: &UserId) -> Result<User, ApiError> {
        self.get(&["api", "users", id.as_str()]).await
    }
}
