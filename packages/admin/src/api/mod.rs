pub mod http;

use async_trait::async_trait;
use common::{
    Criteria, CriteriaId, CriteriaPayload, Round, RoundId, RoundPayload, Team, TeamId,
    TeamPayload, User, UserId,
};

use crate::error::ApiError;

pub use http::HttpApi;

/// Operations the admin client needs from the judging backend.
#[async_trait]
pub trait JudgingApi: Send + Sync {
    /// Criteria currently available for new rounds.
    async fn list_active_criteria(&self) -> Result<Vec<Criteria>, ApiError>;

    async fn get_criteria(&self, id: &CriteriaId) -> Result<Criteria, ApiError>;

    async fn create_criteria(&self, payload: &CriteriaPayload) -> Result<Criteria, ApiError>;

    async fn update_criteria(
        &self,
        id: &CriteriaId,
        payload: &CriteriaPayload,
    ) -> Result<Criteria, ApiError>;

    async fn get_round(&self, id: &RoundId) -> Result<Round, ApiError>;

    async fn create_round(&self, payload: &RoundPayload) -> Result<Round, ApiError>;

    async fn update_round(&self, id: &RoundId, payload: &RoundPayload) -> Result<Round, ApiError>;

    async fn get_team(&self, id: &TeamId) -> Result<Team, ApiError>;

    async fn create_team(&self, payload: &TeamPayload) -> Result<Team, ApiError>;

    async fn update_team(&self, id: &TeamId, payload: &TeamPayload) -> Result<Team, ApiError>;

    async fn get_user(&self, id: &UserId) -> Result<User, ApiError>;
}
