use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::default_true;
use super::{Criteria, CriteriaId, RoundId, UserRef};

/// A time-boxed judging phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    #[serde(rename = "_id")]
    pub id: RoundId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub criteria: Vec<CriteriaRef>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_open: bool,
    /// Percentage of expected evaluations submitted, nominally 0..=100.
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub total_teams: u32,
    #[serde(default)]
    pub completed_evaluations: u32,
    #[serde(default)]
    pub created_by: Option<UserRef>,
}

/// Criterion attached to a round, populated or bare.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaRef {
    Populated(Box<Criteria>),
    Id(CriteriaId),
}

impl CriteriaRef {
    pub fn id(&self) -> &CriteriaId {
        match self {
            Self::Populated(c) => &c.id,
            Self::Id(id) => id,
        }
    }

    pub fn criteria(&self) -> Option<&Criteria> {
        match self {
            Self::Populated(c) => Some(c),
            Self::Id(_) => None,
        }
    }
}

/// Body sent when creating or updating a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub criteria: Vec<CriteriaId>,
}
