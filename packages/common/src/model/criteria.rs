use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::default_true;
use super::{CriteriaId, UserRef};

/// A weighted scoring rubric judges mark against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(rename = "_id")]
    pub id: CriteriaId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_score: u32,
    /// Share of the round total, 0.0..=1.0.
    pub weight: f64,
    #[serde(default)]
    pub marking_guide: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Number of rounds using this criterion.
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
}

/// Body sent when creating or updating a criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaPayload {
    pub name: String,
    pub description: String,
    pub max_score: u32,
    pub weight: f64,
    pub marking_guide: String,
}
