use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Account role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Judge,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Judge => "judge",
        }
    }

    /// Badge text shown on detail views.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::Judge => "Judge",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "judge" => Ok(Self::Judge),
            _ => Err(format!("Invalid role '{s}'. Must be 'admin' or 'judge'")),
        }
    }
}

/// Professional background recorded for judges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeInfo {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    /// Free-form experience description, e.g. "5 years".
    #[serde(default)]
    pub experience: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub judge_info: Option<JudgeInfo>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
}

pub(crate) fn default_true() -> bool {
    true
}

/// Reference to a user as the backend returns it: either populated with
/// display fields, or just the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated {
        #[serde(rename = "_id")]
        id: UserId,
        username: String,
        #[serde(default)]
        email: Option<String>,
    },
    Id(UserId),
}

impl UserRef {
    pub fn id(&self) -> &UserId {
        match self {
            Self::Populated { id, .. } | Self::Id(id) => id,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Populated { username, .. } => Some(username),
            Self::Id(_) => None,
        }
    }
}
