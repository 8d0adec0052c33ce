use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TeamId;

/// Role of a student within a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Leader,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leader" => Ok(Self::Leader),
            "member" => Ok(Self::Member),
            _ => Err(format!(
                "Invalid member role '{s}'. Must be 'leader' or 'member'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub name: String,
    pub student_number: String,
    pub email: String,
    pub role: MemberRole,
}

/// A group of students evaluated within rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: TeamId,
    pub team_name: String,
    pub team_number: u32,
    pub project_title: String,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

/// Body sent when creating or updating a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    pub team_name: String,
    pub team_number: u32,
    pub project_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_description: Option<String>,
    pub members: Vec<TeamMember>,
}
