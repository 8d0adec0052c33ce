use std::fmt;

use common::display::{active_badge, format_date, format_date_or};
use common::{JudgeInfo, Role, User};

use super::creator_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetail {
    pub username: String,
    pub email: String,
    pub role: &'static str,
    pub status: &'static str,
    /// Present only for judges.
    pub judge_info: Option<JudgeInfoLines>,
    pub created_at: String,
    pub last_login: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgeInfoLines {
    pub company: String,
    pub position: String,
    pub experience: String,
}

impl From<&JudgeInfo> for JudgeInfoLines {
    fn from(info: &JudgeInfo) -> Self {
        let or_na = |v: &Option<String>| {
            v.as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("N/A")
                .to_string()
        };
        Self {
            company: or_na(&info.company),
            position: or_na(&info.position),
            experience: or_na(&info.experience),
        }
    }
}

impl From<&User> for UserDetail {
    fn from(u: &User) -> Self {
        let judge_info = match u.role {
            Role::Judge => Some(
                u.judge_info
                    .as_ref()
                    .map(JudgeInfoLines::from)
                    .unwrap_or_else(|| JudgeInfoLines::from(&JudgeInfo::default())),
            ),
            Role::Admin => None,
        };
        Self {
            username: u.username.clone(),
            email: u.email.clone(),
            role: u.role.label(),
            status: active_badge(u.is_active),
            judge_info,
            created_at: format_date(u.created_at.as_ref()),
            last_login: format_date_or(u.last_login.as_ref(), "Never"),
            created_by: creator_name(u.created_by.as_ref()),
        }
    }
}

impl fmt::Display for UserDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} <{}>", self.username, self.email)?;
        writeln!(f, "[{}] [{}]", self.role, self.status)?;
        if let Some(info) = &self.judge_info {
            writeln!(f)?;
            writeln!(f, "Company:    {}", info.company)?;
            writeln!(f, "Position:   {}", info.position)?;
            writeln!(f, "Experience: {}", info.experience)?;
        }
        writeln!(f)?;
        writeln!(f, "Created:    {} by {}", self.created_at, self.created_by)?;
        write!(f, "Last login: {}", self.last_login)
    }
}
