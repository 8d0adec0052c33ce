use std::fmt;

use common::Criteria;
use common::display::{active_badge, format_date, weight_percent};

use super::creator_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaDetail {
    pub name: String,
    pub status: &'static str,
    pub description: String,
    pub max_score: u32,
    pub weight: String,
    pub marking_guide: String,
    pub usage: String,
    pub created_at: String,
    pub updated_at: String,
    pub created_by: String,
}

impl From<&Criteria> for CriteriaDetail {
    fn from(c: &Criteria) -> Self {
        let usage = match c.usage_count {
            1 => "Used in 1 round".to_string(),
            n => format!("Used in {n} rounds"),
        };
        Self {
            name: c.name.clone(),
            status: active_badge(c.is_active),
            description: c.description.clone(),
            max_score: c.max_score,
            weight: weight_percent(c.weight),
            marking_guide: c.marking_guide.clone(),
            usage,
            created_at: format_date(c.created_at.as_ref()),
            updated_at: format_date(c.updated_at.as_ref()),
            created_by: creator_name(c.created_by.as_ref()),
        }
    }
}

impl fmt::Display for CriteriaDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.name, self.status)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f)?;
        writeln!(f, "Max score:  {}", self.max_score)?;
        writeln!(f, "Weight:     {}", self.weight)?;
        writeln!(f, "Usage:      {}", self.usage)?;
        writeln!(f)?;
        writeln!(f, "Marking guide:")?;
        writeln!(f, "{}", self.marking_guide)?;
        writeln!(f)?;
        writeln!(f, "Created:    {} by {}", self.created_at, self.created_by)?;
        write!(f, "Updated:    {}", self.updated_at)
    }
}
