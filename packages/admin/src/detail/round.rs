use std::fmt;

use common::Round;
use common::display::{active_badge, format_date, open_badge, progress_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundDetail {
    pub name: String,
    pub description: Option<String>,
    pub status: &'static str,
    pub availability: &'static str,
    pub starts: String,
    pub ends: String,
    /// Names of populated criteria, ids for the rest.
    pub criteria: Vec<String>,
    pub completion: String,
    /// Clamped width for the completion bar.
    pub progress_width: String,
    pub total_teams: u32,
    pub completed_evaluations: u32,
}

impl From<&Round> for RoundDetail {
    fn from(r: &Round) -> Self {
        let completion = if r.completion_percentage.is_finite() {
            format!("{:.0}%", r.completion_percentage)
        } else {
            "0%".to_string()
        };
        Self {
            name: r.name.clone(),
            description: r.description.clone().filter(|d| !d.trim().is_empty()),
            status: active_badge(r.is_active),
            availability: open_badge(r.is_open),
            starts: format_date(Some(&r.start_date)),
            ends: format_date(Some(&r.end_date)),
            criteria: r
                .criteria
                .iter()
                .map(|c| match c.criteria() {
                    Some(c) => c.name.clone(),
                    None => c.id().to_string(),
                })
                .collect(),
            completion,
            progress_width: progress_width(r.completion_percentage),
            total_teams: r.total_teams,
            completed_evaluations: r.completed_evaluations,
        }
    }
}

impl fmt::Display for RoundDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}] [{}]", self.name, self.status, self.availability)?;
        if let Some(description) = &self.description {
            writeln!(f, "{description}")?;
        }
        writeln!(f)?;
        writeln!(f, "Period:     {} - {}", self.starts, self.ends)?;
        writeln!(f, "Teams:      {}", self.total_teams)?;
        writeln!(f, "Evaluated:  {}", self.completed_evaluations)?;
        writeln!(f, "Progress:   {}", self.completion)?;
        writeln!(f)?;
        write!(f, "Criteria ({}):", self.criteria.len())?;
        for name in &self.criteria {
            write!(f, "\n  - {name}")?;
        }
        Ok(())
    }
}
