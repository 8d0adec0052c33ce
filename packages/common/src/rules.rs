use serde::Deserialize;
use thiserror::Error;

/// Bounds the criteria form applies on top of the shared rule set.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CriteriaBounds {
    /// Default: 10.
    #[serde(default = "default_criteria_description_min")]
    pub description_min_length: usize,
    /// Default: 500.
    #[serde(default = "default_criteria_description_max")]
    pub description_max_length: usize,
    /// Default: 20.
    #[serde(default = "default_marking_guide_min")]
    pub marking_guide_min_length: usize,
    /// Default: 2000.
    #[serde(default = "default_marking_guide_max")]
    pub marking_guide_max_length: usize,
}

fn default_criteria_description_min() -> usize {
    10
}
fn default_criteria_description_max() -> usize {
    500
}
fn default_marking_guide_min() -> usize {
    20
}
fn default_marking_guide_max() -> usize {
    2000
}

impl Default for CriteriaBounds {
    fn default() -> Self {
        Self {
            description_min_length: default_criteria_description_min(),
            description_max_length: default_criteria_description_max(),
            marking_guide_min_length: default_marking_guide_min(),
            marking_guide_max_length: default_marking_guide_max(),
        }
    }
}

/// Bounds the round form applies on top of the shared rule set.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RoundBounds {
    /// Default: 3.
    #[serde(default = "default_round_name_min")]
    pub name_min_length: usize,
    /// Default: 100.
    #[serde(default = "default_round_name_max")]
    pub name_max_length: usize,
    /// Default: 500.
    #[serde(default = "default_round_description_max")]
    pub description_max_length: usize,
}

fn default_round_name_min() -> usize {
    3
}
fn default_round_name_max() -> usize {
    100
}
fn default_round_description_max() -> usize {
    500
}

impl Default for RoundBounds {
    fn default() -> Self {
        Self {
            name_min_length: default_round_name_min(),
            name_max_length: default_round_name_max(),
            description_max_length: default_round_description_max(),
        }
    }
}

/// Bounds the team form applies on top of the shared rule set.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TeamBounds {
    /// Default: 1.
    #[serde(default = "default_team_number_min")]
    pub team_number_min: u32,
    /// Default: 15.
    #[serde(default = "default_team_number_max")]
    pub team_number_max: u32,
    /// Default: 2.
    #[serde(default = "default_member_name_min")]
    pub member_name_min_length: usize,
}

fn default_team_number_min() -> u32 {
    1
}
fn default_team_number_max() -> u32 {
    15
}
fn default_member_name_min() -> usize {
    2
}

impl Default for TeamBounds {
    fn default() -> Self {
        Self {
            team_number_min: default_team_number_min(),
            team_number_max: default_team_number_max(),
            member_name_min_length: default_member_name_min(),
        }
    }
}

/// Validation rule set handed to every form at construction.
///
/// The top-level fields are the shared constants. `criteria`, `round` and
/// `team` hold the bounds each form owns. The two groups are independent:
/// neither one overrides the other.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ValidationRules {
    /// Default: 3.
    #[serde(default = "default_team_name_min")]
    pub team_name_min_length: usize,
    /// Default: 50.
    #[serde(default = "default_team_name_max")]
    pub team_name_max_length: usize,
    /// Upper bound for a criterion's max score. Default: 100.
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    /// Default: 2.
    #[serde(default = "default_min_team_members")]
    pub min_team_members: usize,
    /// Default: 5.
    #[serde(default = "default_max_team_members")]
    pub max_team_members: usize,
    /// Default: 5.
    #[serde(default = "default_project_title_min")]
    pub project_title_min_length: usize,
    /// Default: 200.
    #[serde(default = "default_project_title_max")]
    pub project_title_max_length: usize,
    /// Default: 1000.
    #[serde(default = "default_description_max")]
    pub description_max_length: usize,
    #[serde(default)]
    pub criteria: CriteriaBounds,
    #[serde(default)]
    pub round: RoundBounds,
    #[serde(default)]
    pub team: TeamBounds,
}

fn default_team_name_min() -> usize {
    3
}
fn default_team_name_max() -> usize {
    50
}
fn default_max_score() -> u32 {
    100
}
fn default_min_team_members() -> usize {
    2
}
fn default_max_team_members() -> usize {
    5
}
fn default_project_title_min() -> usize {
    5
}
fn default_project_title_max() -> usize {
    200
}
fn default_description_max() -> usize {
    1000
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            team_name_min_length: default_team_name_min(),
            team_name_max_length: default_team_name_max(),
            max_score: default_max_score(),
            min_team_members: default_min_team_members(),
            max_team_members: default_max_team_members(),
            project_title_min_length: default_project_title_min(),
            project_title_max_length: default_project_title_max(),
            description_max_length: default_description_max(),
            criteria: CriteriaBounds::default(),
            round: RoundBounds::default(),
            team: TeamBounds::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RulesError {
    #[error("{name}: minimum {min} exceeds maximum {max}")]
    InvertedBounds {
        name: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl ValidationRules {
    /// Reject rule sets no form could ever satisfy.
    pub fn check(&self) -> Result<(), RulesError> {
        if self.max_score == 0 {
            return Err(RulesError::Zero("max_score"));
        }
        if self.min_team_members == 0 {
            return Err(RulesError::Zero("min_team_members"));
        }

        let pairs = [
            (
                "team_name_length",
                self.team_name_min_length,
                self.team_name_max_length,
            ),
            (
                "team_members",
                self.min_team_members,
                self.max_team_members,
            ),
            (
                "project_title_length",
                self.project_title_min_length,
                self.project_title_max_length,
            ),
            (
                "criteria.description_length",
                self.criteria.description_min_length,
                self.criteria.description_max_length,
            ),
            (
                "criteria.marking_guide_length",
                self.criteria.marking_guide_min_length,
                self.criteria.marking_guide_max_length,
            ),
            (
                "round.name_length",
                self.round.name_min_length,
                self.round.name_max_length,
            ),
            (
                "team.team_number",
                self.team.team_number_min as usize,
                self.team.team_number_max as usize,
            ),
        ];
        for (name, min, max) in pairs {
            if min > max {
                return Err(RulesError::InvertedBounds { name, min, max });
            }
        }
        Ok(())
    }

    /// Number of members a new team form starts with: one leader and two
    /// members, squeezed into the configured bounds.
    pub fn seed_member_count(&self) -> usize {
        3usize
            .max(self.min_team_members)
            .min(self.max_team_members.max(1))
    }
}
