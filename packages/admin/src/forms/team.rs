use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use common::validation::{
    int_range, is_email, is_student_number, length_between, max_length, required,
    required_length,
};
use common::{
    FieldErrors, MemberRole, Team, TeamId, TeamMember, TeamPayload, ValidationRules,
};

use super::{FormMode, SubmitOutcome, SubmitState, non_blank, reject, report_failure};
use crate::cache::QueryKey;
use crate::state::AdminState;

pub const LEADER_COUNT: &str = "Team must have exactly one leader";
pub const INCOMPLETE_MEMBER: &str = "All members must have name, student number, and email";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberDraft {
    pub name: String,
    pub student_number: String,
    pub email: String,
    pub role: Option<MemberRole>,
}

impl MemberDraft {
    pub fn with_role(role: MemberRole) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.student_number.trim().is_empty()
            && !self.email.trim().is_empty()
    }
}

impl From<&TeamMember> for MemberDraft {
    fn from(m: &TeamMember) -> Self {
        Self {
            name: m.name.clone(),
            student_number: m.student_number.clone(),
            email: m.email.clone(),
            role: Some(m.role),
        }
    }
}

/// Editable copy of a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamDraft {
    pub team_name: String,
    pub team_number: Option<i64>,
    pub project_title: String,
    pub project_description: String,
    pub members: Vec<MemberDraft>,
}

impl TeamDraft {
    /// Blank draft with one leader followed by `count - 1` members.
    pub fn seeded(count: usize) -> Self {
        let members = (0..count)
            .map(|i| {
                MemberDraft::with_role(if i == 0 {
                    MemberRole::Leader
                } else {
                    MemberRole::Member
                })
            })
            .collect();
        Self {
            members,
            ..Default::default()
        }
    }

    pub fn leader_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role == Some(MemberRole::Leader))
            .count()
    }

    /// First team-level rule the draft breaks, checked after field
    /// validation.
    pub fn team_rule_violation(&self) -> Option<&'static str> {
        if self.leader_count() != 1 {
            return Some(LEADER_COUNT);
        }
        if !self.members.iter().all(MemberDraft::is_complete) {
            return Some(INCOMPLETE_MEMBER);
        }
        None
    }
}

impl From<&Team> for TeamDraft {
    fn from(t: &Team) -> Self {
        Self {
            team_name: t.team_name.clone(),
            team_number: Some(i64::from(t.team_number)),
            project_title: t.project_title.clone(),
            project_description: t.project_description.clone().unwrap_or_default(),
            members: t.members.iter().map(MemberDraft::from).collect(),
        }
    }
}

pub struct TeamForm {
    rules: Arc<ValidationRules>,
    mode: FormMode<TeamId>,
    initial: TeamDraft,
    draft: TeamDraft,
    open: bool,
    submit_state: SubmitState,
}

impl TeamForm {
    /// Blank form seeded with one leader and two members.
    pub fn new(rules: Arc<ValidationRules>) -> Self {
        let draft = TeamDraft::seeded(rules.seed_member_count());
        Self {
            rules,
            mode: FormMode::Create,
            initial: draft.clone(),
            draft,
            open: true,
            submit_state: SubmitState::default(),
        }
    }

    pub fn edit(rules: Arc<ValidationRules>, team: &Team) -> Self {
        let draft = TeamDraft::from(team);
        Self {
            rules,
            mode: FormMode::Edit(team.id.clone()),
            initial: draft.clone(),
            draft,
            open: true,
            submit_state: SubmitState::default(),
        }
    }

    pub fn mode(&self) -> &FormMode<TeamId> {
        &self.mode
    }

    pub fn draft(&self) -> &TeamDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TeamDraft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: TeamDraft) {
        self.draft = draft;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.draft = self.initial.clone();
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state.clone()
    }

    pub fn member_count(&self) -> usize {
        self.draft.members.len()
    }

    pub fn can_add_member(&self) -> bool {
        self.member_count() < self.rules.max_team_members
    }

    pub fn can_remove_member(&self) -> bool {
        self.member_count() > self.rules.min_team_members
    }

    /// Append a blank member. No-op at the maximum.
    pub fn add_member(&mut self) -> bool {
        if !self.can_add_member() {
            return false;
        }
        self.draft
            .members
            .push(MemberDraft::with_role(MemberRole::Member));
        true
    }

    /// Remove the member at `index`. No-op at or below the minimum.
    pub fn remove_member(&mut self, index: usize) -> bool {
        if !self.can_remove_member() || index >= self.member_count() {
            return false;
        }
        self.draft.members.remove(index);
        true
    }

    /// Move the member at `from` to position `to`.
    pub fn move_member(&mut self, from: usize, to: usize) -> bool {
        let len = self.member_count();
        if from >= len || to >= len {
            return false;
        }
        let member = self.draft.members.remove(from);
        self.draft.members.insert(to, member);
        true
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut MemberDraft> {
        self.draft.members.get_mut(index)
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let rules = &self.rules;
        let d = &self.draft;
        let mut errors = FieldErrors::new();

        errors.check(
            "teamName",
            required_length(
                &d.team_name,
                "Team name",
                rules.team_name_min_length,
                rules.team_name_max_length,
            ),
        );
        errors.check(
            "teamNumber",
            int_range(
                d.team_number,
                "Team number",
                i64::from(rules.team.team_number_min),
                i64::from(rules.team.team_number_max),
            ),
        );
        errors.check(
            "projectTitle",
            required_length(
                &d.project_title,
                "Project title",
                rules.project_title_min_length,
                rules.project_title_max_length,
            ),
        );
        errors.check(
            "projectDescription",
            max_length(
                &d.project_description,
                "Project description",
                rules.description_max_length,
            ),
        );

        let count = d.members.len();
        if count < rules.min_team_members {
            errors.insert(
                "members",
                format!("Team must have at least {} members", rules.min_team_members),
            );
        } else if count > rules.max_team_members {
            errors.insert(
                "members",
                format!("Team cannot have more than {} members", rules.max_team_members),
            );
        }

        for (i, m) in d.members.iter().enumerate() {
            let key = |field: &str| format!("members[{i}].{field}");

            errors.check(key("name"), required(&m.name, "Member name"));
            errors.check(
                key("name"),
                length_between(&m.name, "Name", rules.team.member_name_min_length, usize::MAX),
            );

            errors.check(key("studentNumber"), required(&m.student_number, "Student number"));
            if !m.student_number.trim().is_empty() && !is_student_number(m.student_number.trim()) {
                errors.insert(key("studentNumber"), "Student number must be exactly 8 digits");
            }

            errors.check(key("email"), required(&m.email, "Email"));
            if !m.email.trim().is_empty() && !is_email(m.email.trim()) {
                errors.insert(key("email"), "Invalid email address");
            }

            if m.role.is_none() {
                errors.insert(key("role"), "Role is required");
            }
        }

        errors.into_result()
    }

    #[instrument(skip_all, fields(mode = self.mode.action()))]
    pub async fn submit(&mut self, state: &AdminState) -> SubmitOutcome<Team> {
        if let Err(errors) = self.validate() {
            debug!(%errors, "Team form invalid");
            return SubmitOutcome::Invalid(errors);
        }
        if let Some(message) = self.draft.team_rule_violation() {
            return reject(state, message);
        }

        let d = &self.draft;
        let payload = TeamPayload {
            team_name: d.team_name.trim().to_string(),
            team_number: d.team_number.unwrap_or_default() as u32,
            project_title: d.project_title.trim().to_string(),
            project_description: non_blank(&d.project_description),
            members: d
                .members
                .iter()
                .map(|m| TeamMember {
                    name: m.name.trim().to_string(),
                    student_number: m.student_number.trim().to_string(),
                    email: m.email.trim().to_string(),
                    role: m.role.unwrap_or(MemberRole::Member),
                })
                .collect(),
        };

        let Some(_in_flight) = self.submit_state.begin() else {
            return SubmitOutcome::Busy;
        };

        let result = match &self.mode {
            FormMode::Create => state.api.create_team(&payload).await,
            FormMode::Edit(id) => state.api.update_team(id, &payload).await,
        };

        match result {
            Ok(team) => {
                state.cache.invalidate(QueryKey::Teams);
                info!(id = %team.id, team_name = %team.team_name, "Team saved");
                state
                    .notifier
                    .success(&format!("Team {} successfully", self.mode.past_tense()));
                self.close();
                SubmitOutcome::Saved(team)
            }
            Err(e) => {
                let fallback = format!("Failed to {} team", self.mode.action());
                SubmitOutcome::Failed(report_failure(state, &e, &fallback))
            }
        }
    }
}
