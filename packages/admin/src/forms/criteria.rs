use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use common::display::weight_percent;
use common::validation::{float_range, int_range, required_length};
use common::{Criteria, CriteriaId, CriteriaPayload, FieldErrors, ValidationRules};

use super::{FormMode, SubmitOutcome, SubmitState, report_failure};
use crate::cache::QueryKey;
use crate::state::AdminState;

/// Editable copy of a criterion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CriteriaDraft {
    pub name: String,
    pub description: String,
    pub max_score: Option<i64>,
    pub weight: Option<f64>,
    pub marking_guide: String,
}

impl From<&Criteria> for CriteriaDraft {
    fn from(c: &Criteria) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            max_score: Some(i64::from(c.max_score)),
            weight: Some(c.weight),
            marking_guide: c.marking_guide.clone(),
        }
    }
}

/// Live mirror of the draft shown beside the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaPreview {
    pub name: String,
    pub description: String,
    pub max_score: String,
    pub weight: String,
    pub marking_guide: String,
}

impl fmt::Display for CriteriaPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "Max score: {}  Weight: {}", self.max_score, self.weight)?;
        write!(f, "Marking guide: {}", self.marking_guide)
    }
}

pub struct CriteriaForm {
    rules: Arc<ValidationRules>,
    mode: FormMode<CriteriaId>,
    initial: CriteriaDraft,
    draft: CriteriaDraft,
    open: bool,
    submit_state: SubmitState,
}

impl CriteriaForm {
    /// Empty form for a new criterion.
    pub fn new(rules: Arc<ValidationRules>) -> Self {
        Self {
            rules,
            mode: FormMode::Create,
            initial: CriteriaDraft::default(),
            draft: CriteriaDraft::default(),
            open: true,
            submit_state: SubmitState::default(),
        }
    }

    /// Form pre-filled from an existing criterion.
    pub fn edit(rules: Arc<ValidationRules>, criteria: &Criteria) -> Self {
        let draft = CriteriaDraft::from(criteria);
        Self {
            rules,
            mode: FormMode::Edit(criteria.id.clone()),
            initial: draft.clone(),
            draft,
            open: true,
            submit_state: SubmitState::default(),
        }
    }

    pub fn mode(&self) -> &FormMode<CriteriaId> {
        &self.mode
    }

    pub fn draft(&self) -> &CriteriaDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CriteriaDraft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: CriteriaDraft) {
        self.draft = draft;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close and discard edits.
    pub fn close(&mut self) {
        self.open = false;
        self.draft = self.initial.clone();
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state.clone()
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let rules = &self.rules;
        let d = &self.draft;
        let mut errors = FieldErrors::new();

        errors.check(
            "name",
            required_length(
                &d.name,
                "Criteria name",
                rules.team_name_min_length,
                rules.team_name_max_length,
            ),
        );
        errors.check(
            "description",
            required_length(
                &d.description,
                "Description",
                rules.criteria.description_min_length,
                rules.criteria.description_max_length,
            ),
        );
        errors.check(
            "maxScore",
            int_range(d.max_score, "Max score", 1, i64::from(rules.max_score)),
        );
        errors.check("weight", float_range(d.weight, "Weight", 0.0, 1.0));
        errors.check(
            "markingGuide",
            required_length(
                &d.marking_guide,
                "Marking guide",
                rules.criteria.marking_guide_min_length,
                rules.criteria.marking_guide_max_length,
            ),
        );

        errors.into_result()
    }

    fn payload(&self) -> Result<CriteriaPayload, FieldErrors> {
        self.validate()?;
        let d = &self.draft;
        Ok(CriteriaPayload {
            name: d.name.trim().to_string(),
            description: d.description.trim().to_string(),
            max_score: d.max_score.unwrap_or_default() as u32,
            weight: d.weight.unwrap_or_default(),
            marking_guide: d.marking_guide.trim().to_string(),
        })
    }

    pub fn preview(&self) -> CriteriaPreview {
        let d = &self.draft;
        let or = |value: &str, placeholder: &str| {
            let value = value.trim();
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };
        CriteriaPreview {
            name: or(&d.name, "Criteria Name"),
            description: or(&d.description, "Criteria description will appear here"),
            max_score: d
                .max_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "0".into()),
            weight: weight_percent(d.weight.unwrap_or(0.0)),
            marking_guide: or(&d.marking_guide, "Marking guide will appear here"),
        }
    }

    /// Validate, then create or update through the backend.
    #[instrument(skip_all, fields(mode = self.mode.action()))]
    pub async fn submit(&mut self, state: &AdminState) -> SubmitOutcome<Criteria> {
        let payload = match self.payload() {
            Ok(p) => p,
            Err(errors) => {
                debug!(%errors, "Criteria form invalid");
                return SubmitOutcome::Invalid(errors);
            }
        };

        let Some(_in_flight) = self.submit_state.begin() else {
            return SubmitOutcome::Busy;
        };

        let result = match &self.mode {
            FormMode::Create => state.api.create_criteria(&payload).await,
            FormMode::Edit(id) => state.api.update_criteria(id, &payload).await,
        };

        match result {
            Ok(criteria) => {
                state.cache.invalidate(QueryKey::Criteria);
                state.cache.invalidate(QueryKey::ActiveCriteria);
                info!(id = %criteria.id, name = %criteria.name, "Criteria saved");
                state
                    .notifier
                    .success(&format!("Criteria {} successfully", self.mode.past_tense()));
                self.close();
                SubmitOutcome::Saved(criteria)
            }
            Err(e) => {
                let fallback = format!("Failed to {} criteria", self.mode.action());
                SubmitOutcome::Failed(report_failure(state, &e, &fallback))
            }
        }
    }
}
