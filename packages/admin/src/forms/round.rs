use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use common::display::{parse_datetime_local, to_datetime_local};
use common::validation::{max_length, required, required_length};
use common::{
    Criteria, CriteriaId, CriteriaRef, FieldErrors, Round, RoundId, RoundPayload, ValidationRules,
};

use super::{FormMode, SubmitOutcome, SubmitState, non_blank, reject, report_failure};
use crate::cache::QueryKey;
use crate::error::ApiError;
use crate::state::AdminState;

pub const END_BEFORE_START: &str = "End date must be after start date";
pub const NO_CRITERIA_SELECTED: &str = "Please select at least one criteria";

/// Editable copy of a round. Dates hold `datetime-local` input values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoundDraft {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<&Round> for RoundDraft {
    fn from(r: &Round) -> Self {
        Self {
            name: r.name.clone(),
            description: r.description.clone().unwrap_or_default(),
            start_date: to_datetime_local(&r.start_date),
            end_date: to_datetime_local(&r.end_date),
        }
    }
}

pub struct RoundForm {
    rules: Arc<ValidationRules>,
    mode: FormMode<RoundId>,
    initial: RoundDraft,
    initial_selection: BTreeMap<CriteriaId, CriteriaRef>,
    draft: RoundDraft,
    /// Selected criteria keyed by id. Entries seeded from a round may only
    /// carry the id until the active list is loaded.
    selected: BTreeMap<CriteriaId, CriteriaRef>,
    available: Vec<Criteria>,
    open: bool,
    submit_state: SubmitState,
}

impl RoundForm {
    pub fn new(rules: Arc<ValidationRules>) -> Self {
        Self {
            rules,
            mode: FormMode::Create,
            initial: RoundDraft::default(),
            initial_selection: BTreeMap::new(),
            draft: RoundDraft::default(),
            selected: BTreeMap::new(),
            available: Vec::new(),
            open: true,
            submit_state: SubmitState::default(),
        }
    }

    /// Form pre-filled from `round`, with its criteria already selected.
    pub fn edit(rules: Arc<ValidationRules>, round: &Round) -> Self {
        let draft = RoundDraft::from(round);
        let selected: BTreeMap<_, _> = round
            .criteria
            .iter()
            .map(|c| (c.id().clone(), c.clone()))
            .collect();
        Self {
            rules,
            mode: FormMode::Edit(round.id.clone()),
            initial: draft.clone(),
            initial_selection: selected.clone(),
            draft,
            selected,
            available: Vec::new(),
            open: true,
            submit_state: SubmitState::default(),
        }
    }

    pub fn mode(&self) -> &FormMode<RoundId> {
        &self.mode
    }

    pub fn draft(&self) -> &RoundDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut RoundDraft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: RoundDraft) {
        self.draft = draft;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close and discard edits, including the selection.
    pub fn close(&mut self) {
        self.open = false;
        self.draft = self.initial.clone();
        self.selected = self.initial_selection.clone();
    }

    pub fn submit_state(&self) -> SubmitState {
        self.submit_state.clone()
    }

    /// Active criteria offered for selection.
    pub fn available_criteria(&self) -> &[Criteria] {
        &self.available
    }

    /// Fetch the active criteria list. Does nothing while the form is
    /// closed. Served from the cache when it holds a fresh copy.
    #[instrument(skip_all)]
    pub async fn load_criteria(&mut self, state: &AdminState) -> Result<usize, ApiError> {
        if !self.open {
            debug!("Round form closed, not fetching criteria");
            return Ok(0);
        }

        let list = match state.cache.get::<Vec<Criteria>>(QueryKey::ActiveCriteria) {
            Some(list) => list,
            None => match state.api.list_active_criteria().await {
                Ok(list) => {
                    state.cache.put(QueryKey::ActiveCriteria, list.clone());
                    list
                }
                Err(e) => {
                    report_failure(state, &e, "Failed to load criteria");
                    return Err(e);
                }
            },
        };

        for c in &list {
            if let Some(entry) = self.selected.get_mut(&c.id)
                && entry.criteria().is_none()
            {
                *entry = CriteriaRef::Populated(Box::new(c.clone()));
            }
        }
        self.available = list;
        Ok(self.available.len())
    }

    /// Add `criteria` to the selection, or remove it if already selected.
    /// Returns whether it is selected afterwards.
    pub fn toggle_criteria(&mut self, criteria: &Criteria) -> bool {
        if self.selected.remove(&criteria.id).is_some() {
            false
        } else {
            self.selected.insert(
                criteria.id.clone(),
                CriteriaRef::Populated(Box::new(criteria.clone())),
            );
            true
        }
    }

    /// Select every id found in the loaded list. Returns the ids that were
    /// not found.
    pub fn select_ids(&mut self, ids: &[CriteriaId]) -> Vec<CriteriaId> {
        let mut missing = Vec::new();
        for id in ids {
            match self.available.iter().find(|c| &c.id == id) {
                Some(c) => {
                    self.selected
                        .insert(id.clone(), CriteriaRef::Populated(Box::new(c.clone())));
                }
                None => missing.push(id.clone()),
            }
        }
        missing
    }

    pub fn is_selected(&self, id: &CriteriaId) -> bool {
        self.selected.contains_key(id)
    }

    pub fn selected_ids(&self) -> Vec<CriteriaId> {
        self.selected.keys().cloned().collect()
    }

    pub fn selected(&self) -> impl Iterator<Item = &CriteriaRef> {
        self.selected.values()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// True while nothing is selected.
    pub fn needs_criteria_warning(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let bounds = &self.rules.round;
        let d = &self.draft;
        let mut errors = FieldErrors::new();

        errors.check(
            "name",
            required_length(
                &d.name,
                "Round name",
                bounds.name_min_length,
                bounds.name_max_length,
            ),
        );
        errors.check(
            "description",
            max_length(&d.description, "Description", bounds.description_max_length),
        );
        for (field, label, value) in [
            ("startDate", "Start date", &d.start_date),
            ("endDate", "End date", &d.end_date),
        ] {
            errors.check(field, required(value, label));
            if parse_datetime_local(value).is_none() {
                errors.insert(field, format!("{label} is not a valid date"));
            }
        }

        errors.into_result()
    }

    #[instrument(skip_all, fields(mode = self.mode.action()))]
    pub async fn submit(&mut self, state: &AdminState) -> SubmitOutcome<Round> {
        if let Err(errors) = self.validate() {
            debug!(%errors, "Round form invalid");
            return SubmitOutcome::Invalid(errors);
        }

        let (Some(start_date), Some(end_date)) = (
            parse_datetime_local(&self.draft.start_date),
            parse_datetime_local(&self.draft.end_date),
        ) else {
            return reject(state, "Start and end dates are required");
        };
        if end_date <= start_date {
            return reject(state, END_BEFORE_START);
        }
        if self.selected.is_empty() {
            return reject(state, NO_CRITERIA_SELECTED);
        }

        let payload = RoundPayload {
            name: self.draft.name.trim().to_string(),
            description: non_blank(&self.draft.description),
            start_date,
            end_date,
            criteria: self.selected_ids(),
        };

        let Some(_in_flight) = self.submit_state.begin() else {
            return SubmitOutcome::Busy;
        };

        let result = match &self.mode {
            FormMode::Create => state.api.create_round(&payload).await,
            FormMode::Edit(id) => state.api.update_round(id, &payload).await,
        };

        match result {
            Ok(round) => {
                state.cache.invalidate(QueryKey::Rounds);
                state.cache.invalidate(QueryKey::Criteria);
                state.cache.invalidate(QueryKey::ActiveCriteria);
                info!(id = %round.id, name = %round.name, "Round saved");
                state
                    .notifier
                    .success(&format!("Round {} successfully", self.mode.past_tense()));
                self.close();
                SubmitOutcome::Saved(round)
            }
            Err(e) => {
                let fallback = format!("Failed to {} round", self.mode.action());
                SubmitOutcome::Failed(report_failure(state, &e, &fallback))
            }
        }
    }
}
