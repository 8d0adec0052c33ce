//! Editable entity forms.
//!
//! Each form owns a draft, validates it field by field, applies its
//! cross-field rules at submit time, and only then calls the backend.

pub mod criteria;
pub mod round;
pub mod team;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use common::FieldErrors;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::state::AdminState;

pub use criteria::{CriteriaDraft, CriteriaForm, CriteriaPreview};
pub use round::{RoundDraft, RoundForm};
pub use team::{MemberDraft, TeamDraft, TeamForm};

/// Whether a form creates a new entity or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

impl<Id> FormMode<Id> {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }

    /// "create" / "update".
    pub(crate) fn action(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit(_) => "update",
        }
    }

    /// "created" / "updated".
    pub(crate) fn past_tense(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Edit(_) => "updated",
        }
    }
}

/// Result of a submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    /// The backend accepted the write.
    Saved(T),
    /// One or more fields failed validation. Nothing was sent.
    Invalid(FieldErrors),
    /// A cross-field rule failed. Nothing was sent.
    Rejected(String),
    /// The backend or the network failed.
    Failed(String),
    /// A submit from this form is already in flight.
    Busy,
}

impl<T> SubmitOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(v) => Some(v),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Message shown for a rejected or failed submit.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected(m) | Self::Failed(m) => Some(m),
            _ => None,
        }
    }
}

/// Shared in-flight flag. A front-end holds a clone to disable its submit
/// control while a request is pending.
#[derive(Debug, Clone, Default)]
pub struct SubmitState(Arc<AtomicBool>);

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the form as submitting. `None` if it already was.
    pub(crate) fn begin(&self) -> Option<InFlight> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(Arc::clone(&self.0)))
    }
}

/// Clears the in-flight flag when dropped, including when the submit
/// future is cancelled.
pub(crate) struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Message for a failed write: the server's own message, else `fallback`.
pub fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Log and toast a failed write. Returns the message shown.
pub(crate) fn report_failure(state: &AdminState, err: &ApiError, fallback: &str) -> String {
    error!(error = %err, "{fallback}");
    let message = failure_message(err, fallback);
    state.notifier.error(&message);
    message
}

/// Toast a cross-field rule violation.
pub(crate) fn reject<T>(state: &AdminState, message: &str) -> SubmitOutcome<T> {
    warn!(reason = message, "Submit rejected");
    state.notifier.error(message);
    SubmitOutcome::Rejected(message.to_string())
}

/// `Some(trimmed)` unless blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
