//! Read-only views over fetched entities.

pub mod criteria;
pub mod round;
pub mod user;

use common::UserRef;

pub use criteria::CriteriaDetail;
pub use round::RoundDetail;
pub use user::UserDetail;

/// Display name for a `createdBy` reference.
pub(crate) fn creator_name(created_by: Option<&UserRef>) -> String {
    created_by
        .and_then(UserRef::username)
        .unwrap_or("Unknown")
        .to_string()
}
