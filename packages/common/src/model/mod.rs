pub mod criteria;
pub mod round;
pub mod team;
pub mod user;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use criteria::{Criteria, CriteriaPayload};
pub use round::{CriteriaRef, Round, RoundPayload};
pub use team::{MemberRole, Team, TeamMember, TeamPayload};
pub use user::{JudgeInfo, Role, User, UserRef};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

entity_id!(
    /// Backend identifier of a criterion.
    CriteriaId
);
entity_id!(
    /// Backend identifier of a judging round.
    RoundId
);
entity_id!(
    /// Backend identifier of a team.
    TeamId
);
entity_id!(
    /// Backend identifier of a user.
    UserId
);
