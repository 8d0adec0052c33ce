pub mod display;
pub mod model;
pub mod rules;
pub mod validation;

pub use model::{
    Criteria, CriteriaId, CriteriaPayload, CriteriaRef, JudgeInfo, MemberRole, Role, Round,
    RoundId, RoundPayload, Team, TeamId, TeamMember, TeamPayload, User, UserId, UserRef,
};
pub use rules::ValidationRules;
pub use validation::{FieldError, FieldErrors};
