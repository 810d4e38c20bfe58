//! Shared domain primitives for the expo hall platform: exhibitor
//! identity, PII masking, the credential store and the feedback log.

pub mod feedback;
pub mod identity;
pub mod pii;
pub mod users;

pub use feedback::{Feedback, FeedbackRepository, FeedbackWrite};
pub use identity::{ExhibitorId, IdentityError};
pub use pii::Masked;
pub use users::{Role, User, UserRepository, UserUpdate};
