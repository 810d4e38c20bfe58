//! Event catalog: the expo aggregate, the booth ledger that accounts
//! for its finite floor space, and the versioned repository contract
//! that keeps concurrent mutations honest.

pub mod booths;
pub mod expo;
pub mod projection;
pub mod repository;

pub use expo::{Expo, ExpoDraft, ExpoError, ScheduleDraft};
pub use projection::ExpoOverview;
pub use repository::{mutate, ExpoRepository, MutateError, UpdateOutcome, VersionedExpo};
