//! Registration flows: exhibitor booth requests with their approval
//! state machine, and the attendee roster.

pub mod roster;
pub mod workflow;

pub use roster::{register_attendee, Registration, RosterError};
pub use workflow::{
    approve_exhibitor, cancel_booth_request, reject_exhibitor, submit_application,
    submit_booth_request, ApplicationDraft, Approval, WorkflowError,
};
