//! Attendee roster. Registration is append-only and deduplicated by
//! email; registering twice is reported as a soft outcome, unlike the
//! booth workflow's hard conflicts.

use expohall_catalog::expo::{Attendee, Expo};
use expohall_core::pii::Masked;

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// Appended to the roster; carries the new roster size.
    Added(usize),
    /// The email was already on the roster, which is left untouched.
    AlreadyRegistered,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

pub fn register_attendee(
    expo: &mut Expo,
    name: &str,
    email: &str,
) -> Result<Registration, RosterError> {
    if name.trim().is_empty() {
        return Err(RosterError::MissingField("name"));
    }
    if email.trim().is_empty() {
        return Err(RosterError::MissingField("email"));
    }
    if expo.attendees.iter().any(|a| a.email.expose() == email) {
        return Ok(Registration::AlreadyRegistered);
    }
    expo.attendees.push(Attendee {
        name: name.to_string(),
        email: Masked(email.to_string()),
    });
    Ok(Registration::Added(expo.attendees.len()))
}
