use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wraps attendee and exhibitor contact details so request tracing and
/// debug output cannot leak them.
///
/// Serialization passes the inner value through untouched: API clients
/// and the persisted document need the real address, log formatters do
/// not.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Masked<T>(pub T);

impl<T> Masked<T> {
    /// Grants deliberate access to the wrapped value, e.g. for the
    /// roster's duplicate check.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Masked<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***redacted***")
    }
}

impl<T> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***redacted***")
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let email = Masked("ada@example.com".to_string());
        assert_eq!(format!("{:?}", email), "***redacted***");
        assert_eq!(format!("{}", email), "***redacted***");
    }

    #[test]
    fn serialization_passes_through() {
        let email = Masked("ada@example.com".to_string());
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"ada@example.com\"");
    }

    #[test]
    fn round_trips_through_serde() {
        let email: Masked<String> = serde_json::from_str("\"ada@example.com\"").unwrap();
        assert_eq!(email.expose(), "ada@example.com");
    }
}
