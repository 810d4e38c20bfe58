use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identity of an exhibitor account.
///
/// The registration workflow only ever compares these values for
/// equality; resolving one to an actual account is the credential
/// store's job. Approval decisions key off request ids, never off
/// anything guessable like an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExhibitorId(Uuid);

impl ExhibitorId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a client-supplied identity, rejecting anything that is
    /// not a well-formed UUID.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| IdentityError::Malformed(raw.to_string()))
    }
}

impl fmt::Display for ExhibitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ExhibitorId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Invalid exhibitor ID: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_canonical_uuid() {
        let id = ExhibitorId::parse("9f1c8e2a-4b6d-4f0e-8a3b-2c5d7e9f1a0b").unwrap();
        assert_eq!(id.to_string(), "9f1c8e2a-4b6d-4f0e-8a3b-2c5d7e9f1a0b");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = " 9f1c8e2a-4b6d-4f0e-8a3b-2c5d7e9f1a0b ".parse::<ExhibitorId>();
        assert!(id.is_ok());
    }

    #[test]
    fn rejects_garbage() {
        let err = ExhibitorId::parse("not-an-id").unwrap_err();
        assert_eq!(err, IdentityError::Malformed("not-an-id".to_string()));
    }

    #[test]
    fn serializes_transparently() {
        let id = ExhibitorId::new(uuid::Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
