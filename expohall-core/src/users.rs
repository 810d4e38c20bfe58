use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform roles. Organizer is the only role allowed to mutate the
/// event catalog or decide on exhibitor applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Attendee,
    Exhibitor,
    Organizer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Attendee => "attendee",
            Role::Exhibitor => "exhibitor",
            Role::Organizer => "organizer",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "attendee" => Some(Role::Attendee),
            "exhibitor" => Some(Role::Exhibitor),
            "organizer" => Some(Role::Organizer),
            _ => None,
        }
    }
}

/// Account record in the credential store. Password and security
/// answer are kept as bcrypt hashes, never in the clear.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub security_answer_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Field set applied by a profile update. A `None` password keeps the
/// stored hash.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the account. Returns `false` when the email address is
    /// already registered, leaving the store untouched.
    async fn insert(&self, user: &User) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    async fn fetch(
        &self,
        id: Uuid,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn fetch_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list(&self) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>>;

    /// Applies the update, returning the new record or `None` when the
    /// account does not exist.
    async fn update(
        &self,
        id: Uuid,
        changes: UserUpdate,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Replaces the password hash after a verified recovery flow.
    async fn set_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Attendee, Role::Exhibitor, Role::Organizer] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn role_serde_uses_lowercase() {
        let json = serde_json::to_string(&Role::Organizer).unwrap();
        assert_eq!(json, "\"organizer\"");
        let role: Role = serde_json::from_str("\"exhibitor\"").unwrap();
        assert_eq!(role, Role::Exhibitor);
    }
}
