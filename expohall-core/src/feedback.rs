use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One visitor's feedback about an expo. A visitor is identified by
/// email and keeps exactly one entry per expo; repeat submissions
/// overwrite the message instead of piling up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: Uuid,
    pub expo_id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether an upsert created a fresh entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackWrite {
    Created,
    Updated,
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Creates or replaces the entry keyed by `(expo_id, email)`.
    async fn upsert(
        &self,
        expo_id: Uuid,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(FeedbackWrite, Feedback), Box<dyn std::error::Error + Send + Sync>>;

    /// Entries for one expo, newest first.
    async fn list_for_expo(
        &self,
        expo_id: Uuid,
    ) -> Result<Vec<Feedback>, Box<dyn std::error::Error + Send + Sync>>;
}
