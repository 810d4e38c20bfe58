//! Persistence contract for the expo aggregate, with optimistic
//! versioning. Every write carries the version it read; a stale
//! version is reported, not silently overwritten.

use crate::expo::Expo;
use async_trait::async_trait;
use uuid::Uuid;

/// A stored expo together with the version a writer must echo back.
#[derive(Debug, Clone)]
pub struct VersionedExpo {
    pub version: i64,
    pub expo: Expo,
}

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// The expected version is no longer current; reload and retry.
    VersionConflict,
    Missing,
}

#[async_trait]
pub trait ExpoRepository: Send + Sync {
    /// Stores a new expo at version 1.
    async fn insert(&self, expo: &Expo) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn fetch(
        &self,
        id: Uuid,
    ) -> Result<Option<VersionedExpo>, Box<dyn std::error::Error + Send + Sync>>;

    /// All expos in creation order.
    async fn list(&self) -> Result<Vec<Expo>, Box<dyn std::error::Error + Send + Sync>>;

    /// Replaces the document only if `expected_version` is still
    /// current, bumping the version on success.
    async fn update(
        &self,
        id: Uuid,
        expected_version: i64,
        expo: &Expo,
    ) -> Result<UpdateOutcome, Box<dyn std::error::Error + Send + Sync>>;

    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}

/// Commit failures surfaced by [`mutate`].
#[derive(Debug, thiserror::Error)]
pub enum MutateError<E> {
    #[error("Expo not found")]
    NotFound,
    #[error("Expo is under contention, change could not be applied after {0} attempts")]
    Contention(u32),
    #[error("{0}")]
    Domain(E),
    #[error("Storage failure: {0}")]
    Store(Box<dyn std::error::Error + Send + Sync>),
}

const COMMIT_ATTEMPTS: u32 = 5;

/// Load, apply, store, with optimistic retry scoped to one expo.
///
/// The closure runs against a private copy of the document, so a
/// domain failure aborts before anything is written and no partial
/// mutation ever becomes visible. When the conditional write loses a
/// race, the document is reloaded and the closure replayed against
/// the fresh state; its checks are re-evaluated each attempt.
pub async fn mutate<T, E, F>(
    repo: &dyn ExpoRepository,
    id: Uuid,
    mut apply: F,
) -> Result<T, MutateError<E>>
where
    F: FnMut(&mut Expo) -> Result<T, E>,
{
    for _ in 0..COMMIT_ATTEMPTS {
        let Some(VersionedExpo { version, mut expo }) =
            repo.fetch(id).await.map_err(MutateError::Store)?
        else {
            return Err(MutateError::NotFound);
        };
        let out = apply(&mut expo).map_err(MutateError::Domain)?;
        match repo
            .update(id, version, &expo)
            .await
            .map_err(MutateError::Store)?
        {
            UpdateOutcome::Applied => return Ok(out),
            UpdateOutcome::VersionConflict => continue,
            UpdateOutcome::Missing => return Err(MutateError::NotFound),
        }
    }
    Err(MutateError::Contention(COMMIT_ATTEMPTS))
}
