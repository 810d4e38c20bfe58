//! In-memory store used by the test suite and by local runs without a
//! database. Implements the same versioning contract as Postgres so
//! the retry loop behaves identically in both.

use async_trait::async_trait;
use chrono::Utc;
use expohall_catalog::expo::Expo;
use expohall_catalog::repository::{ExpoRepository, UpdateOutcome, VersionedExpo};
use expohall_core::feedback::{Feedback, FeedbackRepository, FeedbackWrite};
use expohall_core::users::{User, UserRepository, UserUpdate};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

struct StoredExpo {
    seq: u64,
    version: i64,
    expo: Expo,
}

#[derive(Default)]
pub struct MemoryStore {
    expos: RwLock<HashMap<Uuid, StoredExpo>>,
    users: RwLock<HashMap<Uuid, User>>,
    feedback: RwLock<Vec<Feedback>>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExpoRepository for MemoryStore {
    async fn insert(&self, expo: &Expo) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.expos.write().insert(
            expo.id,
            StoredExpo {
                seq,
                version: 1,
                expo: expo.clone(),
            },
        );
        Ok(())
    }

    async fn fetch(
        &self,
        id: Uuid,
    ) -> Result<Option<VersionedExpo>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.expos.read().get(&id).map(|stored| VersionedExpo {
            version: stored.version,
            expo: stored.expo.clone(),
        }))
    }

    async fn list(&self) -> Result<Vec<Expo>, Box<dyn std::error::Error + Send + Sync>> {
        let guard = self.expos.read();
        let mut stored: Vec<&StoredExpo> = guard.values().collect();
        stored.sort_by_key(|s| s.seq);
        Ok(stored.into_iter().map(|s| s.expo.clone()).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        expected_version: i64,
        expo: &Expo,
    ) -> Result<UpdateOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.expos.write();
        let Some(stored) = guard.get_mut(&id) else {
            return Ok(UpdateOutcome::Missing);
        };
        if stored.version != expected_version {
            return Ok(UpdateOutcome::VersionConflict);
        }
        stored.version += 1;
        stored.expo = expo.clone();
        Ok(UpdateOutcome::Applied)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.expos.write().remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.users.write();
        if guard.values().any(|u| u.email == user.email) {
            return Ok(false);
        }
        guard.insert(user.id, user.clone());
        Ok(true)
    }

    async fn fetch(
        &self,
        id: Uuid,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn fetch_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.users.read().values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>> {
        let guard = self.users.read();
        let mut users: Vec<User> = guard.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserUpdate,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.users.write();
        let Some(user) = guard.get_mut(&id) else {
            return Ok(None);
        };
        user.name = changes.name;
        user.email = changes.email;
        user.role = changes.role;
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.users.write().remove(&id).is_some())
    }

    async fn set_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.users.write();
        let Some(user) = guard.get_mut(&id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        Ok(true)
    }
}

#[async_trait]
impl FeedbackRepository for MemoryStore {
    async fn upsert(
        &self,
        expo_id: Uuid,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(FeedbackWrite, Feedback), Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.feedback.write();
        let now = Utc::now();
        if let Some(entry) = guard
            .iter_mut()
            .find(|f| f.expo_id == expo_id && f.email == email)
        {
            entry.name = name.to_string();
            entry.message = message.to_string();
            entry.updated_at = now;
            return Ok((FeedbackWrite::Updated, entry.clone()));
        }
        let entry = Feedback {
            id: Uuid::new_v4(),
            expo_id,
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            created_at: now,
            updated_at: now,
        };
        guard.push(entry.clone());
        Ok((FeedbackWrite::Created, entry))
    }

    async fn list_for_expo(
        &self,
        expo_id: Uuid,
    ) -> Result<Vec<Feedback>, Box<dyn std::error::Error + Send + Sync>> {
        let guard = self.feedback.read();
        let mut entries: Vec<Feedback> = guard
            .iter()
            .filter(|f| f.expo_id == expo_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}
