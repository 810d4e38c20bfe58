//! Postgres repositories. The expo aggregate is stored as one
//! versioned jsonb document per row, so the conditional update that
//! backs optimistic concurrency is a single statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use expohall_catalog::expo::Expo;
use expohall_catalog::repository::{ExpoRepository, UpdateOutcome, VersionedExpo};
use expohall_core::feedback::{Feedback, FeedbackRepository, FeedbackWrite};
use expohall_core::users::{Role, User, UserRepository, UserUpdate};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgExpoRepository {
    pool: PgPool,
}

impl PgExpoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct ExpoRow {
    version: i64,
    doc: serde_json::Value,
}

#[derive(sqlx::FromRow)]
struct DocRow {
    doc: serde_json::Value,
}

#[async_trait]
impl ExpoRepository for PgExpoRepository {
    async fn insert(&self, expo: &Expo) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let doc = serde_json::to_value(expo)?;
        sqlx::query("INSERT INTO expos (id, version, doc) VALUES ($1, 1, $2)")
            .bind(expo.id)
            .bind(doc)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch(
        &self,
        id: Uuid,
    ) -> Result<Option<VersionedExpo>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, ExpoRow>("SELECT version, doc FROM expos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let expo: Expo = serde_json::from_value(row.doc)?;
                Ok(Some(VersionedExpo {
                    version: row.version,
                    expo,
                }))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Expo>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, DocRow>("SELECT doc FROM expos ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        let mut expos = Vec::with_capacity(rows.len());
        for row in rows {
            expos.push(serde_json::from_value(row.doc)?);
        }
        Ok(expos)
    }

    async fn update(
        &self,
        id: Uuid,
        expected_version: i64,
        expo: &Expo,
    ) -> Result<UpdateOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let doc = serde_json::to_value(expo)?;
        let result = sqlx::query(
            "UPDATE expos SET doc = $3, version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2",
        )
        .bind(id)
        .bind(expected_version)
        .bind(doc)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(UpdateOutcome::Applied);
        }

        // Zero rows: either the row is gone or someone else bumped the
        // version first.
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM expos WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Ok(UpdateOutcome::VersionConflict)
        } else {
            Ok(UpdateOutcome::Missing)
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query("DELETE FROM expos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    security_answer_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, Box<dyn std::error::Error + Send + Sync>> {
        let role = Role::parse(&self.role).ok_or("Unknown role in users table")?;
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
            security_answer_hash: self.security_answer_hash,
            created_at: self.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, security_answer_hash, created_at";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &User) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, security_answer_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT (email) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.security_answer_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn fetch(
        &self,
        id: Uuid,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn fetch_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(
        &self,
        id: Uuid,
        changes: UserUpdate,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET name = $2, email = $3, role = $4, \
             password_hash = COALESCE($5, password_hash) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(changes.role.as_str())
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        row.map(UserRow::into_user).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgFeedbackRepository {
    pool: PgPool,
}

impl PgFeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: Uuid,
    expo_id: Uuid,
    name: String,
    email: String,
    message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Feedback {
            id: row.id,
            expo_id: row.expo_id,
            name: row.name,
            email: row.email,
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const FEEDBACK_COLUMNS: &str = "id, expo_id, name, email, message, created_at, updated_at";

#[async_trait]
impl FeedbackRepository for PgFeedbackRepository {
    async fn upsert(
        &self,
        expo_id: Uuid,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<(FeedbackWrite, Feedback), Box<dyn std::error::Error + Send + Sync>> {
        let existing = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE expo_id = $1 AND email = $2"
        ))
        .bind(expo_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some(row) => {
                let updated = sqlx::query_as::<_, FeedbackRow>(&format!(
                    "UPDATE feedback SET name = $2, message = $3, updated_at = NOW() \
                     WHERE id = $1 RETURNING {FEEDBACK_COLUMNS}"
                ))
                .bind(row.id)
                .bind(name)
                .bind(message)
                .fetch_one(&self.pool)
                .await?;
                Ok((FeedbackWrite::Updated, updated.into()))
            }
            None => {
                let created = sqlx::query_as::<_, FeedbackRow>(&format!(
                    "INSERT INTO feedback (id, expo_id, name, email, message) \
                     VALUES ($1, $2, $3, $4, $5) RETURNING {FEEDBACK_COLUMNS}"
                ))
                .bind(Uuid::new_v4())
                .bind(expo_id)
                .bind(name)
                .bind(email)
                .bind(message)
                .fetch_one(&self.pool)
                .await?;
                Ok((FeedbackWrite::Created, created.into()))
            }
        }
    }

    async fn list_for_expo(
        &self,
        expo_id: Uuid,
    ) -> Result<Vec<Feedback>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE expo_id = $1 ORDER BY created_at DESC"
        ))
        .bind(expo_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Feedback::from).collect())
    }
}
