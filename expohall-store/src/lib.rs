//! Persistence layer: configuration loading, the Postgres-backed
//! repositories and an in-memory store for tests and local runs.

pub mod app_config;
pub mod database;
pub mod memory;
pub mod postgres;

pub use app_config::Config;
pub use database::DbClient;
pub use memory::MemoryStore;
pub use postgres::{PgExpoRepository, PgFeedbackRepository, PgUserRepository};
