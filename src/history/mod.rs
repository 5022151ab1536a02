//! Research history module
//!
//! Append-only record of completed runs with lookup and newest-first listing.

mod sqlite;

pub use sqlite::SqliteHistoryStore;

use crate::results::ResearchRun;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the history store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Research run {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Stored results are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },
}

/// Persistent, append-only run history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Store a run and return its new identifier
    async fn append(&self, run: &ResearchRun) -> Result<i64, StoreError>;

    /// Fetch one run by identifier
    async fn get(&self, id: i64) -> Result<ResearchRun, StoreError>;

    /// Up to `limit` runs, newest first
    async fn list_recent(&self, limit: u32) -> Result<Vec<ResearchRun>, StoreError>;
}
