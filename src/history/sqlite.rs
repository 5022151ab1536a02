//! SQLite history store

use super::{HistoryStore, StoreError};
use crate::config::DatabaseSettings;
use crate::results::{ResearchRun, SearchResult};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

const TABLE: &str = "research_history";

#[derive(Debug, FromRow)]
struct HistoryRow {
    id: i64,
    query: String,
    results: String,
    summary: String,
    created_at: String,
}

impl HistoryRow {
    fn into_run(self) -> Result<ResearchRun, StoreError> {
        let results: Vec<SearchResult> = serde_json::from_str(&self.results)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::CorruptRecord {
                id: self.id,
                reason: format!("bad timestamp {:?}: {}", self.created_at, e),
            })?
            .with_timezone(&Utc);

        Ok(ResearchRun {
            id: Some(self.id),
            query: self.query,
            results,
            summary: self.summary,
            created_at,
        })
    }
}

/// History store over an SQLite connection pool
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Open (creating if needed) the database and apply migrations
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let in_memory = settings.url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(&settings.url)?
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // An in-memory database lives only as long as its single connection
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self::from_pool(pool).await?;
        info!("History store ready at {}", settings.url);
        Ok(store)
    }

    /// Private in-memory database, mostly for tests
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect(&DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
    }

    /// Wrap an existing pool, applying migrations
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        MIGRATOR.run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, run: &ResearchRun) -> Result<i64, StoreError> {
        let results = serde_json::to_string(&run.results)?;
        let created_at = run.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);

        // One INSERT per run keeps each append atomic
        let id = sqlx::query(&format!(
            "INSERT INTO {TABLE} (query, results, summary, created_at) VALUES (?, ?, ?, ?)"
        ))
        .bind(&run.query)
        .bind(results)
        .bind(&run.summary)
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!("Stored research run {} for '{}'", id, run.query);
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<ResearchRun, StoreError> {
        let row: Option<HistoryRow> = sqlx::query_as(&format!(
            "SELECT id, query, results, summary, created_at FROM {TABLE} WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(id))?.into_run()
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<ResearchRun>, StoreError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(&format!(
            "SELECT id, query, results, summary, created_at FROM {TABLE} \
             ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HistoryRow::into_run).collect()
    }
}
