//! Database Module
//!
//! Handles the SQLite connection pool, migrations and store-call time bounds

pub mod repository;

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use crate::db::repository::{RepoError, RepoResult};
use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Open (or create) the database file with WAL mode and run migrations
    ///
    /// `store_timeout` bounds both the pool acquire and SQLite's busy wait,
    /// so a locked file surfaces as an error instead of hanging the terminal.
    pub async fn new(db_path: &str, store_timeout: Duration) -> Result<Self, AppError> {
        if db_path.trim().is_empty() {
            return Err(AppError::config("DATABASE_PATH is empty"));
        }
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::config(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(store_timeout)
            .foreign_keys(true)
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(store_timeout)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        tracing::info!(
            path = %db_path,
            busy_timeout_ms = store_timeout.as_millis() as u64,
            "Database connection established (SQLite WAL)"
        );

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Run one store call under `limit`
///
/// An elapsed deadline becomes [`RepoError::Timeout`]; the in-flight query is
/// dropped, never retried.
pub async fn bounded<T, F>(limit: Duration, op: &'static str, call: F) -> RepoResult<T>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(op, limit_ms = limit.as_millis() as u64, "Store call timed out");
            Err(RepoError::Timeout(format!(
                "{op} exceeded {}ms",
                limit.as_millis()
            )))
        }
    }
}
