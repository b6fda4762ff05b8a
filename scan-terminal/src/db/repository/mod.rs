//! Repository Module
//!
//! Free async functions over `&SqlitePool`, one module per table.

pub mod admin_account;
pub mod employee;
pub mod scan_event;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique index violated; carries the offending columns (`table.column, ...`)
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl RepoError {
    /// True when this is a unique violation touching `column`
    pub fn is_duplicate_on(&self, column: &str) -> bool {
        matches!(self, RepoError::Duplicate(columns) if columns.contains(column))
    }
}

const UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let msg = db_err.message();
                let columns = msg.strip_prefix(UNIQUE_PREFIX).unwrap_or(msg);
                RepoError::Duplicate(columns.to_string())
            }
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut => RepoError::Timeout(err.to_string()),
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// In-memory pool with the full schema, for repository tests
#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_duplicate_on() {
        let err = RepoError::Duplicate("employee.national_id".into());
        assert!(err.is_duplicate_on("national_id"));
        assert!(!err.is_duplicate_on("badge_code"));
        assert!(!RepoError::Database("x".into()).is_duplicate_on("national_id"));
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate() {
        let pool = test_pool().await;
        let insert = "INSERT INTO admin_account (username, password_hash, created_at) VALUES ('root', 'h', 0)";
        sqlx::query(insert).execute(&pool).await.unwrap();

        let err: RepoError = sqlx::query(insert).execute(&pool).await.unwrap_err().into();
        assert!(err.is_duplicate_on("admin_account.username"), "{err:?}");
    }
}
