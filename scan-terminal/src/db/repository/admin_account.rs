//! Admin Account Repository

use super::{RepoError, RepoResult};
use shared::models::AdminAccount;
use sqlx::SqlitePool;

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<AdminAccount>> {
    let account = sqlx::query_as::<_, AdminAccount>(
        "SELECT id, username, password_hash, created_at FROM admin_account WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(account)
}

/// Insert an account with an already-hashed password
pub async fn insert(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    now: i64,
) -> RepoResult<AdminAccount> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO admin_account (username, password_hash, created_at) VALUES (?1, ?2, ?3) RETURNING id",
    )
    .bind(username)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_username(pool, username)
        .await?
        .filter(|a| a.id == id)
        .ok_or_else(|| RepoError::Database("Failed to create admin account".into()))
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin_account")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_pool;

    #[tokio::test]
    async fn test_insert_and_count() {
        let pool = test_pool().await;
        assert_eq!(count(&pool).await.unwrap(), 0);

        let account = insert(&pool, "supervisor", "$argon2id$stub", 42).await.unwrap();
        assert_eq!(account.username, "supervisor");
        assert_eq!(account.password_hash, "$argon2id$stub");
        assert_eq!(count(&pool).await.unwrap(), 1);

        let err = insert(&pool, "supervisor", "other", 43).await.unwrap_err();
        assert!(err.is_duplicate_on("username"));
        assert!(find_by_username(&pool, "nobody").await.unwrap().is_none());
    }
}
