//! Admin accounts: registration gate and login

use std::time::Duration;

use shared::models::{AdminAccount, AdminCreate};
use sqlx::SqlitePool;

use crate::auth::{self, AdminSession};
use crate::db::bounded;
use crate::db::repository::admin_account;
use crate::utils::validation::{MAX_USERNAME_LEN, validate_password, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Clone)]
pub struct AdminService {
    pool: SqlitePool,
    store_timeout: Duration,
}

impl AdminService {
    pub fn new(pool: SqlitePool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }

    /// True until the first admin account exists
    pub async fn needs_bootstrap(&self) -> AppResult<bool> {
        let total =
            bounded(self.store_timeout, "admin_account.count", admin_account::count(&self.pool))
                .await?;
        Ok(total == 0)
    }

    /// Create an admin account
    ///
    /// The first account may be created by anyone; after that `actor` must be
    /// a logged-in admin.
    pub async fn register(
        &self,
        actor: Option<&AdminSession>,
        data: AdminCreate,
    ) -> AppResult<AdminAccount> {
        let username = data.username.trim();
        validate_required_text(username, "username", MAX_USERNAME_LEN)?;
        validate_password(&data.password)?;

        if actor.is_none() && !self.needs_bootstrap().await? {
            tracing::warn!(username = %username, "Admin registration without a session refused");
            return Err(AppError::new(ErrorCode::AdminRequired));
        }

        let hash = auth::hash_password(&data.password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
        let now = shared::util::now_millis();

        match bounded(
            self.store_timeout,
            "admin_account.insert",
            admin_account::insert(&self.pool, username, &hash, now),
        )
        .await
        {
            Ok(account) => {
                tracing::info!(
                    username = %account.username,
                    created_by = actor.map(AdminSession::username).unwrap_or("<bootstrap>"),
                    "Admin account created"
                );
                Ok(account)
            }
            Err(e) if e.is_duplicate_on("username") => {
                Err(AppError::new(ErrorCode::AdminUsernameExists))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and open an admin session
    ///
    /// Unknown user and wrong password produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AdminSession> {
        let username = username.trim();
        let account = bounded(
            self.store_timeout,
            "admin_account.find_by_username",
            admin_account::find_by_username(&self.pool, username),
        )
        .await?;

        let Some(account) = account else {
            tracing::warn!(username = %username, "Login failed: unknown user");
            return Err(AppError::invalid_credentials());
        };

        match auth::verify_password(password, &account.password_hash) {
            Ok(true) => {
                tracing::info!(username = %username, "Admin logged in");
                Ok(AdminSession::from_account(&account))
            }
            Ok(false) => {
                tracing::warn!(username = %username, "Login failed: wrong password");
                Err(AppError::invalid_credentials())
            }
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Stored password hash is unreadable");
                Err(AppError::invalid_credentials())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_pool;

    fn create(username: &str, password: &str) -> AdminCreate {
        AdminCreate {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_bootstrap_then_gate() {
        let svc = AdminService::new(test_pool().await, Duration::from_secs(5));
        assert!(svc.needs_bootstrap().await.unwrap());

        let root = svc.register(None, create("root", "first-pass")).await.unwrap();
        assert_eq!(root.username, "root");
        assert!(!svc.needs_bootstrap().await.unwrap());

        let err = svc.register(None, create("intruder", "second-pass")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);

        let session = svc.login("root", "first-pass").await.unwrap();
        assert_eq!(session.username(), "root");
        assert_eq!(session.admin_id(), root.id);
        svc.register(Some(&session), create("helper", "second-pass"))
            .await
            .unwrap();

        let err = svc
            .register(Some(&session), create("helper", "third-pass"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminUsernameExists);
    }

    #[tokio::test]
    async fn test_login_errors_are_indistinguishable() {
        let svc = AdminService::new(test_pool().await, Duration::from_secs(5));
        svc.register(None, create("root", "first-pass")).await.unwrap();

        let unknown = svc.login("nobody", "first-pass").await.unwrap_err();
        let wrong = svc.login("root", "not-it").await.unwrap_err();
        assert_eq!(unknown.code, ErrorCode::InvalidCredentials);
        assert_eq!(unknown.code, wrong.code);
        assert_eq!(unknown.message, wrong.message);
    }

    #[tokio::test]
    async fn test_register_validates_before_store() {
        let svc = AdminService::new(test_pool().await, Duration::from_secs(5));
        let err = svc.register(None, create("root", "123")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);
        assert!(svc.needs_bootstrap().await.unwrap());
    }
}
