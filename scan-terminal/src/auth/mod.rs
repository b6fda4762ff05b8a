//! 管理员认证
//!
//! Argon2 password hashing and the session token handed out by a successful
//! admin login.

use serde::Serialize;
use shared::models::AdminAccount;

/// Hash a password using argon2 (PHC string)
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string
///
/// A malformed stored hash is an error, a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Proof of a successful admin login
///
/// Only [`crate::services::AdminService::login`] can mint one.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    admin_id: i64,
    username: String,
    authenticated_at: i64,
}

impl AdminSession {
    pub(crate) fn from_account(account: &AdminAccount) -> Self {
        Self {
            admin_id: account.id,
            username: account.username.clone(),
            authenticated_at: shared::util::now_millis(),
        }
    }

    pub fn admin_id(&self) -> i64 {
        self.admin_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn authenticated_at(&self) -> i64 {
        self.authenticated_at
    }
}
