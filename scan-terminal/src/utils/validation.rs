//! Input validation helpers
//!
//! Centralized length constants and validation functions for the
//! administrative surface. SQLite TEXT has no built-in length enforcement.

use shared::util::is_digits;

use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Employee names, as printed on the registration form
pub const MAX_NAME_LEN: usize = 50;

/// National id (CPF) digits
pub const NATIONAL_ID_LEN: usize = 11;

/// Admin usernames
pub const MAX_USERNAME_LEN: usize = 64;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 128;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
///
/// Length is counted in characters so accented names are not penalized.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// National id must be exactly 11 ASCII digits
pub fn validate_national_id(value: &str) -> Result<(), AppError> {
    if value.len() != NATIONAL_ID_LEN || !is_digits(value) {
        return Err(AppError::new(ErrorCode::InvalidNationalId).with_detail("national_id", value));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must have at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}
