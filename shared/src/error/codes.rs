//! Unified error codes for the requisition terminal
//!
//! This module defines all error codes used by the scan engine, the workflow
//! controller and the administrative services. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Scan errors
//! - 8xxx: Employee errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they can be logged and
/// persisted without depending on the Rust enum layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 7,
    /// Date range start is after its end
    InvalidDateRange = 9,

    // ==================== 1xxx: Auth ====================
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Password too short
    PasswordTooShort = 1003,

    // ==================== 2xxx: Permission ====================
    /// Admin session required
    AdminRequired = 2003,

    // ==================== 4xxx: Scan ====================
    /// Item already registered for this employee
    DuplicateScan = 4001,
    /// Item code does not match the configured format
    InvalidItemCode = 4002,
    /// Badge code does not match the configured format
    InvalidBadgeCode = 4003,
    /// An item scan arrived while no employee is identified
    NoActiveEmployee = 4004,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Badge code already assigned to another employee
    EmployeeBadgeExists = 8002,
    /// National id already assigned to another employee
    EmployeeNationalIdExists = 8003,
    /// National id is not 11 digits
    InvalidNationalId = 8004,
    /// Sector is not one of the known sectors
    InvalidSector = 8005,
    /// Admin username already exists
    AdminUsernameExists = 8102,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether the operator may simply try the same action again.
    ///
    /// Only storage failures qualify. Duplicates, validation failures and
    /// missing employees are final for the given input.
    #[inline]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::DatabaseError | ErrorCode::TimeoutError)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::InvalidDateRange => "Start date is after end date",

            // Auth
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::PasswordTooShort => "Password is too short",

            // Permission
            ErrorCode::AdminRequired => "Administrator session is required",

            // Scan
            ErrorCode::DuplicateScan => "Item already registered",
            ErrorCode::InvalidItemCode => "Invalid item code",
            ErrorCode::InvalidBadgeCode => "Invalid badge code",
            ErrorCode::NoActiveEmployee => "No employee identified",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeBadgeExists => "Badge code already registered",
            ErrorCode::EmployeeNationalIdExists => "National id already registered",
            ErrorCode::InvalidNationalId => "National id must have 11 digits",
            ErrorCode::InvalidSector => "Unknown sector",
            ErrorCode::AdminUsernameExists => "Admin username already exists",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::InvalidDateRange),

            // Auth
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2003 => Ok(ErrorCode::AdminRequired),

            // Scan
            4001 => Ok(ErrorCode::DuplicateScan),
            4002 => Ok(ErrorCode::InvalidItemCode),
            4003 => Ok(ErrorCode::InvalidBadgeCode),
            4004 => Ok(ErrorCode::NoActiveEmployee),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeBadgeExists),
            8003 => Ok(ErrorCode::EmployeeNationalIdExists),
            8004 => Ok(ErrorCode::InvalidNationalId),
            8005 => Ok(ErrorCode::InvalidSector),
            8102 => Ok(ErrorCode::AdminUsernameExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidDateRange.code(), 9);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::DuplicateScan.code(), 4001);
        assert_eq!(ErrorCode::InvalidItemCode.code(), 4002);
        assert_eq!(ErrorCode::EmployeeNotFound.code(), 8001);
        assert_eq!(ErrorCode::EmployeeNationalIdExists.code(), 8003);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
    }

    #[test]
    fn test_retryable() {
        assert!(ErrorCode::DatabaseError.is_retryable());
        assert!(ErrorCode::TimeoutError.is_retryable());
        assert!(!ErrorCode::DuplicateScan.is_retryable());
        assert!(!ErrorCode::InvalidItemCode.is_retryable());
        assert!(!ErrorCode::EmployeeNotFound.is_retryable());
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let codes = [
            ErrorCode::ValidationFailed,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::RequiredField,
            ErrorCode::InvalidDateRange,
            ErrorCode::InvalidCredentials,
            ErrorCode::PasswordTooShort,
            ErrorCode::AdminRequired,
            ErrorCode::DuplicateScan,
            ErrorCode::InvalidItemCode,
            ErrorCode::InvalidBadgeCode,
            ErrorCode::NoActiveEmployee,
            ErrorCode::EmployeeNotFound,
            ErrorCode::EmployeeBadgeExists,
            ErrorCode::EmployeeNationalIdExists,
            ErrorCode::InvalidNationalId,
            ErrorCode::InvalidSector,
            ErrorCode::AdminUsernameExists,
            ErrorCode::InternalError,
            ErrorCode::DatabaseError,
            ErrorCode::TimeoutError,
            ErrorCode::ConfigError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::DuplicateScan).unwrap();
        assert_eq!(json, "4001");

        let code: ErrorCode = serde_json::from_str("8003").unwrap();
        assert_eq!(code, ErrorCode::EmployeeNationalIdExists);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::ValidationFailed), "2");
        assert_eq!(format!("{}", ErrorCode::DuplicateScan), "4001");
        assert_eq!(format!("{}", InvalidErrorCode(999)), "invalid error code: 999");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::DuplicateScan.message(), "Item already registered");
        assert_eq!(ErrorCode::EmployeeNotFound.message(), "Employee not found");
    }
}
