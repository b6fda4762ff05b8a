//! 统一错误处理
//!
//! The terminal uses the shared [`AppError`] everywhere above the repository
//! layer. This module re-exports it and converts repository failures into it.
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | 4xxx | 扫描错误 | 4001 重复扫描 |
//! | 8xxx | 员工错误 | 8003 身份证号重复 |
//! | 9xxx | 系统错误 | 9002 数据库错误 |

use crate::db::repository::RepoError;

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(columns) => {
                AppError::with_message(ErrorCode::AlreadyExists, format!("Already exists: {columns}"))
                    .with_detail("columns", columns)
            }
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Timeout(msg) => {
                tracing::error!(target: "database", error = %msg, "Store call timed out");
                AppError::timeout(msg)
            }
            RepoError::Database(msg) => {
                tracing::error!(target: "database", error = %msg, "Database error occurred");
                AppError::database(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::Duplicate("employee.national_id".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);
        assert_eq!(err.detail("columns").unwrap(), "employee.national_id");

        let err: AppError = RepoError::Timeout("pool".into()).into();
        assert_eq!(err.code, ErrorCode::TimeoutError);
        assert!(err.is_retryable());

        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.code.category(), ErrorCategory::System);
    }
}
