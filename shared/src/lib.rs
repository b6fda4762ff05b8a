//! Shared types for the requisition scan terminal
//!
//! Common types used by the terminal engine and the administrative surface:
//! data models, the unified error system and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
