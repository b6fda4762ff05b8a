//! Data models
//!
//! Shared between the terminal engine and the administrative surface.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod admin;
pub mod employee;
pub mod scan;

// Re-exports
pub use admin::*;
pub use employee::*;
pub use scan::*;
