//! Scan Ledger Models

use super::Sector;
use serde::{Deserialize, Serialize};

/// Accepted scan event (append-only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ScanEvent {
    pub id: i64,
    pub employee_badge_code: String,
    pub item_code: String,
    /// Unix millis, whole seconds
    pub scanned_at: i64,
    /// Partition under the duplicate policy (0 = permanent)
    pub dedup_bucket: i64,
}

/// Insert payload for the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEventCreate {
    pub employee_badge_code: String,
    pub item_code: String,
    pub scanned_at: i64,
    pub dedup_bucket: i64,
}

/// Ledger query filter
///
/// `from_millis` is inclusive and `to_millis` exclusive, both unix millis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanFilter {
    pub from_millis: i64,
    pub to_millis: i64,
    pub employee_badge_code: Option<String>,
    pub sector: Option<Sector>,
}

/// Scan event joined with the employee who made it (analytic report row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ScanEventDetail {
    pub employee_name: String,
    pub employee_badge_code: String,
    pub sector: Sector,
    pub item_code: String,
    pub scanned_at: i64,
}

/// Scan total per employee (synthetic report row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct EmployeeScanTotal {
    pub employee_name: String,
    pub employee_badge_code: String,
    pub sector: Sector,
    pub total_scans: i64,
}
