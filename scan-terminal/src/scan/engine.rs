//! Scan registration engine
//!
//! Stateless: each call reads or appends to the stores and returns an outcome.
//! `NotFound` and `Duplicate` are outcomes; only malformed input and store
//! failures are errors.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{EmployeeIdentity, ScanEvent, ScanEventCreate};
use sqlx::SqlitePool;

use super::policy::{DuplicatePolicy, ScanPolicy};
use crate::db::bounded;
use crate::db::repository::{employee, scan_event, RepoError};
use crate::utils::time::{format_datetime, format_elapsed, millis_to_datetime};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Result of a badge lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthOutcome {
    Identified(EmployeeIdentity),
    NotFound,
}

impl AuthOutcome {
    /// Turn `NotFound` into an [`ErrorCode::EmployeeNotFound`] error
    pub fn into_result(self) -> AppResult<EmployeeIdentity> {
        match self {
            AuthOutcome::Identified(identity) => Ok(identity),
            AuthOutcome::NotFound => Err(AppError::new(ErrorCode::EmployeeNotFound)),
        }
    }
}

/// Read-only duplicate probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    /// Present only when `is_duplicate`
    pub prior_timestamp: Option<DateTime<Utc>>,
    /// Present only when `is_duplicate`
    pub elapsed: Option<Duration>,
}

impl DuplicateCheck {
    fn clear() -> Self {
        Self {
            is_duplicate: false,
            prior_timestamp: None,
            elapsed: None,
        }
    }
}

/// Why a scan was rejected as a repeat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateInfo {
    pub employee_badge_code: String,
    /// Name of the prior scanner, when the badge still resolves
    pub employee_name: Option<String>,
    pub item_code: String,
    pub prior_timestamp: DateTime<Utc>,
    pub elapsed: Duration,
}

impl DuplicateInfo {
    pub fn elapsed_text(&self) -> String {
        format_elapsed(self.elapsed)
    }

    /// Convert into a [`ErrorCode::DuplicateScan`] error for callers that want one
    pub fn into_error(self, tz: chrono_tz::Tz) -> AppError {
        let when = format_datetime(self.prior_timestamp, tz);
        let mut err = AppError::with_message(
            ErrorCode::DuplicateScan,
            format!("Item {} already registered at {}", self.item_code, when),
        )
        .with_detail("prior_timestamp", when)
        .with_detail("elapsed_secs", self.elapsed.as_secs())
        .with_detail("employee_badge_code", self.employee_badge_code)
        .with_detail("item_code", self.item_code);
        if let Some(name) = self.employee_name {
            err = err.with_detail("employee_name", name);
        }
        err
    }
}

/// Result of a commit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitOutcome {
    Committed(ScanEvent),
    Duplicate(DuplicateInfo),
}

/// Registers item scans against the identity store and the ledger
#[derive(Clone)]
pub struct ScanEngine {
    pool: SqlitePool,
    policy: ScanPolicy,
}

impl ScanEngine {
    pub fn new(pool: SqlitePool, policy: ScanPolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> &ScanPolicy {
        &self.policy
    }

    /// Look up the employee holding `badge_code`
    ///
    /// Format is the caller's concern; only an empty code is rejected here.
    pub async fn authenticate_employee(&self, badge_code: &str) -> AppResult<AuthOutcome> {
        if badge_code.trim().is_empty() {
            return Err(AppError::with_message(
                ErrorCode::InvalidBadgeCode,
                "Badge code must not be empty",
            ));
        }

        let found = bounded(
            self.policy.store_timeout,
            "employee.find_by_badge",
            employee::find_by_badge(&self.pool, badge_code),
        )
        .await?;

        match found {
            Some(emp) => {
                tracing::info!(badge = %badge_code, name = %emp.name, "Employee identified");
                Ok(AuthOutcome::Identified(emp.identity()))
            }
            None => {
                tracing::warn!(badge = %badge_code, "Unknown badge");
                Ok(AuthOutcome::NotFound)
            }
        }
    }

    /// Whether committing the pair now would be rejected as a duplicate
    pub async fn check_duplicate(
        &self,
        employee_badge_code: &str,
        item_code: &str,
    ) -> AppResult<DuplicateCheck> {
        self.check_duplicate_at(employee_badge_code, item_code, Utc::now())
            .await
    }

    /// [`check_duplicate`](Self::check_duplicate) evaluated at `now`
    pub async fn check_duplicate_at(
        &self,
        employee_badge_code: &str,
        item_code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<DuplicateCheck> {
        let now_millis = now.timestamp_millis();
        match self
            .blocking_scan(employee_badge_code, item_code, now_millis)
            .await?
        {
            Some(prior) => Ok(DuplicateCheck {
                is_duplicate: true,
                prior_timestamp: Some(millis_to_datetime(prior.scanned_at)),
                elapsed: Some(elapsed_between(prior.scanned_at, now_millis)),
            }),
            None => Ok(DuplicateCheck::clear()),
        }
    }

    /// Register `item_code` for the employee unless the pair already holds
    /// the current dedup slot
    pub async fn commit_scan(
        &self,
        employee_badge_code: &str,
        item_code: &str,
    ) -> AppResult<CommitOutcome> {
        self.commit_scan_at(employee_badge_code, item_code, Utc::now())
            .await
    }

    /// [`commit_scan`](Self::commit_scan) recorded at `now` (truncated to seconds)
    pub async fn commit_scan_at(
        &self,
        employee_badge_code: &str,
        item_code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<CommitOutcome> {
        if !self.policy.item_code.matches(item_code) {
            return Err(AppError::with_message(
                ErrorCode::InvalidItemCode,
                format!("Item code must have exactly {}", self.policy.item_code),
            )
            .with_detail("item_code", item_code));
        }
        if employee_badge_code.trim().is_empty() {
            return Err(AppError::new(ErrorCode::NoActiveEmployee));
        }

        let scanned_at = shared::util::truncate_to_secs(now.timestamp_millis());

        // Rows from an earlier daily policy live outside bucket 0
        if self.policy.duplicates == DuplicatePolicy::Permanent {
            if let Some(prior) = self
                .blocking_scan(employee_badge_code, item_code, scanned_at)
                .await?
            {
                return Ok(CommitOutcome::Duplicate(self.reject(prior, now).await));
            }
        }

        let dedup_bucket = self.policy.bucket_at(scanned_at);
        let data = ScanEventCreate {
            employee_badge_code: employee_badge_code.to_string(),
            item_code: item_code.to_string(),
            scanned_at,
            dedup_bucket,
        };

        match bounded(
            self.policy.store_timeout,
            "scan_event.insert",
            scan_event::insert(&self.pool, data),
        )
        .await
        {
            Ok(event) => {
                tracing::info!(
                    badge = %event.employee_badge_code,
                    item = %event.item_code,
                    scan_id = event.id,
                    "Scan registered"
                );
                Ok(CommitOutcome::Committed(event))
            }
            Err(err) if err.is_duplicate_on("dedup_bucket") => {
                let prior = bounded(
                    self.policy.store_timeout,
                    "scan_event.find_latest_in_bucket",
                    scan_event::find_latest_in_bucket(
                        &self.pool,
                        employee_badge_code,
                        item_code,
                        dedup_bucket,
                    ),
                )
                .await?
                .ok_or_else(|| {
                    AppError::database("Dedup slot is taken but no ledger row holds it")
                })?;
                Ok(CommitOutcome::Duplicate(self.reject(prior, now).await))
            }
            Err(RepoError::Duplicate(columns)) => Err(AppError::database(format!(
                "Unexpected constraint violation on {columns}"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// The ledger row that blocks the pair at `now_millis`, if any
    ///
    /// `Permanent` is blocked by a row in any bucket; `PerBusinessDay` only by
    /// the row holding the current business day's slot.
    async fn blocking_scan(
        &self,
        employee_badge_code: &str,
        item_code: &str,
        now_millis: i64,
    ) -> AppResult<Option<ScanEvent>> {
        let found = match self.policy.duplicates {
            DuplicatePolicy::Permanent => {
                bounded(
                    self.policy.store_timeout,
                    "scan_event.find_latest",
                    scan_event::find_latest(&self.pool, employee_badge_code, item_code),
                )
                .await?
            }
            DuplicatePolicy::PerBusinessDay => {
                bounded(
                    self.policy.store_timeout,
                    "scan_event.find_latest_in_bucket",
                    scan_event::find_latest_in_bucket(
                        &self.pool,
                        employee_badge_code,
                        item_code,
                        self.policy.bucket_at(now_millis),
                    ),
                )
                .await?
            }
        };
        Ok(found)
    }

    /// Describe a rejected repeat of `prior`; the scanner's name is best effort
    async fn reject(&self, prior: ScanEvent, now: DateTime<Utc>) -> DuplicateInfo {
        let employee_name = match bounded(
            self.policy.store_timeout,
            "employee.find_by_badge",
            employee::find_by_badge(&self.pool, &prior.employee_badge_code),
        )
        .await
        {
            Ok(found) => found.map(|e| e.name),
            Err(e) => {
                tracing::warn!(error = %e, "Could not resolve prior scanner name");
                None
            }
        };

        let info = DuplicateInfo {
            employee_badge_code: prior.employee_badge_code,
            employee_name,
            item_code: prior.item_code,
            prior_timestamp: millis_to_datetime(prior.scanned_at),
            elapsed: elapsed_between(prior.scanned_at, now.timestamp_millis()),
        };
        tracing::warn!(
            badge = %info.employee_badge_code,
            item = %info.item_code,
            prior = %info.prior_timestamp,
            "Duplicate scan rejected"
        );
        info
    }
}

fn elapsed_between(earlier_millis: i64, now_millis: i64) -> Duration {
    let millis = now_millis.saturating_sub(earlier_millis).max(0);
    Duration::from_millis(millis as u64)
}
