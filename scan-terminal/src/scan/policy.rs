//! Scan policy: accepted code formats and duplicate window

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::Datelike;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use shared::util::is_digits;

use crate::utils::time::business_date;

/// Fixed-length, digits-only code (item labels, badges)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFormat {
    pub length: usize,
}

impl CodeFormat {
    pub const fn digits(length: usize) -> Self {
        Self { length }
    }

    pub fn matches(&self, code: &str) -> bool {
        code.len() == self.length && is_digits(code)
    }
}

impl fmt::Display for CodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} digits", self.length)
    }
}

/// How long a registered (employee, item) pair blocks a repeat scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// A pair can be registered once, ever
    #[default]
    Permanent,
    /// A pair can be registered once per business day
    PerBusinessDay,
}

impl DuplicatePolicy {
    /// Dedup bucket for an event recorded at `millis`
    ///
    /// `Permanent` always yields 0. `PerBusinessDay` yields the business date
    /// as days since 0001-01-01, which is never 0 for real timestamps.
    pub fn bucket_at(&self, millis: i64, tz: Tz) -> i64 {
        match self {
            DuplicatePolicy::Permanent => 0,
            DuplicatePolicy::PerBusinessDay => {
                i64::from(business_date(millis, tz).num_days_from_ce())
            }
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permanent" => Ok(DuplicatePolicy::Permanent),
            "daily" | "per_business_day" => Ok(DuplicatePolicy::PerBusinessDay),
            other => Err(format!("unknown duplicate policy: {other}")),
        }
    }
}

/// Everything the engine needs to judge a scan
#[derive(Debug, Clone, Copy)]
pub struct ScanPolicy {
    pub item_code: CodeFormat,
    pub badge_code: CodeFormat,
    pub duplicates: DuplicatePolicy,
    /// Business timezone for day buckets and display
    pub timezone: Tz,
    /// Upper bound on each store call
    pub store_timeout: Duration,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            item_code: CodeFormat::digits(12),
            badge_code: CodeFormat::digits(11),
            duplicates: DuplicatePolicy::Permanent,
            timezone: chrono_tz::America::Sao_Paulo,
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl ScanPolicy {
    pub fn bucket_at(&self, millis: i64) -> i64 {
        self.duplicates.bucket_at(millis, self.timezone)
    }
}
