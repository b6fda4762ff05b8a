//! 时间工具函数 — 业务时区转换
//!
//! 日期→时间戳转换统一在 service 层完成，
//! repository 层只接收 `i64` Unix millis。

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult, ErrorCode};

/// Display format for timestamps shown to operators and in reports
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 本地零点不存在时 fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Unix millis → `DateTime<Utc>`, clamping values chrono cannot represent
pub fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Business date a timestamp falls on
pub fn business_date(millis: i64, tz: Tz) -> NaiveDate {
    millis_to_datetime(millis).with_timezone(&tz).date_naive()
}

/// Render a timestamp in the business timezone
pub fn format_millis(millis: i64, tz: Tz) -> String {
    format_datetime(millis_to_datetime(millis), tz)
}

pub fn format_datetime(dt: DateTime<Utc>, tz: Tz) -> String {
    dt.with_timezone(&tz).format(DISPLAY_FORMAT).to_string()
}

/// Elapsed time as `"{m} min {s} s"`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{} min {} s", total / 60, total % 60)
}

/// Inclusive range of business dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> AppResult<Self> {
        if from > to {
            return Err(AppError::with_message(
                ErrorCode::InvalidDateRange,
                format!("Start date {} is after end date {}", from, to),
            ));
        }
        Ok(Self { from, to })
    }

    /// Parse two `YYYY-MM-DD` strings
    pub fn parse(from: &str, to: &str) -> AppResult<Self> {
        Self::new(parse_date(from)?, parse_date(to)?)
    }

    /// A range covering one business date
    pub fn single(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    /// `[start, end)` in unix millis for the business timezone
    pub fn to_millis(&self, tz: Tz) -> (i64, i64) {
        (day_start_millis(self.from, tz), day_end_millis(self.to, tz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAO_PAULO: Tz = chrono_tz::America::Sao_Paulo;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("01/03/2025").is_err());
    }

    #[test]
    fn test_day_bounds_in_business_timezone() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        // UTC-3, no DST since 2019
        assert_eq!(day_start_millis(date, SAO_PAULO), 1_740_798_000_000);
        assert_eq!(
            day_end_millis(date, SAO_PAULO) - day_start_millis(date, SAO_PAULO),
            86_400_000
        );
    }

    #[test]
    fn test_format_millis() {
        // 2025-03-01 11:00:00 UTC
        assert_eq!(
            format_millis(1_740_826_800_000, SAO_PAULO),
            "2025-03-01 08:00:00"
        );
        assert_eq!(
            business_date(1_740_798_000_000 - 1, SAO_PAULO),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0 min 0 s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2 min 5 s");
        assert_eq!(format_elapsed(Duration::from_millis(3_599_999)), "59 min 59 s");
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::parse("2025-03-01", "2025-03-02").unwrap();
        let (start, end) = range.to_millis(SAO_PAULO);
        assert_eq!(end - start, 2 * 86_400_000);

        let err = DateRange::parse("2025-03-02", "2025-03-01").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDateRange);
    }
}
