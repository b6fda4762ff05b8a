/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Drop the sub-second part of a millis timestamp
///
/// Scan events are recorded with second precision.
pub fn truncate_to_secs(millis: i64) -> i64 {
    millis.div_euclid(1000) * 1000
}

/// True when `code` is non-empty and made only of ASCII digits
pub fn is_digits(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())
}
