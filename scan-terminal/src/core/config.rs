use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;

use crate::scan::{CodeFormat, DuplicatePolicy, ScanPolicy};
use crate::workflow::WorkflowOptions;

/// 终端配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_PATH | ./requisition.db | SQLite 数据库文件 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (stdout) | 日志目录 (按天滚动) |
/// | ITEM_CODE_LENGTH | 12 | 物料条码位数 |
/// | BADGE_CODE_LENGTH | 11 | 工牌条码位数 |
/// | DUPLICATE_POLICY | permanent | permanent / daily |
/// | BUSINESS_TIMEZONE | America/Sao_Paulo | 业务时区 |
/// | STORE_TIMEOUT_MS | 5000 | 单次存储调用超时(毫秒) |
/// | NOTICE_DISPLAY_MS | 3000 | 提示显示时长(毫秒) |
/// | RETURN_TO_IDENTITY_AFTER_COMMIT | false | 登记后回到工牌扫描 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_PATH=/data/requisition.db DUPLICATE_POLICY=daily scan-terminal
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub item_code_length: usize,
    pub badge_code_length: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub business_timezone: Tz,
    pub store_timeout_ms: u64,
    pub notice_display_ms: u64,
    pub return_to_identity_after_commit: bool,
    /// 运行环境: development | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test maps)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "./requisition.db".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|d| !d.trim().is_empty()),
            item_code_length: parsed::<usize>(&lookup, "ITEM_CODE_LENGTH")
                .filter(|n| *n > 0)
                .unwrap_or(12),
            badge_code_length: parsed::<usize>(&lookup, "BADGE_CODE_LENGTH")
                .filter(|n| *n > 0)
                .unwrap_or(11),
            duplicate_policy: parsed(&lookup, "DUPLICATE_POLICY").unwrap_or_default(),
            business_timezone: parsed(&lookup, "BUSINESS_TIMEZONE")
                .unwrap_or(chrono_tz::America::Sao_Paulo),
            store_timeout_ms: parsed(&lookup, "STORE_TIMEOUT_MS").unwrap_or(5000),
            notice_display_ms: parsed(&lookup, "NOTICE_DISPLAY_MS").unwrap_or(3000),
            return_to_identity_after_commit: parsed(&lookup, "RETURN_TO_IDENTITY_AFTER_COMMIT")
                .unwrap_or(false),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    /// Default configuration pointed at another database file
    ///
    /// 常用于测试场景
    pub fn with_database(database_path: impl Into<String>) -> Self {
        let mut config = Self::from_lookup(|_| None);
        config.database_path = database_path.into();
        config
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn scan_policy(&self) -> ScanPolicy {
        ScanPolicy {
            item_code: CodeFormat::digits(self.item_code_length),
            badge_code: CodeFormat::digits(self.badge_code_length),
            duplicates: self.duplicate_policy,
            timezone: self.business_timezone,
            store_timeout: self.store_timeout(),
        }
    }

    pub fn workflow_options(&self) -> WorkflowOptions {
        WorkflowOptions {
            badge_code: CodeFormat::digits(self.badge_code_length),
            notice_display: Duration::from_millis(self.notice_display_ms),
            return_to_identity_after_commit: self.return_to_identity_after_commit,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %value, error = %e, "Ignoring invalid config value, using default");
            None
        }
    }
}
