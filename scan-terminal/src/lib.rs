//! Requisition scan terminal
//!
//! # 架构概述
//!
//! A factory-floor terminal: an employee scans their badge, then scans item
//! labels. Each (employee, item) pair is registered at most once under the
//! configured duplicate policy.
//!
//! - **扫描引擎** (`scan`): badge lookup, duplicate probe, atomic commit
//! - **工作流** (`workflow`): session state machine and operator notices
//! - **数据库** (`db`): SQLite (WAL) via sqlx, one repository per table
//! - **管理服务** (`services`): employees, admin accounts, reports
//! - **认证** (`auth`): Argon2 admin credentials
//!
//! # 模块结构
//!
//! ```text
//! scan-terminal/src/
//! ├── core/          # 配置、状态
//! ├── auth/          # 管理员密码与会话
//! ├── scan/          # 扫描策略与引擎
//! ├── workflow/      # 终端状态机
//! ├── services/      # 员工、管理员、报表
//! ├── db/            # 数据库层
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod auth;
pub mod core;
pub mod db;
pub mod scan;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export 公共类型
pub use auth::AdminSession;
pub use crate::core::{AppState, Config};
pub use scan::{AuthOutcome, CommitOutcome, DuplicateCheck, DuplicateInfo, ScanEngine, ScanPolicy};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use workflow::{InputSource, Notice, NoticeLevel, ScanInput, TerminalState, WorkflowController};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
  ____                  _____                   _             _
 / ___|  ___ __ _ _ __ |_   _|__ _ __ _ __ ___ (_)_ __   __ _| |
 \___ \ / __/ _` | '_ \  | |/ _ \ '__| '_ ` _ \| | '_ \ / _` | |
  ___) | (_| (_| | | | | | |  __/ |  | | | | | | | | | | (_| | |
 |____/ \___\__,_|_| |_| |_|\___|_|  |_| |_| |_|_|_| |_|\__,_|_|
    "#
    );
}
