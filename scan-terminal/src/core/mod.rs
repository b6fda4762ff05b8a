//! 核心模块 - 终端配置和状态
//!
//! - [`Config`] - 终端配置
//! - [`AppState`] - 数据库连接与服务集合

pub mod config;
pub mod state;

pub use config::Config;
pub use state::AppState;
