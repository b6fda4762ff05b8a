use crate::core::Config;
use crate::db::DbService;
use crate::scan::ScanEngine;
use crate::services::{AdminService, EmployeeService, ReportService};
use crate::utils::AppResult;
use crate::workflow::WorkflowController;

/// 终端状态 - 持有数据库连接和所有服务
///
/// Cloning is cheap: every service shares the same pool.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbService,
    pub engine: ScanEngine,
    pub employees: EmployeeService,
    pub admins: AdminService,
    pub reports: ReportService,
}

impl AppState {
    /// 初始化终端状态
    ///
    /// 1. 打开数据库并执行迁移
    /// 2. 构建扫描引擎和管理服务
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        // 1. Database
        let store_timeout = config.store_timeout();
        let db = DbService::new(&config.database_path, store_timeout).await?;
        let pool = db.pool.clone();

        // 2. Engine and services
        let policy = config.scan_policy();
        let engine = ScanEngine::new(pool.clone(), policy);
        let employees = EmployeeService::new(pool.clone(), policy.badge_code, store_timeout);
        let admins = AdminService::new(pool.clone(), store_timeout);
        let reports = ReportService::new(pool, policy.timezone, store_timeout);

        tracing::info!(
            item_code = %policy.item_code,
            badge_code = %policy.badge_code,
            duplicates = ?policy.duplicates,
            timezone = %policy.timezone,
            "Terminal state initialized"
        );

        Ok(Self {
            config: config.clone(),
            db,
            engine,
            employees,
            admins,
            reports,
        })
    }

    /// A fresh session controller, starting at the badge prompt
    pub fn workflow(&self) -> WorkflowController {
        WorkflowController::new(self.engine.clone(), self.config.workflow_options())
    }
}
