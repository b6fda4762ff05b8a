//! Employee administration

use std::time::Duration;

use shared::models::{Employee, EmployeeCreate, Sector, SectorCount};
use sqlx::SqlitePool;

use crate::db::bounded;
use crate::db::repository::employee;
use crate::scan::CodeFormat;
use crate::utils::validation::{MAX_NAME_LEN, validate_national_id, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Parse a sector name as typed on the registration form
pub fn parse_sector(value: &str) -> AppResult<Sector> {
    value
        .parse::<Sector>()
        .map_err(|e| AppError::with_message(ErrorCode::InvalidSector, e.to_string()))
}

#[derive(Clone)]
pub struct EmployeeService {
    pool: SqlitePool,
    badge_code: CodeFormat,
    store_timeout: Duration,
}

impl EmployeeService {
    pub fn new(pool: SqlitePool, badge_code: CodeFormat, store_timeout: Duration) -> Self {
        Self {
            pool,
            badge_code,
            store_timeout,
        }
    }

    /// Register a new employee
    ///
    /// The badge code defaults to the national id. On a uniqueness violation
    /// nothing is written.
    pub async fn register(&self, data: EmployeeCreate) -> AppResult<Employee> {
        let name = data.name.trim().to_string();
        validate_required_text(&name, "name", MAX_NAME_LEN)?;

        let national_id = data.national_id.trim().to_string();
        validate_national_id(&national_id)?;

        let badge_code = match data.badge_code.as_deref().map(str::trim) {
            Some(badge) if !badge.is_empty() => badge.to_string(),
            _ => national_id.clone(),
        };
        if !self.badge_code.matches(&badge_code) {
            return Err(AppError::with_message(
                ErrorCode::InvalidBadgeCode,
                format!("Badge code must have exactly {}", self.badge_code),
            ));
        }

        let create = EmployeeCreate {
            name,
            national_id,
            sector: data.sector,
            badge_code: Some(badge_code),
        };
        let now = shared::util::now_millis();

        match bounded(self.store_timeout, "employee.insert", employee::insert(&self.pool, create, now)).await {
            Ok(emp) => {
                tracing::info!(id = emp.id, badge = %emp.badge_code, sector = %emp.sector, "Employee registered");
                Ok(emp)
            }
            Err(e) if e.is_duplicate_on("national_id") => {
                Err(AppError::new(ErrorCode::EmployeeNationalIdExists))
            }
            Err(e) if e.is_duplicate_on("badge_code") => {
                Err(AppError::new(ErrorCode::EmployeeBadgeExists))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        Ok(bounded(self.store_timeout, "employee.find_all", employee::find_all(&self.pool)).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Employee> {
        bounded(self.store_timeout, "employee.find_by_id", employee::find_by_id(&self.pool, id))
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound).with_detail("id", id))
    }

    pub async fn find_by_badge(&self, badge_code: &str) -> AppResult<Option<Employee>> {
        Ok(bounded(
            self.store_timeout,
            "employee.find_by_badge",
            employee::find_by_badge(&self.pool, badge_code),
        )
        .await?)
    }

    /// Remove one employee. Their ledger entries are kept.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let deleted =
            bounded(self.store_timeout, "employee.delete", employee::delete(&self.pool, id)).await?;
        if !deleted {
            return Err(AppError::new(ErrorCode::EmployeeNotFound).with_detail("id", id));
        }
        tracing::info!(id, "Employee deleted");
        Ok(())
    }

    /// Remove several employees, returning how many existed
    pub async fn delete_many(&self, ids: &[i64]) -> AppResult<u64> {
        let deleted = bounded(
            self.store_timeout,
            "employee.delete_many",
            employee::delete_many(&self.pool, ids),
        )
        .await?;
        tracing::info!(requested = ids.len(), deleted, "Employees deleted");
        Ok(deleted)
    }

    /// Headcount per sector for the admin dashboard
    pub async fn sector_summary(&self) -> AppResult<Vec<SectorCount>> {
        Ok(bounded(
            self.store_timeout,
            "employee.count_by_sector",
            employee::count_by_sector(&self.pool),
        )
        .await?)
    }
}
