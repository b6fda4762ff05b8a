//! Requisition reports over the scan ledger
//!
//! All ranges are inclusive business dates converted to `[start, end)` millis
//! in the business timezone before reaching the repository.

use std::time::Duration;

use chrono_tz::Tz;
use shared::models::{EmployeeScanTotal, ScanEvent, ScanEventDetail, ScanFilter, Sector};
use sqlx::SqlitePool;

use crate::db::bounded;
use crate::db::repository::{employee, scan_event};
use crate::utils::{AppError, AppResult};
use crate::utils::time::DateRange;

#[derive(Clone)]
pub struct ReportService {
    pool: SqlitePool,
    timezone: Tz,
    store_timeout: Duration,
}

impl ReportService {
    pub fn new(pool: SqlitePool, timezone: Tz, store_timeout: Duration) -> Self {
        Self {
            pool,
            timezone,
            store_timeout,
        }
    }

    fn filter(&self, range: DateRange, employee_badge_code: Option<&str>, sector: Option<Sector>) -> ScanFilter {
        let (from_millis, to_millis) = range.to_millis(self.timezone);
        ScanFilter {
            from_millis,
            to_millis,
            employee_badge_code: employee_badge_code.map(str::to_string),
            sector,
        }
    }

    /// Raw ledger rows, oldest first
    pub async fn list_scans(
        &self,
        range: DateRange,
        employee_badge_code: Option<&str>,
        sector: Option<Sector>,
    ) -> AppResult<Vec<ScanEvent>> {
        let filter = self.filter(range, employee_badge_code, sector);
        Ok(bounded(self.store_timeout, "scan_event.list", scan_event::list(&self.pool, &filter)).await?)
    }

    /// One row per scan with the employee's name and sector
    pub async fn analytic(
        &self,
        range: DateRange,
        sector: Option<Sector>,
    ) -> AppResult<Vec<ScanEventDetail>> {
        let filter = self.filter(range, None, sector);
        let rows = bounded(
            self.store_timeout,
            "scan_event.list_detailed",
            scan_event::list_detailed(&self.pool, &filter),
        )
        .await?;
        tracing::debug!(rows = rows.len(), from = %range.from, to = %range.to, "Analytic report built");
        Ok(rows)
    }

    /// Scan totals per employee, zero included
    pub async fn synthetic(
        &self,
        range: DateRange,
        sector: Option<Sector>,
    ) -> AppResult<Vec<EmployeeScanTotal>> {
        let filter = self.filter(range, None, sector);
        let rows = bounded(
            self.store_timeout,
            "scan_event.count_by_employee",
            scan_event::count_by_employee(&self.pool, &filter),
        )
        .await?;
        tracing::debug!(rows = rows.len(), from = %range.from, to = %range.to, "Synthetic report built");
        Ok(rows)
    }

    /// Synthetic report as CSV text, header row first
    pub async fn synthetic_csv(&self, range: DateRange, sector: Option<Sector>) -> AppResult<String> {
        let rows = self.synthetic(range, sector).await?;
        synthetic_to_csv(&rows)
    }

    /// Download name for a synthetic CSV over `range`
    pub fn synthetic_csv_name(range: DateRange) -> String {
        format!("synthetic_report_{}_to_{}.csv", range.from, range.to)
    }

    /// Sectors with at least one employee, for report filters
    pub async fn sectors(&self) -> AppResult<Vec<Sector>> {
        Ok(bounded(
            self.store_timeout,
            "employee.distinct_sectors",
            employee::distinct_sectors(&self.pool),
        )
        .await?)
    }
}

fn synthetic_to_csv(rows: &[EmployeeScanTotal]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_err = |e: csv::Error| AppError::internal(format!("CSV write failed: {e}"));

    writer
        .write_record(["Name", "Badge Code", "Sector", "Total Scans"])
        .map_err(csv_err)?;
    for row in rows {
        let total = row.total_scans.to_string();
        writer
            .write_record([
                row.employee_name.as_str(),
                row.employee_badge_code.as_str(),
                row.sector.as_str(),
                total.as_str(),
            ])
            .map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_to_csv_quotes_fields() {
        let rows = vec![
            EmployeeScanTotal {
                employee_name: "Souza, Ana".into(),
                employee_badge_code: "11122233344".into(),
                sector: Sector::PesoMedio,
                total_scans: 3,
            },
            EmployeeScanTotal {
                employee_name: "Bia".into(),
                employee_badge_code: "55566677788".into(),
                sector: Sector::Sache,
                total_scans: 0,
            },
        ];
        let text = synthetic_to_csv(&rows).unwrap();
        assert_eq!(
            text,
            "Name,Badge Code,Sector,Total Scans\n\"Souza, Ana\",11122233344,Peso Médio,3\nBia,55566677788,Sache,0\n"
        );
        assert_eq!(synthetic_to_csv(&[]).unwrap(), "Name,Badge Code,Sector,Total Scans\n");
    }
}
