//! Employee Repository (identity store)

use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate, Sector, SectorCount};
use sqlx::SqlitePool;

const EMPLOYEE_SELECT: &str =
    "SELECT id, badge_code, name, sector, national_id, created_at FROM employee";

pub async fn find_by_badge(pool: &SqlitePool, badge_code: &str) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE badge_code = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(badge_code)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    let employee = sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// All employees, ordered by name
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} ORDER BY name, id");
    let employees = sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await?;
    Ok(employees)
}

/// Insert an employee; `badge_code` must already be resolved by the caller
///
/// A unique violation comes back as [`RepoError::Duplicate`] naming the column.
pub async fn insert(pool: &SqlitePool, data: EmployeeCreate, now: i64) -> RepoResult<Employee> {
    let badge_code = data
        .badge_code
        .ok_or_else(|| RepoError::Validation("badge_code is required".into()))?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO employee (badge_code, name, sector, national_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
    )
    .bind(&badge_code)
    .bind(&data.name)
    .bind(data.sector)
    .bind(&data.national_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Delete several employees at once, returning how many rows went away
pub async fn delete_many(pool: &SqlitePool, ids: &[i64]) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    // Variable number of IN placeholders, bound one by one
    let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");
    let sql = format!("DELETE FROM employee WHERE id IN ({placeholders})");
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query.execute(pool).await?;
    Ok(rows.rows_affected())
}

/// Employee count per sector (sectors without employees are omitted)
pub async fn count_by_sector(pool: &SqlitePool) -> RepoResult<Vec<SectorCount>> {
    let counts = sqlx::query_as::<_, SectorCount>(
        "SELECT sector, COUNT(*) AS total FROM employee GROUP BY sector ORDER BY sector",
    )
    .fetch_all(pool)
    .await?;
    Ok(counts)
}

/// Sectors that have at least one employee
pub async fn distinct_sectors(pool: &SqlitePool) -> RepoResult<Vec<Sector>> {
    let sectors: Vec<Sector> =
        sqlx::query_scalar("SELECT DISTINCT sector FROM employee ORDER BY sector")
            .fetch_all(pool)
            .await?;
    Ok(sectors)
}
