//! Scan Event Repository (append-only ledger)
//!
//! There is no update or delete path; the schema rejects both with a trigger.

use super::{RepoError, RepoResult};
use shared::models::{EmployeeScanTotal, ScanEvent, ScanEventCreate, ScanEventDetail, ScanFilter};
use sqlx::SqlitePool;

const SCAN_EVENT_SELECT: &str =
    "SELECT id, employee_badge_code, item_code, scanned_at, dedup_bucket FROM scan_event";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ScanEvent>> {
    let sql = format!("{SCAN_EVENT_SELECT} WHERE id = ?");
    let event = sqlx::query_as::<_, ScanEvent>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

/// Most recent event for an (employee, item) pair in any bucket
pub async fn find_latest(
    pool: &SqlitePool,
    employee_badge_code: &str,
    item_code: &str,
) -> RepoResult<Option<ScanEvent>> {
    let sql = format!(
        "{SCAN_EVENT_SELECT} WHERE employee_badge_code = ? AND item_code = ? ORDER BY scanned_at DESC, id DESC LIMIT 1"
    );
    let event = sqlx::query_as::<_, ScanEvent>(&sql)
        .bind(employee_badge_code)
        .bind(item_code)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

/// The event occupying a dedup slot, if any
pub async fn find_latest_in_bucket(
    pool: &SqlitePool,
    employee_badge_code: &str,
    item_code: &str,
    dedup_bucket: i64,
) -> RepoResult<Option<ScanEvent>> {
    let sql = format!(
        "{SCAN_EVENT_SELECT} WHERE employee_badge_code = ? AND item_code = ? AND dedup_bucket = ? ORDER BY scanned_at DESC, id DESC LIMIT 1"
    );
    let event = sqlx::query_as::<_, ScanEvent>(&sql)
        .bind(employee_badge_code)
        .bind(item_code)
        .bind(dedup_bucket)
        .fetch_optional(pool)
        .await?;
    Ok(event)
}

/// Append an event
///
/// Fails with [`RepoError::Duplicate`] when the pair already holds the slot
/// for `dedup_bucket`; the ledger is unchanged in that case.
pub async fn insert(pool: &SqlitePool, data: ScanEventCreate) -> RepoResult<ScanEvent> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO scan_event (employee_badge_code, item_code, scanned_at, dedup_bucket) VALUES (?1, ?2, ?3, ?4) RETURNING id",
    )
    .bind(&data.employee_badge_code)
    .bind(&data.item_code)
    .bind(data.scanned_at)
    .bind(data.dedup_bucket)
    .fetch_one(pool)
    .await?;

    Ok(ScanEvent {
        id,
        employee_badge_code: data.employee_badge_code,
        item_code: data.item_code,
        scanned_at: data.scanned_at,
        dedup_bucket: data.dedup_bucket,
    })
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scan_event")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

fn validate_filter(filter: &ScanFilter) -> RepoResult<()> {
    if filter.from_millis > filter.to_millis {
        return Err(RepoError::Validation(format!(
            "Invalid range: {} > {}",
            filter.from_millis, filter.to_millis
        )));
    }
    Ok(())
}

/// WHERE clause for a filter; binds follow in order: from, to, badge?, sector?
fn where_clause(filter: &ScanFilter) -> String {
    let mut conditions = vec!["s.scanned_at >= ?", "s.scanned_at < ?"];
    if filter.employee_badge_code.is_some() {
        conditions.push("s.employee_badge_code = ?");
    }
    if filter.sector.is_some() {
        conditions.push("e.sector = ?");
    }
    format!(" WHERE {}", conditions.join(" AND "))
}

/// Ledger rows in the filter window, oldest first
pub async fn list(pool: &SqlitePool, filter: &ScanFilter) -> RepoResult<Vec<ScanEvent>> {
    validate_filter(filter)?;
    let join = if filter.sector.is_some() {
        " JOIN employee e ON e.badge_code = s.employee_badge_code"
    } else {
        ""
    };
    let sql = format!(
        "SELECT s.id, s.employee_badge_code, s.item_code, s.scanned_at, s.dedup_bucket FROM scan_event s{join}{} ORDER BY s.scanned_at, s.id",
        where_clause(filter)
    );

    let mut query = sqlx::query_as::<_, ScanEvent>(&sql)
        .bind(filter.from_millis)
        .bind(filter.to_millis);
    if let Some(badge) = &filter.employee_badge_code {
        query = query.bind(badge);
    }
    if let Some(sector) = filter.sector {
        query = query.bind(sector);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Events joined with their employee, by name then newest first
///
/// Events whose badge no longer resolves to an employee are left out.
pub async fn list_detailed(
    pool: &SqlitePool,
    filter: &ScanFilter,
) -> RepoResult<Vec<ScanEventDetail>> {
    validate_filter(filter)?;
    let sql = format!(
        "SELECT e.name AS employee_name, s.employee_badge_code, e.sector, s.item_code, s.scanned_at \
         FROM scan_event s JOIN employee e ON e.badge_code = s.employee_badge_code{} \
         ORDER BY e.name, s.scanned_at DESC, s.id DESC",
        where_clause(filter)
    );

    let mut query = sqlx::query_as::<_, ScanEventDetail>(&sql)
        .bind(filter.from_millis)
        .bind(filter.to_millis);
    if let Some(badge) = &filter.employee_badge_code {
        query = query.bind(badge);
    }
    if let Some(sector) = filter.sector {
        query = query.bind(sector);
    }
    Ok(query.fetch_all(pool).await?)
}

/// Scan totals per employee in the window
///
/// LEFT JOIN so employees without scans in the window report zero.
/// `employee_badge_code` in the filter is ignored.
pub async fn count_by_employee(
    pool: &SqlitePool,
    filter: &ScanFilter,
) -> RepoResult<Vec<EmployeeScanTotal>> {
    validate_filter(filter)?;
    let sector_clause = if filter.sector.is_some() {
        " WHERE e.sector = ?3"
    } else {
        ""
    };
    let sql = format!(
        "SELECT e.name AS employee_name, e.badge_code AS employee_badge_code, e.sector, COUNT(s.id) AS total_scans \
         FROM employee e LEFT JOIN scan_event s \
         ON s.employee_badge_code = e.badge_code AND s.scanned_at >= ?1 AND s.scanned_at < ?2\
         {sector_clause} GROUP BY e.id ORDER BY e.name, e.id"
    );

    let mut query = sqlx::query_as::<_, EmployeeScanTotal>(&sql)
        .bind(filter.from_millis)
        .bind(filter.to_millis);
    if let Some(sector) = filter.sector {
        query = query.bind(sector);
    }
    Ok(query.fetch_all(pool).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{employee, test_pool};
    use shared::models::{EmployeeCreate, Sector};

    fn scan(badge: &str, item: &str, at: i64, bucket: i64) -> ScanEventCreate {
        ScanEventCreate {
            employee_badge_code: badge.into(),
            item_code: item.into(),
            scanned_at: at,
            dedup_bucket: bucket,
        }
    }

    async fn seed_employee(pool: &SqlitePool, name: &str, badge: &str, sector: Sector) {
        employee::insert(
            pool,
            EmployeeCreate {
                name: name.into(),
                national_id: badge.into(),
                sector,
                badge_code: Some(badge.into()),
            },
            0,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_insert_rejects_same_bucket() {
        let pool = test_pool().await;
        let first = insert(&pool, scan("11122233344", "100200300400", 1_000, 0))
            .await
            .unwrap();
        assert_eq!(find_by_id(&pool, first.id).await.unwrap(), Some(first.clone()));

        let err = insert(&pool, scan("11122233344", "100200300400", 2_000, 0))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_on("dedup_bucket"), "{err:?}");
        assert_eq!(count(&pool).await.unwrap(), 1);

        // A different bucket is a different slot
        insert(&pool, scan("11122233344", "100200300400", 90_000_000, 20_000))
            .await
            .unwrap();
        let latest = find_latest(&pool, "11122233344", "100200300400")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.dedup_bucket, 20_000);
        let in_zero = find_latest_in_bucket(&pool, "11122233344", "100200300400", 0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(in_zero, first);
    }

    #[tokio::test]
    async fn test_ledger_is_append_only() {
        let pool = test_pool().await;
        insert(&pool, scan("11122233344", "100200300400", 1_000, 0))
            .await
            .unwrap();

        assert!(sqlx::query("UPDATE scan_event SET scanned_at = 0").execute(&pool).await.is_err());
        assert!(sqlx::query("DELETE FROM scan_event").execute(&pool).await.is_err());
        assert_eq!(count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let pool = test_pool().await;
        seed_employee(&pool, "Ana", "11111111111", Sector::Xarope).await;
        seed_employee(&pool, "Bia", "22222222222", Sector::Sache).await;
        insert(&pool, scan("11111111111", "000000000001", 1_000, 0)).await.unwrap();
        insert(&pool, scan("22222222222", "000000000001", 2_000, 0)).await.unwrap();
        insert(&pool, scan("22222222222", "000000000002", 5_000, 0)).await.unwrap();

        let window = ScanFilter {
            from_millis: 0,
            to_millis: 5_000,
            ..Default::default()
        };
        assert_eq!(list(&pool, &window).await.unwrap().len(), 2);

        let by_sector = ScanFilter {
            from_millis: 0,
            to_millis: 10_000,
            sector: Some(Sector::Sache),
            ..Default::default()
        };
        let rows = list(&pool, &by_sector).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.employee_badge_code == "22222222222"));

        let detailed = list_detailed(&pool, &by_sector).await.unwrap();
        assert_eq!(detailed[0].employee_name, "Bia");
        assert_eq!(detailed[0].scanned_at, 5_000);

        let bad = ScanFilter {
            from_millis: 10,
            to_millis: 0,
            ..Default::default()
        };
        assert!(matches!(list(&pool, &bad).await, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn test_count_by_employee_includes_zero() {
        let pool = test_pool().await;
        seed_employee(&pool, "Ana", "11111111111", Sector::Xarope).await;
        seed_employee(&pool, "Bia", "22222222222", Sector::Xarope).await;
        insert(&pool, scan("11111111111", "000000000001", 1_000, 0)).await.unwrap();
        insert(&pool, scan("11111111111", "000000000002", 2_000, 0)).await.unwrap();

        let filter = ScanFilter {
            from_millis: 0,
            to_millis: 10_000,
            ..Default::default()
        };
        let totals = count_by_employee(&pool, &filter).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!((totals[0].employee_name.as_str(), totals[0].total_scans), ("Ana", 2));
        assert_eq!((totals[1].employee_name.as_str(), totals[1].total_scans), ("Bia", 0));
    }
}
