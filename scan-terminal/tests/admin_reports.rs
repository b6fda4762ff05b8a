//! 管理端 - 员工登记、管理员账号、报表

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::*;
use scan_terminal::services::ReportService;
use scan_terminal::utils::time::DateRange;
use scan_terminal::{CommitOutcome, ErrorCode};
use shared::models::{AdminCreate, Sector, SectorCount};

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

#[tokio::test]
async fn admin_bootstrap_gate_and_login() {
    let t = terminal().await;
    let admins = &t.state.admins;

    admins
        .register(
            None,
            AdminCreate {
                username: "supervisor".into(),
                password: "turno-a-2025".into(),
            },
        )
        .await
        .unwrap();

    let err = admins
        .register(
            None,
            AdminCreate {
                username: "outsider".into(),
                password: "turno-b-2025".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::AdminRequired);

    assert_eq!(
        admins.login("supervisor", "wrong").await.unwrap_err().code,
        ErrorCode::InvalidCredentials
    );
    let session = admins.login(" supervisor ", "turno-a-2025").await.unwrap();
    admins
        .register(
            Some(&session),
            AdminCreate {
                username: "lead".into(),
                password: "turno-b-2025".into(),
            },
        )
        .await
        .unwrap();
    admins.login("lead", "turno-b-2025").await.unwrap();
}

#[tokio::test]
async fn employee_admin_operations() {
    let t = terminal().await;
    let ana = register(&t.state, "Ana", ANA_BADGE, Sector::Xarope).await;
    let bia = register(&t.state, "Bia", BIA_BADGE, Sector::Xarope).await;
    let caio = register(&t.state, "Caio", "99988877766", Sector::Sache).await;

    let summary = t.state.employees.sector_summary().await.unwrap();
    assert!(summary.contains(&SectorCount { sector: Sector::Xarope, total: 2 }));
    assert!(summary.contains(&SectorCount { sector: Sector::Sache, total: 1 }));

    let mut sectors = t.state.reports.sectors().await.unwrap();
    sectors.sort_by_key(|s| s.as_str());
    assert_eq!(sectors, vec![Sector::Sache, Sector::Xarope]);

    assert_eq!(t.state.employees.delete_many(&[ana.id, bia.id]).await.unwrap(), 2);
    let remaining = t.state.employees.list().await.unwrap();
    assert_eq!(remaining, vec![caio]);
}

#[tokio::test]
async fn reports_over_a_date_range() {
    let t = terminal().await;
    register(&t.state, "Ana", ANA_BADGE, Sector::Xarope).await;
    register(&t.state, "Bia", BIA_BADGE, Sector::Xarope).await;
    register(&t.state, "Caio", "99988877766", Sector::Sache).await;
    let engine = &t.state.engine;

    // 2025-03-01 08:00 and 2025-03-02 08:00 Sao Paulo
    let day1 = Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap();
    let day2 = Utc.with_ymd_and_hms(2025, 3, 2, 11, 0, 0).unwrap();
    for (badge, item, at) in [
        (ANA_BADGE, ITEM_A, day1),
        (ANA_BADGE, ITEM_B, day2),
        ("99988877766", ITEM_A, day2),
    ] {
        assert!(matches!(
            engine.commit_scan_at(badge, item, at).await.unwrap(),
            CommitOutcome::Committed(_)
        ));
    }

    let both_days = DateRange::new(march(1), march(2)).unwrap();
    let synthetic = t.state.reports.synthetic(both_days, Some(Sector::Xarope)).await.unwrap();
    let totals: Vec<(&str, i64)> = synthetic
        .iter()
        .map(|r| (r.employee_name.as_str(), r.total_scans))
        .collect();
    assert_eq!(totals, vec![("Ana", 2), ("Bia", 0)]);

    let first_day = t.state.reports.synthetic(DateRange::single(march(1)), None).await.unwrap();
    assert_eq!(first_day.len(), 3);
    assert_eq!(first_day.iter().map(|r| r.total_scans).sum::<i64>(), 1);

    let analytic = t.state.reports.analytic(both_days, None).await.unwrap();
    let rows: Vec<(&str, &str)> = analytic
        .iter()
        .map(|r| (r.employee_name.as_str(), r.item_code.as_str()))
        .collect();
    // By name, then newest first
    assert_eq!(rows, vec![("Ana", ITEM_B), ("Ana", ITEM_A), ("Caio", ITEM_A)]);
    assert_eq!(analytic[2].sector, Sector::Sache);

    let by_employee = t
        .state
        .reports
        .list_scans(both_days, Some(ANA_BADGE), None)
        .await
        .unwrap();
    assert_eq!(by_employee.len(), 2);
    assert!(by_employee[0].scanned_at < by_employee[1].scanned_at);
}

#[tokio::test]
async fn synthetic_report_downloads_as_csv() {
    let t = terminal().await;
    register(&t.state, "Ana", ANA_BADGE, Sector::Xarope).await;
    register(&t.state, "Bia", BIA_BADGE, Sector::Xarope).await;
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap();
    t.state.engine.commit_scan_at(ANA_BADGE, ITEM_A, at).await.unwrap();
    t.state.engine.commit_scan_at(ANA_BADGE, ITEM_B, at).await.unwrap();

    let range = DateRange::new(march(1), march(2)).unwrap();
    let text = t.state.reports.synthetic_csv(range, Some(Sector::Xarope)).await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Name,Badge Code,Sector,Total Scans",
            "Ana,11122233344,Xarope,2",
            "Bia,55566677788,Xarope,0",
        ]
    );
    assert_eq!(
        ReportService::synthetic_csv_name(range),
        "synthetic_report_2025-03-01_to_2025-03-02.csv"
    );
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let err = DateRange::new(march(2), march(1)).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidDateRange);
    let err = DateRange::parse("2025-03-01", "yesterday").unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}
