//! Shared setup for integration tests: an on-disk database in a temp dir

#![allow(dead_code)]

use scan_terminal::{AppState, Config};
use shared::models::{Employee, EmployeeCreate, Sector};
use tempfile::TempDir;

pub const ANA_BADGE: &str = "11122233344";
pub const BIA_BADGE: &str = "55566677788";
pub const ITEM_A: &str = "100200300400";
pub const ITEM_B: &str = "100200300401";

/// Keep the `TempDir` alive for as long as the state is used
pub struct TestTerminal {
    pub dir: TempDir,
    pub state: AppState,
}

pub async fn terminal() -> TestTerminal {
    terminal_with(|_| {}).await
}

pub async fn terminal_with(tweak: impl FnOnce(&mut Config)) -> TestTerminal {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("requisition.db");
    let mut config = Config::with_database(path.to_string_lossy());
    tweak(&mut config);
    let state = AppState::initialize(&config).await.expect("state");
    TestTerminal { dir, state }
}

pub async fn register(state: &AppState, name: &str, badge: &str, sector: Sector) -> Employee {
    state
        .employees
        .register(EmployeeCreate {
            name: name.into(),
            national_id: badge.into(),
            sector,
            badge_code: None,
        })
        .await
        .expect("register employee")
}
