//! Terminal session workflow
//!
//! The controller owns the session state and turns each operator input into
//! one engine call plus a [`Notice`] for the display. Every input source goes
//! through the same path.
//!
//! ```text
//! AwaitingIdentity --badge ok--> AwaitingItemScan{employee}
//! AwaitingItemScan --item (any outcome)--> AwaitingItemScan
//! AwaitingItemScan --logout--> AwaitingIdentity
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::models::EmployeeIdentity;

use crate::scan::{AuthOutcome, CodeFormat, CommitOutcome, ScanEngine};
use crate::utils::time::{format_datetime, format_millis};
use crate::utils::{AppError, ErrorCode};

/// Session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    #[default]
    AwaitingIdentity,
    AwaitingItemScan { employee: EmployeeIdentity },
}

impl TerminalState {
    pub fn employee(&self) -> Option<&EmployeeIdentity> {
        match self {
            TerminalState::AwaitingIdentity => None,
            TerminalState::AwaitingItemScan { employee } => Some(employee),
        }
    }
}

/// Where an input line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    Keyboard,
    Scanner,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanInput {
    pub raw: String,
    pub source: InputSource,
}

impl ScanInput {
    pub fn new(raw: impl Into<String>, source: InputSource) -> Self {
        Self {
            raw: raw.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Message for the operator display
///
/// `display_for` is a hint for the presentation layer; nothing blocks on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub display_for: Duration,
    /// Set when the notice reports an error
    pub code: Option<ErrorCode>,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkflowOptions {
    pub badge_code: CodeFormat,
    pub notice_display: Duration,
    pub return_to_identity_after_commit: bool,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            badge_code: CodeFormat::digits(11),
            notice_display: Duration::from_secs(3),
            return_to_identity_after_commit: false,
        }
    }
}

pub struct WorkflowController {
    engine: ScanEngine,
    options: WorkflowOptions,
    state: TerminalState,
}

impl WorkflowController {
    pub fn new(engine: ScanEngine, options: WorkflowOptions) -> Self {
        Self {
            engine,
            options,
            state: TerminalState::AwaitingIdentity,
        }
    }

    pub fn state(&self) -> &TerminalState {
        &self.state
    }

    /// Prompt matching the current state
    pub fn prompt(&self) -> String {
        match &self.state {
            TerminalState::AwaitingIdentity => "Scan your badge".to_string(),
            TerminalState::AwaitingItemScan { employee } => {
                format!("{}: scan an item", employee.name)
            }
        }
    }

    /// Handle one input line
    pub async fn ingest(&mut self, input: ScanInput) -> Notice {
        let code = input.raw.trim();
        tracing::debug!(source = ?input.source, state = ?self.state, "Input received");

        if code.is_empty() {
            return self.notice(NoticeLevel::Info, "Nothing was scanned", None);
        }

        match self.state.clone() {
            TerminalState::AwaitingIdentity => self.identify(code).await,
            TerminalState::AwaitingItemScan { employee } => self.register(&employee, code).await,
        }
    }

    /// End the session and wait for the next badge
    pub fn logout(&mut self) -> Notice {
        match std::mem::take(&mut self.state) {
            TerminalState::AwaitingItemScan { employee } => {
                tracing::info!(badge = %employee.badge_code, "Session closed");
                self.notice(
                    NoticeLevel::Info,
                    format!("Goodbye, {}", employee.name),
                    None,
                )
            }
            TerminalState::AwaitingIdentity => {
                self.notice(NoticeLevel::Info, "No active session", None)
            }
        }
    }

    async fn identify(&mut self, badge: &str) -> Notice {
        if !self.options.badge_code.matches(badge) {
            return self.notice(
                NoticeLevel::Error,
                format!("Badge must have exactly {}", self.options.badge_code),
                Some(ErrorCode::InvalidBadgeCode),
            );
        }

        match self.engine.authenticate_employee(badge).await {
            Ok(AuthOutcome::Identified(employee)) => {
                let message = format!("Welcome, {}!", employee.name);
                self.state = TerminalState::AwaitingItemScan { employee };
                self.notice(NoticeLevel::Success, message, None)
            }
            Ok(AuthOutcome::NotFound) => self.notice(
                NoticeLevel::Error,
                "Badge not registered",
                Some(ErrorCode::EmployeeNotFound),
            ),
            Err(err) => self.error_notice(err),
        }
    }

    async fn register(&mut self, employee: &EmployeeIdentity, item: &str) -> Notice {
        let tz = self.engine.policy().timezone;
        match self.engine.commit_scan(&employee.badge_code, item).await {
            Ok(CommitOutcome::Committed(event)) => {
                if self.options.return_to_identity_after_commit {
                    self.state = TerminalState::AwaitingIdentity;
                }
                self.notice(
                    NoticeLevel::Success,
                    format!(
                        "Item {} registered at {}",
                        event.item_code,
                        format_millis(event.scanned_at, tz)
                    ),
                    None,
                )
            }
            Ok(CommitOutcome::Duplicate(info)) => self.notice(
                NoticeLevel::Warning,
                format!(
                    "You already scanned this item at {} ({} ago)",
                    format_datetime(info.prior_timestamp, tz),
                    info.elapsed_text()
                ),
                Some(ErrorCode::DuplicateScan),
            ),
            Err(err) => self.error_notice(err),
        }
    }

    fn error_notice(&self, err: AppError) -> Notice {
        if err.is_retryable() {
            tracing::error!(code = %err.code, error = %err, "Store failure during scan");
            return self.notice(
                NoticeLevel::Error,
                "Could not reach the database, scan again",
                Some(err.code),
            );
        }
        self.notice(NoticeLevel::Error, err.message, Some(err.code))
    }

    fn notice(&self, level: NoticeLevel, message: impl Into<String>, code: Option<ErrorCode>) -> Notice {
        Notice {
            level,
            message: message.into(),
            display_for: self.options.notice_display,
            code,
        }
    }
}
