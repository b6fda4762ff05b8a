//! Administrative services
//!
//! Employee registration, admin accounts and reports. These sit beside the
//! scan engine and share its pool and store timeout.

pub mod admin;
pub mod employee;
pub mod report;

pub use admin::AdminService;
pub use employee::{EmployeeService, parse_sector};
pub use report::ReportService;
