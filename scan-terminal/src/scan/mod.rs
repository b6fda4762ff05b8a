//! Scan registration: policy and engine

pub mod engine;
pub mod policy;

pub use engine::{AuthOutcome, CommitOutcome, DuplicateCheck, DuplicateInfo, ScanEngine};
pub use policy::{CodeFormat, DuplicatePolicy, ScanPolicy};
