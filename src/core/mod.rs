//! Core business logic module
//!
//! This module contains the settlement and reporting components:
//! - `policy` - Role and party authorization rules
//! - `engine` - Deposit and job-payment orchestration
//! - `queries` - Visibility-scoped contract and job reads
//! - `reporting` - Windowed earnings and spend aggregation

pub mod engine;
pub mod policy;
pub mod queries;
pub mod reporting;

pub use engine::{DepositReceipt, LedgerEngine};
pub use policy::LedgerOperation;
pub use queries::QueryService;
pub use reporting::{ClientSpend, ProfessionEarnings, ReportingService};
