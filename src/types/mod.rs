//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `profile`: Marketplace parties and their roles
//! - `contract`: Client/contractor agreements and their status
//! - `job`: Billable work units and the paid flag
//! - `error`: Error types for the ledger

pub mod contract;
pub mod error;
pub mod job;
pub mod profile;

pub use contract::{Contract, ContractId, ContractStatus};
pub use error::LedgerError;
pub use job::{Job, JobId};
pub use profile::{Profile, ProfileId, ProfileRole};
