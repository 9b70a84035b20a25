//! Storage module
//!
//! This module contains the data-access layer of the ledger:
//! - `traits` - Store and transaction abstractions the core is written against
//! - `filter` - Typed query filters, one constructor per operation
//! - `memory` - In-memory implementation with RAII rollback

pub mod filter;
pub mod memory;
pub mod traits;

pub use filter::{ContractFilter, JobFilter, JobParty, ReportWindow};
pub use memory::{MemoryStore, MemoryTransaction};
pub use traits::{LedgerStore, LedgerTransaction};
