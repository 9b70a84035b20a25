//! Contract types for the marketplace ledger
//!
//! A contract binds exactly one client to one contractor. The ledger
//! only ever reads contract status; status transitions happen outside
//! this crate.

use super::profile::ProfileId;
use serde::{Deserialize, Serialize};

/// Contract identifier
///
/// Supports contract IDs from 0 to 4,294,967,295
pub type ContractId = u32;

/// Lifecycle status of a contract
///
/// Only `in_progress` contracts count toward the deposit cap and the
/// unpaid-job listing. Terminated contracts are hidden from contract
/// listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Agreed but work has not started
    New,

    /// Work is under way
    InProgress,

    /// Ended; hidden from listings
    Terminated,
}

/// An agreement between one client and one contractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// The contract ID (u32: 0-4,294,967,295)
    pub id: ContractId,

    /// The client profile that pays for the contract's jobs
    pub client_id: ProfileId,

    /// The contractor profile credited when jobs are paid
    pub contractor_id: ProfileId,

    /// Free-text terms of the agreement
    pub terms: String,

    /// Current lifecycle status
    pub status: ContractStatus,
}
