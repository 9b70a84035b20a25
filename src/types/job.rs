//! Job types for the marketplace ledger
//!
//! A job is a unit of billable work under a contract. Its paid flag is
//! the at-most-once payment guard: unset means unpaid, `true` means the
//! funds have moved, and `true` is terminal.

use super::contract::ContractId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Job identifier
///
/// Supports job IDs from 0 to 4,294,967,295
pub type JobId = u32;

/// A unit of billable work belonging to one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// The job ID (u32: 0-4,294,967,295)
    pub id: JobId,

    /// The contract this job belongs to
    pub contract_id: ContractId,

    /// Free-text description of the work
    pub description: String,

    /// Positive amount owed for the work
    pub price: Decimal,

    /// Payment state
    ///
    /// Tri-state: `None` means unpaid and unsettled, `Some(true)` means
    /// paid. `Some(false)` never occurs; absence of payment is always
    /// the unset state. Once `Some(true)`, nothing in this crate
    /// reverses it.
    pub paid: Option<bool>,

    /// Creation timestamp, matched against reporting windows
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Whether the job has been paid
    pub fn is_paid(&self) -> bool {
        self.paid == Some(true)
    }
}
