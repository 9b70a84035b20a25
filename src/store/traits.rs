//! Store traits for ledger data access
//!
//! This module defines the trait abstractions between the core and its
//! storage. The store is always an injected dependency: the engine and
//! the query services receive one at construction and never reach for a
//! global handle, so tests can substitute any implementation.
//!
//! # Transactions
//!
//! Mutations only happen through a [`LedgerTransaction`] obtained from
//! [`LedgerStore::begin`]. A transaction is a scope: apply mutations,
//! then `commit` it. Dropping it without committing rolls every applied
//! mutation back, so no early return or error path can leak a partial
//! state. Balance changes are expressed as deltas (credit/debit), never
//! as read-modify-write from the caller's side, so concurrent mutations
//! of one balance cannot lose an update.

use crate::store::filter::{ContractFilter, JobFilter, ReportWindow};
use crate::types::{Contract, Job, JobId, LedgerError, Profile, ProfileId};
use rust_decimal::Decimal;

/// Scoped mutation unit over the ledger
///
/// All methods re-validate against current committed-equivalent state;
/// the conditional ones fail instead of breaking an invariant, which is
/// what preserves correctness when pre-transaction checks raced with
/// other operations.
pub trait LedgerTransaction {
    /// Add `amount` to the profile's balance
    ///
    /// # Errors
    ///
    /// Returns an error if the profile row is missing or the balance
    /// would overflow.
    fn credit_balance(&mut self, profile: ProfileId, amount: Decimal) -> Result<(), LedgerError>;

    /// Subtract `amount` from the profile's balance
    ///
    /// Conditional: fails rather than driving the balance negative.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientFunds`] if the balance does
    /// not cover `amount`, or an error if the profile row is missing.
    fn debit_balance(&mut self, profile: ProfileId, amount: Decimal) -> Result<(), LedgerError>;

    /// Set the job's paid flag to true
    ///
    /// Conditional: fails if the flag is already set, so a payment that
    /// lost a race cannot settle the job twice.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::JobNotFound`] if the job is already
    /// settled, or an error if the job row is missing.
    fn settle_job(&mut self, job: JobId) -> Result<(), LedgerError>;

    /// Re-fetch a job's current state within the transaction
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::JobNotFound`] if the job does not exist.
    fn job(&self, job: JobId) -> Result<Job, LedgerError>;

    /// Make every applied mutation durable and visible
    ///
    /// Consumes the transaction; a transaction dropped without this
    /// call rolls back instead.
    fn commit(self) -> Result<(), LedgerError>
    where
        Self: Sized;
}

/// Transactional storage for profiles, contracts, and jobs
///
/// Reads are point-in-time snapshots of committed state. Collection
/// reads return entities in ascending id order for deterministic
/// output.
pub trait LedgerStore {
    /// Transaction type, borrowing from the store for its whole scope
    type Tx<'a>: LedgerTransaction
    where
        Self: 'a;

    /// Open a transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot start a transaction.
    fn begin(&self) -> Result<Self::Tx<'_>, LedgerError>;

    /// Look up a profile by id
    fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>, LedgerError>;

    /// First contract matching the filter, by ascending id
    fn contract(&self, filter: &ContractFilter) -> Result<Option<Contract>, LedgerError>;

    /// Every contract matching the filter, in ascending id order
    fn contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>, LedgerError>;

    /// Every job matching the filter, in ascending id order
    fn jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, LedgerError>;

    /// First job matching the filter, joined with its owning contract
    fn job_with_contract(
        &self,
        filter: &JobFilter,
    ) -> Result<Option<(Job, Contract)>, LedgerError>;

    /// Paid jobs created inside the window, joined with their contracts
    fn settled_jobs(&self, window: &ReportWindow) -> Result<Vec<(Job, Contract)>, LedgerError>;
}
