//! Settlement engine
//!
//! This module provides the LedgerEngine, the sole writer of profile
//! balances and job paid-flags. It executes the two mutating
//! operations, deposit and job payment, as atomic units against the
//! injected store.
//!
//! # Design
//!
//! Business-rule checks run before a transaction opens, so rejected
//! operations never pay transactional overhead. The transaction itself
//! re-validates what can race: the debit is conditional on the balance
//! and the settle is conditional on the paid flag, so a stale
//! pre-check can fail the operation but never corrupt the ledger.
//!
//! # Concurrency
//!
//! The engine takes `&self` everywhere and owns its store behind an
//! `Arc`, so one engine can serve any number of threads. Isolation
//! comes from the store's transaction contract: the three payment
//! mutations become visible together or not at all, and balance
//! changes are deltas applied at the store layer, so concurrent
//! operations on one profile cannot lose updates.

use crate::config::LedgerConfig;
use crate::core::policy::{self, LedgerOperation};
use crate::store::filter::JobFilter;
use crate::store::traits::{LedgerStore, LedgerTransaction};
use crate::types::{Job, JobId, LedgerError, Profile};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a successful deposit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositReceipt {
    /// Best-effort new balance
    ///
    /// The pre-transaction balance plus the deposited amount. The
    /// increment itself happens at the store layer, so if concurrent
    /// operations hit the same profile the authoritative post-commit
    /// value may differ from this echo.
    pub balance: Decimal,
}

/// Settlement engine over an injected transactional store
///
/// All writes to balances and paid-flags in the system go through the
/// two operations on this type.
pub struct LedgerEngine<S> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Create an engine over a store with the given policy values
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        LedgerEngine { store, config }
    }

    /// Deposit funds into the acting client's own balance
    ///
    /// The amount is capped relative to the client's outstanding jobs:
    /// unpaid jobs under in-progress contracts, summed live at call
    /// time. With no outstanding jobs the cap is zero and every
    /// positive deposit is rejected; that starvation is intentional.
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved acting profile; must be a client
    /// * `amount` - Strictly positive amount to add
    ///
    /// # Returns
    ///
    /// * `Ok(DepositReceipt)` carrying the best-effort new balance
    /// * `Err(LedgerError)` if the deposit was rejected or failed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not a client
    /// - The amount is zero or negative
    /// - The amount exceeds the cap (no transaction is opened)
    /// - The store fails (any partial change is rolled back)
    pub fn deposit(&self, actor: &Profile, amount: Decimal) -> Result<DepositReceipt, LedgerError> {
        // Role gate first: contractors cannot fund a balance.
        policy::require_client(actor, LedgerOperation::Deposit)?;

        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }

        // Outstanding total is read live, outside the transaction. A
        // concurrent payment can shrink it between this check and the
        // commit.
        let outstanding = self.outstanding_total(actor)?;

        let cap = self
            .config
            .deposit_cap_ratio
            .checked_mul(outstanding)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit cap", actor.id))?;
        if amount > cap {
            warn!(profile = actor.id, %amount, %cap, "deposit exceeds cap");
            return Err(LedgerError::deposit_cap_exceeded(actor.id, amount, cap));
        }

        // Echo for the receipt, computed from the pre-transaction view.
        let echoed_balance = actor
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", actor.id))?;

        // The increment is a delta applied at the store layer, never a
        // read-modify-write here, so concurrent deposits cannot lose
        // an update.
        let mut tx = self.store.begin()?;
        tx.credit_balance(actor.id, amount)?;
        tx.commit()?;

        info!(profile = actor.id, %amount, "deposit committed");
        Ok(DepositReceipt {
            balance: echoed_balance,
        })
    }

    /// Pay for one job from the acting client's balance
    ///
    /// Moves the job's price from the client to the contract's
    /// contractor and settles the job, all as one atomic transaction.
    /// A settled job can never be paid again: later calls no longer
    /// find it.
    ///
    /// # Arguments
    ///
    /// * `actor` - The resolved acting profile; must be a client
    /// * `job_id` - The job to pay for
    ///
    /// # Returns
    ///
    /// * `Ok(Job)` - the post-payment job record, paid flag set
    /// * `Err(LedgerError)` if the payment was rejected or failed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No unpaid job with this id exists under a contract the actor
    ///   is the client of (absent, already paid, and foreign jobs are
    ///   indistinguishable)
    /// - The actor is not a client (checked after the ownership match)
    /// - The actor's balance does not cover the price
    /// - The store fails mid-transaction (all applied mutations are
    ///   rolled back; no partial transfer is ever observable)
    pub fn pay_job(&self, actor: &Profile, job_id: JobId) -> Result<Job, LedgerError> {
        // Ownership and unpaid state first. The conflated not-found
        // keeps existence of other clients' jobs unobservable.
        let (job, contract) = self
            .store
            .job_with_contract(&JobFilter::payable(job_id, actor.id))?
            .ok_or_else(|| LedgerError::job_not_found(job_id))?;

        // Role gate second; the ordering decides which error a
        // contractor probing a job id receives.
        policy::require_client(actor, LedgerOperation::PayJob)?;

        if actor.balance < job.price {
            warn!(
                profile = actor.id,
                job = job.id,
                balance = %actor.balance,
                price = %job.price,
                "payment exceeds balance"
            );
            return Err(LedgerError::insufficient_funds(
                actor.id,
                actor.balance,
                job.price,
            ));
        }

        // One atomic unit: debit client, credit contractor, settle the
        // job, re-fetch for the response. Any failure drops the
        // transaction and rolls all of it back.
        let mut tx = self.store.begin()?;
        tx.debit_balance(actor.id, job.price)?;
        tx.credit_balance(contract.contractor_id, job.price)?;
        tx.settle_job(job.id)?;
        let settled = tx.job(job.id)?;
        tx.commit()?;

        info!(
            job = settled.id,
            client = actor.id,
            contractor = contract.contractor_id,
            price = %job.price,
            "job payment committed"
        );
        Ok(settled)
    }

    /// Sum of the actor's outstanding job prices
    ///
    /// Outstanding means unpaid jobs under in-progress contracts where
    /// the actor is the client.
    fn outstanding_total(&self, actor: &Profile) -> Result<Decimal, LedgerError> {
        let jobs = self.store.jobs(&JobFilter::outstanding(actor.id))?;
        jobs.iter().try_fold(Decimal::ZERO, |total, job| {
            total
                .checked_add(job.price)
                .ok_or_else(|| LedgerError::arithmetic_overflow("outstanding total", actor.id))
        })
    }
}
