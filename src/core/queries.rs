//! Read-side queries scoped to an acting profile
//!
//! Every query in this module is visibility-filtered: a profile only
//! ever sees contracts it is a party to and jobs under those
//! contracts. The service never mutates the ledger.

use crate::store::filter::{ContractFilter, JobFilter};
use crate::store::traits::LedgerStore;
use crate::types::{Contract, ContractId, Job, LedgerError, Profile};
use std::sync::Arc;

/// Visibility-scoped read access to contracts and jobs
pub struct QueryService<S> {
    store: Arc<S>,
}

impl<S: LedgerStore> QueryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        QueryService { store }
    }

    /// Fetch one contract by id, visible to the actor only as a party
    ///
    /// # Errors
    ///
    /// Returns `ContractNotFound` both when no such contract exists
    /// and when it belongs to other parties; the two cases are
    /// indistinguishable to the caller.
    pub fn contract_by_id(
        &self,
        actor: &Profile,
        contract_id: ContractId,
    ) -> Result<Contract, LedgerError> {
        self.store
            .contract(&ContractFilter::by_id(contract_id, actor.id))?
            .ok_or_else(|| LedgerError::contract_not_found(contract_id))
    }

    /// List the actor's non-terminated contracts, ascending by id
    ///
    /// Both roles use this the same way: the actor matches as client
    /// or as contractor. Terminated contracts are excluded; new and
    /// in-progress ones are returned.
    pub fn contracts(&self, actor: &Profile) -> Result<Vec<Contract>, LedgerError> {
        self.store.contracts(&ContractFilter::active_for(actor.id))
    }

    /// List the actor's unpaid jobs under in-progress contracts
    ///
    /// Unlike payment, this listing does constrain contract status:
    /// only in-progress contracts contribute jobs.
    pub fn unpaid_jobs(&self, actor: &Profile) -> Result<Vec<Job>, LedgerError> {
        self.store.jobs(&JobFilter::unpaid_for(actor.id))
    }
}
