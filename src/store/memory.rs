//! In-memory ledger store
//!
//! HashMap-backed implementation of the store traits, guarded by a
//! single `parking_lot` RwLock.
//!
//! # Isolation
//!
//! A [`MemoryTransaction`] holds the write guard for its whole scope,
//! so mutations are serialized and no reader observes an intermediate
//! state; reads outside a transaction take the read guard and see only
//! committed state. Each applied mutation records its inverse in an
//! undo log; dropping an uncommitted transaction replays the log in
//! reverse, which is what makes rollback automatic on any error path.

use crate::store::filter::{ContractFilter, JobFilter, ReportWindow};
use crate::store::traits::{LedgerStore, LedgerTransaction};
use crate::types::{Contract, Job, JobId, LedgerError, Profile, ProfileId};
use parking_lot::{RwLock, RwLockWriteGuard};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::error;

/// Shared ledger state behind the lock
#[derive(Debug, Default)]
struct LedgerState {
    profiles: HashMap<ProfileId, Profile>,
    contracts: HashMap<u32, Contract>,
    jobs: HashMap<JobId, Job>,
}

impl LedgerState {
    /// Values of a map in ascending id order
    fn sorted_values<T>(map: &HashMap<u32, T>) -> Vec<&T> {
        let mut entries: Vec<(&u32, &T)> = map.iter().collect();
        entries.sort_by_key(|(id, _)| **id);
        entries.into_iter().map(|(_, value)| value).collect()
    }

    /// Jobs joined with their owning contract, ascending job id
    ///
    /// Jobs whose contract row is missing are skipped, matching inner
    /// join semantics.
    fn jobs_with_contracts(&self) -> impl Iterator<Item = (&Job, &Contract)> {
        Self::sorted_values(&self.jobs)
            .into_iter()
            .filter_map(|job| self.contracts.get(&job.contract_id).map(|c| (job, c)))
    }
}

/// In-memory transactional store
///
/// Cheap to construct empty and seed in tests; the dataset loader
/// builds one from CSV files for the CLI.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<LedgerState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore {
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Insert or replace a profile
    ///
    /// Provisioning is outside the ledger's scope; this exists for the
    /// dataset loader and for tests.
    pub fn seed_profile(&self, profile: Profile) {
        self.state.write().profiles.insert(profile.id, profile);
    }

    /// Insert or replace a contract
    pub fn seed_contract(&self, contract: Contract) {
        self.state.write().contracts.insert(contract.id, contract);
    }

    /// Insert or replace a job
    pub fn seed_job(&self, job: Job) {
        self.state.write().jobs.insert(job.id, job);
    }

    /// All profiles, sorted by id
    ///
    /// Used to persist the dataset after a committed mutation.
    pub fn profiles_snapshot(&self) -> Vec<Profile> {
        let state = self.state.read();
        LedgerState::sorted_values(&state.profiles)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All jobs, sorted by id
    pub fn jobs_snapshot(&self) -> Vec<Job> {
        let state = self.state.read();
        LedgerState::sorted_values(&state.jobs)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All contracts, sorted by id
    pub fn contracts_snapshot(&self) -> Vec<Contract> {
        let state = self.state.read();
        LedgerState::sorted_values(&state.contracts)
            .into_iter()
            .cloned()
            .collect()
    }
}

/// Inverse of one applied mutation
#[derive(Debug)]
enum UndoOp {
    Credit { profile: ProfileId, amount: Decimal },
    Debit { profile: ProfileId, amount: Decimal },
    Settle { job: JobId },
}

/// Write transaction over the in-memory store
///
/// Holds the write guard until commit or drop. Commit marks the
/// mutations permanent; drop without commit replays the undo log in
/// reverse order.
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    state: RwLockWriteGuard<'a, LedgerState>,
    undo: Vec<UndoOp>,
    committed: bool,
}

impl LedgerTransaction for MemoryTransaction<'_> {
    fn credit_balance(&mut self, profile: ProfileId, amount: Decimal) -> Result<(), LedgerError> {
        let row = self
            .state
            .profiles
            .get_mut(&profile)
            .ok_or_else(|| LedgerError::storage(format!("profile {} missing during credit", profile)))?;

        row.balance = row
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("credit", profile))?;

        self.undo.push(UndoOp::Credit { profile, amount });
        Ok(())
    }

    fn debit_balance(&mut self, profile: ProfileId, amount: Decimal) -> Result<(), LedgerError> {
        let row = self
            .state
            .profiles
            .get_mut(&profile)
            .ok_or_else(|| LedgerError::storage(format!("profile {} missing during debit", profile)))?;

        // Re-checked here: a pre-transaction balance check may have raced
        // with another operation on the same profile.
        if row.balance < amount {
            return Err(LedgerError::insufficient_funds(profile, row.balance, amount));
        }

        row.balance = row
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", profile))?;

        self.undo.push(UndoOp::Debit { profile, amount });
        Ok(())
    }

    fn settle_job(&mut self, job: JobId) -> Result<(), LedgerError> {
        let row = self
            .state
            .jobs
            .get_mut(&job)
            .ok_or_else(|| LedgerError::storage(format!("job {} missing during settle", job)))?;

        // The paid flag is terminal. A payment that raced and lost sees
        // the job as already settled and reports it as not found.
        if row.is_paid() {
            return Err(LedgerError::job_not_found(job));
        }

        row.paid = Some(true);
        self.undo.push(UndoOp::Settle { job });
        Ok(())
    }

    fn job(&self, job: JobId) -> Result<Job, LedgerError> {
        self.state
            .jobs
            .get(&job)
            .cloned()
            .ok_or_else(|| LedgerError::job_not_found(job))
    }

    fn commit(mut self) -> Result<(), LedgerError> {
        self.committed = true;
        Ok(())
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let ops = self.undo.len();
        if ops > 0 {
            error!(ops, "rolling back uncommitted ledger transaction");
        }
        while let Some(op) = self.undo.pop() {
            match op {
                UndoOp::Credit { profile, amount } => {
                    if let Some(row) = self.state.profiles.get_mut(&profile) {
                        row.balance -= amount;
                    }
                }
                UndoOp::Debit { profile, amount } => {
                    if let Some(row) = self.state.profiles.get_mut(&profile) {
                        row.balance += amount;
                    }
                }
                UndoOp::Settle { job } => {
                    if let Some(row) = self.state.jobs.get_mut(&job) {
                        row.paid = None;
                    }
                }
            }
        }
    }
}

impl LedgerStore for MemoryStore {
    type Tx<'a>
        = MemoryTransaction<'a>
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Tx<'_>, LedgerError> {
        Ok(MemoryTransaction {
            state: self.state.write(),
            undo: Vec::new(),
            committed: false,
        })
    }

    fn find_profile(&self, id: ProfileId) -> Result<Option<Profile>, LedgerError> {
        Ok(self.state.read().profiles.get(&id).cloned())
    }

    fn contract(&self, filter: &ContractFilter) -> Result<Option<Contract>, LedgerError> {
        let state = self.state.read();
        Ok(LedgerState::sorted_values(&state.contracts)
            .into_iter()
            .find(|contract| filter.matches(contract))
            .cloned())
    }

    fn contracts(&self, filter: &ContractFilter) -> Result<Vec<Contract>, LedgerError> {
        let state = self.state.read();
        Ok(LedgerState::sorted_values(&state.contracts)
            .into_iter()
            .filter(|contract| filter.matches(contract))
            .cloned()
            .collect())
    }

    fn jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, LedgerError> {
        let state = self.state.read();
        Ok(state
            .jobs_with_contracts()
            .filter(|(job, contract)| filter.matches(job, contract))
            .map(|(job, _)| job.clone())
            .collect())
    }

    fn job_with_contract(
        &self,
        filter: &JobFilter,
    ) -> Result<Option<(Job, Contract)>, LedgerError> {
        let state = self.state.read();
        let result = state
            .jobs_with_contracts()
            .find(|(job, contract)| filter.matches(job, contract))
            .map(|(job, contract)| (job.clone(), contract.clone()));
        Ok(result)
    }

    fn settled_jobs(&self, window: &ReportWindow) -> Result<Vec<(Job, Contract)>, LedgerError> {
        let state = self.state.read();
        Ok(state
            .jobs_with_contracts()
            .filter(|(job, _)| job.is_paid() && window.contains(job.created_at))
            .map(|(job, contract)| (job.clone(), contract.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContractStatus, ProfileRole};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;
    use std::thread;

    fn profile(id: ProfileId, role: ProfileRole, balance: i64) -> Profile {
        Profile {
            id,
            role,
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            profession: "Programmer".to_string(),
            balance: Decimal::new(balance, 0),
        }
    }

    fn contract(id: u32, client_id: ProfileId, contractor_id: ProfileId) -> Contract {
        Contract {
            id,
            client_id,
            contractor_id,
            terms: "bla bla bla".to_string(),
            status: ContractStatus::InProgress,
        }
    }

    fn job(id: JobId, contract_id: u32, price: i64, paid: Option<bool>) -> Job {
        Job {
            id,
            contract_id,
            description: "work".to_string(),
            price: Decimal::new(price, 0),
            paid,
            created_at: Utc.with_ymd_and_hms(2020, 8, 15, 19, 11, 26).unwrap(),
        }
    }

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed_profile(profile(1, ProfileRole::Client, 1000));
        store.seed_profile(profile(5, ProfileRole::Contractor, 64));
        store.seed_contract(contract(1, 1, 5));
        store.seed_job(job(1, 1, 200, None));
        store.seed_job(job(2, 1, 300, Some(true)));
        store
    }

    #[test]
    fn test_find_profile() {
        let store = seeded_store();
        assert_eq!(store.find_profile(1).unwrap().unwrap().id, 1);
        assert!(store.find_profile(99).unwrap().is_none());
    }

    #[test]
    fn test_commit_makes_mutations_visible() {
        let store = seeded_store();

        let mut tx = store.begin().unwrap();
        tx.debit_balance(1, Decimal::new(200, 0)).unwrap();
        tx.credit_balance(5, Decimal::new(200, 0)).unwrap();
        tx.settle_job(1).unwrap();
        tx.commit().unwrap();

        assert_eq!(
            store.find_profile(1).unwrap().unwrap().balance,
            Decimal::new(800, 0)
        );
        assert_eq!(
            store.find_profile(5).unwrap().unwrap().balance,
            Decimal::new(264, 0)
        );
        assert!(store
            .job_with_contract(&JobFilter::payable(1, 1))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_drop_without_commit_rolls_back_every_mutation() {
        let store = seeded_store();

        {
            let mut tx = store.begin().unwrap();
            tx.debit_balance(1, Decimal::new(200, 0)).unwrap();
            tx.credit_balance(5, Decimal::new(200, 0)).unwrap();
            tx.settle_job(1).unwrap();
            // dropped here without commit
        }

        assert_eq!(
            store.find_profile(1).unwrap().unwrap().balance,
            Decimal::new(1000, 0)
        );
        assert_eq!(
            store.find_profile(5).unwrap().unwrap().balance,
            Decimal::new(64, 0)
        );
        let (unpaid, _) = store
            .job_with_contract(&JobFilter::payable(1, 1))
            .unwrap()
            .unwrap();
        assert_eq!(unpaid.paid, None);
    }

    #[test]
    fn test_debit_is_conditional_on_balance() {
        let store = seeded_store();

        let mut tx = store.begin().unwrap();
        let result = tx.debit_balance(1, Decimal::new(1001, 0));

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientFunds { profile: 1, .. }
        ));
    }

    #[test]
    fn test_settle_is_terminal() {
        let store = seeded_store();

        let mut tx = store.begin().unwrap();
        let result = tx.settle_job(2);

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::JobNotFound { job: 2 }
        ));
    }

    #[test]
    fn test_credit_missing_profile_is_a_storage_error() {
        let store = seeded_store();

        let mut tx = store.begin().unwrap();
        let result = tx.credit_balance(42, Decimal::new(10, 0));

        assert!(matches!(result.unwrap_err(), LedgerError::Storage { .. }));
    }

    #[test]
    fn test_query_results_are_sorted_by_id() {
        let store = MemoryStore::new();
        store.seed_profile(profile(1, ProfileRole::Client, 0));
        store.seed_profile(profile(5, ProfileRole::Contractor, 0));
        for id in [9u32, 3, 7, 1] {
            store.seed_contract(contract(id, 1, 5));
            store.seed_job(job(id, id, 100, None));
        }

        let contracts = store.contracts(&ContractFilter::active_for(1)).unwrap();
        let contract_ids: Vec<u32> = contracts.iter().map(|c| c.id).collect();
        assert_eq!(contract_ids, vec![1, 3, 7, 9]);

        let jobs = store.jobs(&JobFilter::unpaid_for(1)).unwrap();
        let job_ids: Vec<JobId> = jobs.iter().map(|j| j.id).collect();
        assert_eq!(job_ids, vec![1, 3, 7, 9]);
    }

    #[test]
    fn test_settled_jobs_joins_and_filters_by_window() {
        let store = seeded_store();
        let window = ReportWindow::new(
            Utc.with_ymd_and_hms(2020, 8, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 8, 31, 23, 59, 59).unwrap(),
        );

        let settled = store.settled_jobs(&window).unwrap();
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].0.id, 2);
        assert_eq!(settled[0].1.id, 1);

        let empty_window = ReportWindow::new(
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 12, 31, 0, 0, 0).unwrap(),
        );
        assert!(store.settled_jobs(&empty_window).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_credits_do_not_lose_updates() {
        let store = Arc::new(MemoryStore::new());
        store.seed_profile(profile(1, ProfileRole::Client, 0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    let mut tx = store.begin().unwrap();
                    tx.credit_balance(1, Decimal::ONE).unwrap();
                    tx.commit().unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            store.find_profile(1).unwrap().unwrap().balance,
            Decimal::new(400, 0)
        );
    }
}
