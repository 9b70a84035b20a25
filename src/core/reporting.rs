//! Earnings and spend reports over settled jobs
//!
//! Both reports aggregate paid jobs whose creation time falls inside
//! an inclusive window: earnings grouped by contractor profession, and
//! spend grouped by paying client. They read committed state only and
//! never mutate the ledger.

use crate::config::LedgerConfig;
use crate::store::filter::ReportWindow;
use crate::store::traits::LedgerStore;
use crate::types::{LedgerError, ProfileId, ProfileRole};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// One profession with its summed earnings inside a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfessionEarnings {
    pub profession: String,
    pub total_earned: Decimal,
}

/// One client with their summed payments inside a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSpend {
    pub id: ProfileId,
    pub full_name: String,
    pub paid: Decimal,
}

/// Window-scoped aggregation over settled jobs
pub struct ReportingService<S> {
    store: Arc<S>,
    default_limit: usize,
}

impl<S: LedgerStore> ReportingService<S> {
    pub fn new(store: Arc<S>, config: &LedgerConfig) -> Self {
        ReportingService {
            store,
            default_limit: config.best_clients_limit,
        }
    }

    /// The profession that earned the most inside the window
    ///
    /// Earnings attribute a job's price to the profession of the
    /// contract's contractor. Jobs whose contractor row is missing or
    /// mis-roled are skipped rather than failing the report. Ties
    /// break toward the lexicographically smaller profession name.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` when no settled job falls inside the window
    pub fn best_profession(
        &self,
        window: &ReportWindow,
    ) -> Result<Option<ProfessionEarnings>, LedgerError> {
        let settled = self.store.settled_jobs(window)?;

        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for (job, contract) in settled {
            let contractor = match self.store.find_profile(contract.contractor_id)? {
                Some(profile) => profile,
                None => continue,
            };
            if contractor.role != ProfileRole::Contractor {
                continue;
            }
            let entry = totals.entry(contractor.profession).or_insert(Decimal::ZERO);
            *entry = entry.checked_add(job.price).ok_or_else(|| {
                LedgerError::arithmetic_overflow("profession total", contract.contractor_id)
            })?;
        }

        let mut ranked: Vec<ProfessionEarnings> = totals
            .into_iter()
            .map(|(profession, total_earned)| ProfessionEarnings {
                profession,
                total_earned,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.total_earned
                .cmp(&a.total_earned)
                .then_with(|| a.profession.cmp(&b.profession))
        });
        Ok(ranked.into_iter().next())
    }

    /// The clients who paid the most inside the window, best first
    ///
    /// # Arguments
    ///
    /// * `window` - Inclusive creation-time window
    /// * `limit` - Maximum rows to return; `None` uses the configured
    ///   default
    ///
    /// Ties break toward the lower profile id. Returns fewer rows than
    /// the limit when fewer clients paid anything, down to an empty
    /// list for an empty window.
    pub fn best_clients(
        &self,
        window: &ReportWindow,
        limit: Option<usize>,
    ) -> Result<Vec<ClientSpend>, LedgerError> {
        let settled = self.store.settled_jobs(window)?;

        let mut totals: HashMap<ProfileId, ClientSpend> = HashMap::new();
        for (job, contract) in settled {
            let client = match self.store.find_profile(contract.client_id)? {
                Some(profile) => profile,
                None => continue,
            };
            if !client.is_client() {
                continue;
            }
            let entry = totals.entry(client.id).or_insert_with(|| ClientSpend {
                id: client.id,
                full_name: client.full_name(),
                paid: Decimal::ZERO,
            });
            entry.paid = entry.paid.checked_add(job.price).ok_or_else(|| {
                LedgerError::arithmetic_overflow("client total", contract.client_id)
            })?;
        }

        let mut ranked: Vec<ClientSpend> = totals.into_values().collect();
        ranked.sort_by(|a, b| b.paid.cmp(&a.paid).then_with(|| a.id.cmp(&b.id)));
        ranked.truncate(limit.unwrap_or(self.default_limit));
        Ok(ranked)
    }
}
