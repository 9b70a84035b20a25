//! Typed query filters
//!
//! Each read path owns a filter struct instead of composing ad-hoc
//! predicates, so the store's lookup mechanism stays isolated from the
//! core's logic. Constructors encode the exact constraint set of each
//! operation; `matches` is the single place a store implementation has
//! to call.

use crate::core::policy;
use crate::types::{Contract, ContractId, ContractStatus, Job, JobId, ProfileId};
use chrono::{DateTime, Utc};

/// Filter over contracts
///
/// Every contract query is scoped to a party; the optional fields
/// narrow by id or cut a status out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFilter {
    /// Match only this contract id
    pub id: Option<ContractId>,

    /// Actor that must be the client or the contractor on the contract
    pub party: ProfileId,

    /// Drop contracts with this status
    pub exclude_status: Option<ContractStatus>,
}

impl ContractFilter {
    /// One contract by id, visible only to its parties
    pub fn by_id(id: ContractId, party: ProfileId) -> Self {
        ContractFilter {
            id: Some(id),
            party,
            exclude_status: None,
        }
    }

    /// Every non-terminated contract the party is on
    pub fn active_for(party: ProfileId) -> Self {
        ContractFilter {
            id: None,
            party,
            exclude_status: Some(ContractStatus::Terminated),
        }
    }

    /// Whether the contract satisfies the filter
    pub fn matches(&self, contract: &Contract) -> bool {
        if self.id.is_some_and(|id| id != contract.id) {
            return false;
        }
        if self.exclude_status == Some(contract.status) {
            return false;
        }
        policy::is_contract_party(self.party, contract)
    }
}

/// Side of a contract a job query is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobParty {
    /// The party must be the contract's client
    Client(ProfileId),
    /// The party may be on either side of the contract
    Either(ProfileId),
}

/// Filter over jobs, evaluated against the job and its owning contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFilter {
    /// Match only this job id
    pub id: Option<JobId>,

    /// Actor scope relative to the owning contract
    pub party: JobParty,

    /// Keep only jobs whose paid flag is unset
    pub unpaid_only: bool,

    /// Keep only jobs whose owning contract has this status
    pub contract_status: Option<ContractStatus>,
}

impl JobFilter {
    /// The payable-job lookup: one unpaid job owned by the client
    ///
    /// Note the absence of a contract-status constraint. An unpaid job
    /// stays payable whatever its contract's status; only ownership and
    /// the paid flag gate payment.
    pub fn payable(id: JobId, client: ProfileId) -> Self {
        JobFilter {
            id: Some(id),
            party: JobParty::Client(client),
            unpaid_only: true,
            contract_status: None,
        }
    }

    /// A client's outstanding jobs, the base of the deposit cap
    pub fn outstanding(client: ProfileId) -> Self {
        JobFilter {
            id: None,
            party: JobParty::Client(client),
            unpaid_only: true,
            contract_status: Some(ContractStatus::InProgress),
        }
    }

    /// Unpaid jobs under in-progress contracts the party is on
    pub fn unpaid_for(party: ProfileId) -> Self {
        JobFilter {
            id: None,
            party: JobParty::Either(party),
            unpaid_only: true,
            contract_status: Some(ContractStatus::InProgress),
        }
    }

    /// Whether the job and its owning contract satisfy the filter
    pub fn matches(&self, job: &Job, contract: &Contract) -> bool {
        if self.id.is_some_and(|id| id != job.id) {
            return false;
        }
        if self.unpaid_only && job.is_paid() {
            return false;
        }
        if self
            .contract_status
            .is_some_and(|status| status != contract.status)
        {
            return false;
        }
        match self.party {
            JobParty::Client(party) => contract.client_id == party,
            JobParty::Either(party) => policy::is_contract_party(party, contract),
        }
    }
}

/// Inclusive time window for reporting queries
///
/// Matched against job creation timestamps; both bounds are inside the
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    /// First instant inside the window
    pub start: DateTime<Utc>,

    /// Last instant inside the window
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// Create a window from inclusive bounds
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        ReportWindow { start, end }
    }

    /// Whether the instant falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}
