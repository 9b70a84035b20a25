//! Marketplace Settlement Ledger Library
//! # Overview
//!
//! This library models a freelance marketplace back office: clients
//! and contractors hold profiles, contracts bind one client to one
//! contractor, and jobs under those contracts are priced, paid for and
//! reported on. All state lives in CSV dataset files loaded into an
//! in-memory transactional store.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Profile, Contract, Job, errors)
//! - [`cli`] - CLI argument parsing and command dispatch
//! - [`config`] - Policy configuration (deposit cap ratio, report limits)
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Deposit and job-payment orchestration
//!   - [`core::policy`] - Role and party authorization rules
//!   - [`core::queries`] - Visibility-scoped contract and job reads
//!   - [`core::reporting`] - Windowed earnings and spend aggregation
//! - [`store`] - Transactional storage with filters and an in-memory
//!   implementation
//! - [`io`] - Dataset directory loading, validation and persistence
//!
//! # Operations
//!
//! The ledger supports seven operations:
//!
//! - **Contracts**: List the acting profile's non-terminated contracts
//! - **Contract**: Fetch one contract the acting profile is a party to
//! - **UnpaidJobs**: List unpaid jobs under in-progress contracts
//! - **Deposit**: Credit a client's balance, capped against their
//!   outstanding jobs
//! - **PayJob**: Move a job's price from client to contractor and
//!   settle the job atomically
//! - **BestProfession**: The top-earning profession inside a window
//! - **BestClients**: The top-paying clients inside a window
//!
//! # Visibility
//!
//! Every profile-scoped read is filtered to contracts the actor is a
//! party to; absent and foreign records produce the same not-found
//! answer, so one profile can never probe another's data.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod store;
pub mod types;

pub use config::LedgerConfig;
pub use core::{
    ClientSpend, DepositReceipt, LedgerEngine, ProfessionEarnings, QueryService, ReportingService,
};
pub use io::Dataset;
pub use store::{LedgerStore, LedgerTransaction, MemoryStore};
pub use types::{
    Contract, ContractId, ContractStatus, Job, JobId, LedgerError, Profile, ProfileId, ProfileRole,
};
