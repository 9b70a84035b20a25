//! Benchmark suite for settlement and reporting paths
//!
//! These benchmarks measure the hot paths of the ledger using the
//! divan benchmarking framework: deposits with their live cap check,
//! atomic job payment, the unpaid-jobs listing, and both window
//! reports.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! # Workloads
//!
//! Stores are seeded programmatically rather than from fixture files:
//! one contract per client/contractor pair with a mix of paid and
//! unpaid jobs spread across August 2020.

use chrono::{TimeZone, Utc};
use marketplace_ledger::store::ReportWindow;
use marketplace_ledger::{
    ClientSpend, Contract, ContractStatus, Job, LedgerConfig, LedgerEngine, LedgerStore,
    MemoryStore, ProfessionEarnings, Profile, ProfileRole, QueryService, ReportingService,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn main() {
    divan::main();
}

/// Seed `clients` client/contractor pairs with one contract each and
/// `jobs_per_contract` jobs per contract, alternating paid and unpaid
fn seeded_store(clients: u32, jobs_per_contract: u32) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    let mut job_id = 1u32;
    for i in 1..=clients {
        let contractor_id = clients + i;
        store.seed_profile(Profile {
            id: i,
            role: ProfileRole::Client,
            first_name: format!("Client{}", i),
            last_name: "Bench".to_string(),
            profession: "Buyer".to_string(),
            balance: Decimal::new(1_000_000, 0),
        });
        store.seed_profile(Profile {
            id: contractor_id,
            role: ProfileRole::Contractor,
            first_name: format!("Contractor{}", i),
            last_name: "Bench".to_string(),
            profession: format!("Trade{}", i % 7),
            balance: Decimal::ZERO,
        });
        store.seed_contract(Contract {
            id: i,
            client_id: i,
            contractor_id,
            terms: "bench".to_string(),
            status: ContractStatus::InProgress,
        });
        for j in 0..jobs_per_contract {
            store.seed_job(Job {
                id: job_id,
                contract_id: i,
                description: "bench".to_string(),
                price: Decimal::new(100 + i64::from(j), 0),
                paid: if j % 2 == 0 { Some(true) } else { None },
                created_at: Utc
                    .with_ymd_and_hms(2020, 8, 1 + (j % 28), 12, 0, 0)
                    .unwrap(),
            });
            job_id += 1;
        }
    }
    Arc::new(store)
}

fn august() -> ReportWindow {
    ReportWindow::new(
        Utc.with_ymd_and_hms(2020, 8, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2020, 8, 31, 23, 59, 59).unwrap(),
    )
}

/// Benchmark a deposit including its live outstanding-sum cap check
#[divan::bench]
fn deposit_with_cap_check() {
    let store = seeded_store(10, 50);
    let engine = LedgerEngine::new(Arc::clone(&store), LedgerConfig::default());
    let actor = store.find_profile(1).unwrap().unwrap();

    engine
        .deposit(&actor, Decimal::new(1, 0))
        .expect("Deposit failed");
}

/// Benchmark one atomic job payment: debit, credit, settle, re-fetch
#[divan::bench]
fn pay_job_settlement() {
    let store = seeded_store(10, 50);
    let engine = LedgerEngine::new(Arc::clone(&store), LedgerConfig::default());
    let actor = store.find_profile(1).unwrap().unwrap();

    // The second job of the first contract is seeded unpaid.
    engine.pay_job(&actor, 2).expect("Payment failed");
}

/// Benchmark the unpaid-jobs listing across a 10,000-job ledger
#[divan::bench]
fn unpaid_jobs_listing() -> usize {
    let store = seeded_store(100, 100);
    let service = QueryService::new(Arc::clone(&store));
    let actor = store.find_profile(1).unwrap().unwrap();

    service.unpaid_jobs(&actor).expect("Query failed").len()
}

/// Benchmark the best-profession aggregation over ~5,000 settled jobs
#[divan::bench]
fn best_profession_report() -> Option<ProfessionEarnings> {
    let store = seeded_store(100, 100);
    let reporting = ReportingService::new(Arc::clone(&store), &LedgerConfig::default());

    reporting.best_profession(&august()).expect("Report failed")
}

/// Benchmark the best-clients ranking over ~5,000 settled jobs
#[divan::bench]
fn best_clients_report() -> Vec<ClientSpend> {
    let store = seeded_store(100, 100);
    let reporting = ReportingService::new(Arc::clone(&store), &LedgerConfig::default());

    reporting
        .best_clients(&august(), Some(10))
        .expect("Report failed")
}
