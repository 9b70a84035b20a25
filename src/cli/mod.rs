// CLI module
// Command-line interface, command dispatch and output rendering

mod args;

pub use args::{CliArgs, Command};

use crate::config::LedgerConfig;
use crate::core::engine::LedgerEngine;
use crate::core::queries::QueryService;
use crate::core::reporting::ReportingService;
use crate::io::dataset::{self, Dataset};
use crate::store::filter::ReportWindow;
use crate::store::memory::MemoryStore;
use crate::store::traits::LedgerStore;
use crate::types::{LedgerError, Profile, ProfileId};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments,
/// or the --help flag), clap displays an error message or help text
/// and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Execute one parsed command against a dataset directory
///
/// Loads and validates the dataset into an in-memory store, runs the
/// command, and prints its result to stdout as pretty JSON. Commands
/// that change the ledger write `profiles.csv` and `jobs.csv` back to
/// the dataset directory before printing.
///
/// # Errors
///
/// Returns an error if the dataset or configuration fails to load, the
/// operation itself is rejected, or the result cannot be written back.
pub fn run(args: CliArgs) -> Result<(), LedgerError> {
    let config = match &args.config {
        Some(path) => LedgerConfig::from_file(path)?,
        None => LedgerConfig::default(),
    };

    let store = Arc::new(Dataset::load(&args.data_dir)?.into_store());

    match args.command {
        Command::Contracts { profile } => {
            let actor = resolve_profile(&store, profile)?;
            let contracts = QueryService::new(Arc::clone(&store)).contracts(&actor)?;
            print_json(&contracts)
        }
        Command::Contract {
            profile,
            contract_id,
        } => {
            let actor = resolve_profile(&store, profile)?;
            let contract =
                QueryService::new(Arc::clone(&store)).contract_by_id(&actor, contract_id)?;
            print_json(&contract)
        }
        Command::UnpaidJobs { profile } => {
            let actor = resolve_profile(&store, profile)?;
            let jobs = QueryService::new(Arc::clone(&store)).unpaid_jobs(&actor)?;
            print_json(&jobs)
        }
        Command::Deposit { profile, amount } => {
            let actor = resolve_profile(&store, profile)?;
            let receipt = LedgerEngine::new(Arc::clone(&store), config).deposit(&actor, amount)?;
            persist(&args.data_dir, &store)?;
            print_json(&receipt)
        }
        Command::PayJob { profile, job_id } => {
            let actor = resolve_profile(&store, profile)?;
            let settled = LedgerEngine::new(Arc::clone(&store), config).pay_job(&actor, job_id)?;
            persist(&args.data_dir, &store)?;
            print_json(&settled)
        }
        Command::BestProfession { start, end } => {
            let window = ReportWindow::new(start, end);
            let best = ReportingService::new(Arc::clone(&store), &config).best_profession(&window)?;
            match best {
                Some(earnings) => print_json(&earnings),
                // An empty window reports JSON null rather than failing.
                None => print_json(&serde_json::Value::Null),
            }
        }
        Command::BestClients { start, end, limit } => {
            let window = ReportWindow::new(start, end);
            let best =
                ReportingService::new(Arc::clone(&store), &config).best_clients(&window, limit)?;
            print_json(&best)
        }
    }
}

/// Resolve the acting profile id against the loaded dataset
fn resolve_profile(store: &MemoryStore, profile: ProfileId) -> Result<Profile, LedgerError> {
    store
        .find_profile(profile)?
        .ok_or_else(|| LedgerError::profile_not_found(profile))
}

/// Write the mutable dataset files back after a ledger change
fn persist(dir: &Path, store: &MemoryStore) -> Result<(), LedgerError> {
    dataset::save(dir, &store.profiles_snapshot(), &store.jobs_snapshot())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), LedgerError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| LedgerError::io(format!("Failed to render output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}
