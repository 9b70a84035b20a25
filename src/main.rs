//! Marketplace Settlement Ledger CLI
//!
//! Command-line interface for operating a marketplace ledger stored as
//! CSV dataset files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- contracts --profile 1
//! cargo run -- contract --profile 1 3
//! cargo run -- unpaid-jobs --profile 6
//! cargo run -- deposit --profile 1 75
//! cargo run -- pay-job --profile 1 2
//! cargo run -- best-profession --start 2020-08-01 --end 2020-08-31
//! cargo run -- best-clients --start 2020-08-01 --end 2020-08-31 --limit 3
//! ```
//!
//! The program loads the dataset directory (default `./data`), runs
//! one command against it, prints the result to stdout as JSON, and
//! writes the mutable files back when the ledger changed. Logs go to
//! stderr so stdout stays valid JSON.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (dataset missing or invalid, operation rejected, etc.)

use marketplace_ledger::cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
