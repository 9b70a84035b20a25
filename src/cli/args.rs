use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::types::{ContractId, JobId, ProfileId};

/// Operate a marketplace settlement ledger stored as CSV files
#[derive(Parser, Debug)]
#[command(name = "marketplace-ledger")]
#[command(about = "Marketplace contract, job and settlement ledger", long_about = None)]
pub struct CliArgs {
    /// Dataset directory holding the ledger CSV files
    #[arg(
        long = "data",
        value_name = "DIR",
        default_value = "./data",
        help = "Directory with profiles.csv, contracts.csv and jobs.csv"
    )]
    pub data_dir: PathBuf,

    /// Optional TOML configuration file for policy values
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "Path to a TOML configuration file"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// One ledger operation per invocation
///
/// Every profile-scoped command takes `--profile` naming the acting
/// profile; the reports are unscoped and take a time window instead.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the acting profile's non-terminated contracts
    Contracts {
        /// Acting profile id
        #[arg(long = "profile", value_name = "ID")]
        profile: ProfileId,
    },
    /// Show one contract the acting profile is a party to
    Contract {
        /// Acting profile id
        #[arg(long = "profile", value_name = "ID")]
        profile: ProfileId,
        /// Contract id to fetch
        #[arg(value_name = "CONTRACT_ID")]
        contract_id: ContractId,
    },
    /// List the acting profile's unpaid jobs under in-progress contracts
    UnpaidJobs {
        /// Acting profile id
        #[arg(long = "profile", value_name = "ID")]
        profile: ProfileId,
    },
    /// Deposit funds into the acting client's own balance
    Deposit {
        /// Acting profile id
        #[arg(long = "profile", value_name = "ID")]
        profile: ProfileId,
        /// Amount to deposit
        #[arg(value_name = "AMOUNT")]
        amount: Decimal,
    },
    /// Pay for a job from the acting client's balance
    PayJob {
        /// Acting profile id
        #[arg(long = "profile", value_name = "ID")]
        profile: ProfileId,
        /// Job id to pay for
        #[arg(value_name = "JOB_ID")]
        job_id: JobId,
    },
    /// Report the profession that earned the most inside a window
    BestProfession {
        /// Window start, RFC 3339 or YYYY-MM-DD
        #[arg(long = "start", value_name = "DATE", value_parser = parse_window_start)]
        start: DateTime<Utc>,
        /// Window end, RFC 3339 or YYYY-MM-DD
        #[arg(long = "end", value_name = "DATE", value_parser = parse_window_end)]
        end: DateTime<Utc>,
    },
    /// Report the clients who paid the most inside a window
    BestClients {
        /// Window start, RFC 3339 or YYYY-MM-DD
        #[arg(long = "start", value_name = "DATE", value_parser = parse_window_start)]
        start: DateTime<Utc>,
        /// Window end, RFC 3339 or YYYY-MM-DD
        #[arg(long = "end", value_name = "DATE", value_parser = parse_window_end)]
        end: DateTime<Utc>,
        /// Maximum number of clients to report
        #[arg(long = "limit", value_name = "COUNT")]
        limit: Option<usize>,
    },
}

/// Parse a window start, widening a bare date to the first instant of
/// that day in UTC
fn parse_window_start(value: &str) -> Result<DateTime<Utc>, String> {
    parse_window_bound(value, false)
}

/// Parse a window end, widening a bare date to the last instant of
/// that day in UTC
fn parse_window_end(value: &str) -> Result<DateTime<Utc>, String> {
    parse_window_bound(value, true)
}

fn parse_window_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}': expected RFC 3339 or YYYY-MM-DD", value))?;
    let naive = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    // Both times exist on every calendar day.
    let naive = naive.ok_or_else(|| format!("Invalid date '{}'", value))?;
    Ok(Utc.from_utc_datetime(&naive))
}
