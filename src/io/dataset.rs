//! Dataset directory loader and writer
//!
//! A dataset directory holds the whole ledger as three CSV files:
//! `profiles.csv`, `contracts.csv` and `jobs.csv`. This module reads
//! them into domain types, validates referential integrity across the
//! files, seeds an in-memory store, and writes the mutable files back
//! after a run.
//!
//! # Design
//!
//! The CSV column names match the domain struct fields, so rows
//! deserialize straight into the domain types with no intermediate
//! record structs. Parse errors carry the file name and line number;
//! cross-file integrity errors carry the file name only, since they
//! have no single offending line.
//!
//! Loading is all-or-nothing: one bad row fails the whole load.

use crate::store::memory::MemoryStore;
use crate::types::{Contract, Job, LedgerError, Profile, ProfileId, ProfileRole};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// File names inside a dataset directory
pub const PROFILES_FILE: &str = "profiles.csv";
pub const CONTRACTS_FILE: &str = "contracts.csv";
pub const JOBS_FILE: &str = "jobs.csv";

/// A fully parsed and validated dataset directory
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub profiles: Vec<Profile>,
    pub contracts: Vec<Contract>,
    pub jobs: Vec<Job>,
}

impl Dataset {
    /// Load and validate a dataset directory
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory containing the three dataset CSV files
    ///
    /// # Returns
    ///
    /// * `Ok(Dataset)` with every row parsed and cross-checked
    ///
    /// # Errors
    ///
    /// Returns an error if a file is missing or unreadable, a row
    /// fails to parse, or the files disagree with each other (dangling
    /// references, duplicate ids, mis-roled contract parties).
    pub fn load(dir: &Path) -> Result<Self, LedgerError> {
        let profiles = read_rows(&dir.join(PROFILES_FILE), PROFILES_FILE)?;
        let contracts = read_rows(&dir.join(CONTRACTS_FILE), CONTRACTS_FILE)?;
        let jobs = read_rows(&dir.join(JOBS_FILE), JOBS_FILE)?;

        let dataset = Dataset {
            profiles,
            contracts,
            jobs,
        };
        dataset.validate()?;

        info!(
            profiles = dataset.profiles.len(),
            contracts = dataset.contracts.len(),
            jobs = dataset.jobs.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Cross-file integrity checks
    ///
    /// Row-level syntax is already enforced by deserialization; this
    /// checks what only the whole dataset can know.
    fn validate(&self) -> Result<(), LedgerError> {
        let mut profile_ids = HashSet::new();
        for profile in &self.profiles {
            if !profile_ids.insert(profile.id) {
                return Err(LedgerError::parse(
                    PROFILES_FILE,
                    None,
                    format!("duplicate profile id {}", profile.id),
                ));
            }
            if profile.balance < Decimal::ZERO {
                return Err(LedgerError::parse(
                    PROFILES_FILE,
                    None,
                    format!("profile {} has a negative balance", profile.id),
                ));
            }
        }

        let roles: HashMap<ProfileId, ProfileRole> =
            self.profiles.iter().map(|p| (p.id, p.role)).collect();

        let mut contract_ids = HashSet::new();
        for contract in &self.contracts {
            if !contract_ids.insert(contract.id) {
                return Err(LedgerError::parse(
                    CONTRACTS_FILE,
                    None,
                    format!("duplicate contract id {}", contract.id),
                ));
            }
            check_party(contract.id, contract.client_id, ProfileRole::Client, &roles)?;
            check_party(
                contract.id,
                contract.contractor_id,
                ProfileRole::Contractor,
                &roles,
            )?;
        }

        let mut job_ids = HashSet::new();
        for job in &self.jobs {
            if !job_ids.insert(job.id) {
                return Err(LedgerError::parse(
                    JOBS_FILE,
                    None,
                    format!("duplicate job id {}", job.id),
                ));
            }
            if !contract_ids.contains(&job.contract_id) {
                return Err(LedgerError::parse(
                    JOBS_FILE,
                    None,
                    format!("job {} references missing contract {}", job.id, job.contract_id),
                ));
            }
            if job.price <= Decimal::ZERO {
                return Err(LedgerError::parse(
                    JOBS_FILE,
                    None,
                    format!("job {} price must be positive", job.id),
                ));
            }
            // The paid column is either "true" or empty. An explicit
            // false has no meaning in the ledger.
            if job.paid == Some(false) {
                return Err(LedgerError::parse(
                    JOBS_FILE,
                    None,
                    format!("job {} has paid=false; use true or leave the field empty", job.id),
                ));
            }
        }

        Ok(())
    }

    /// Seed an in-memory store with every row of this dataset
    pub fn into_store(self) -> MemoryStore {
        let store = MemoryStore::new();
        for profile in self.profiles {
            store.seed_profile(profile);
        }
        for contract in self.contracts {
            store.seed_contract(contract);
        }
        for job in self.jobs {
            store.seed_job(job);
        }
        store
    }
}

fn check_party(
    contract: u32,
    profile: ProfileId,
    expected: ProfileRole,
    roles: &HashMap<ProfileId, ProfileRole>,
) -> Result<(), LedgerError> {
    match roles.get(&profile) {
        Some(role) if *role == expected => Ok(()),
        Some(_) => Err(LedgerError::parse(
            CONTRACTS_FILE,
            None,
            format!(
                "contract {} party {} does not have the {:?} role",
                contract, profile, expected
            ),
        )),
        None => Err(LedgerError::parse(
            CONTRACTS_FILE,
            None,
            format!("contract {} references missing profile {}", contract, profile),
        )),
    }
}

/// Read one CSV file into typed rows
///
/// The reader trims whitespace around fields, so hand-edited files
/// with padded columns still load.
fn read_rows<T: DeserializeOwned>(path: &Path, file_name: &str) -> Result<Vec<T>, LedgerError> {
    let file = File::open(path)
        .map_err(|e| LedgerError::io(format!("Failed to open '{}': {}", path.display(), e)))?;

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row = result.map_err(|e| {
            LedgerError::parse(file_name, e.position().map(|p| p.line()), e.to_string())
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write profiles to CSV
///
/// Rows are sorted by id for deterministic output.
pub fn write_profiles_csv(profiles: &[Profile], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["id", "type", "first_name", "last_name", "profession", "balance"])
        .map_err(|e| LedgerError::io(format!("Failed to write profiles header: {}", e)))?;

    let mut sorted = profiles.to_vec();
    sorted.sort_by_key(|profile| profile.id);

    for profile in &sorted {
        let role = match profile.role {
            ProfileRole::Client => "client",
            ProfileRole::Contractor => "contractor",
        };
        writer
            .write_record(&[
                profile.id.to_string(),
                role.to_string(),
                profile.first_name.clone(),
                profile.last_name.clone(),
                profile.profession.clone(),
                profile.balance.to_string(),
            ])
            .map_err(|e| LedgerError::io(format!("Failed to write profile record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| LedgerError::io(format!("Failed to flush profiles output: {}", e)))?;

    Ok(())
}

/// Write jobs to CSV
///
/// Rows are sorted by id. The paid column is "true" or empty, and
/// timestamps are RFC 3339 in UTC, matching what the loader accepts.
pub fn write_jobs_csv(jobs: &[Job], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["id", "contract_id", "description", "price", "paid", "created_at"])
        .map_err(|e| LedgerError::io(format!("Failed to write jobs header: {}", e)))?;

    let mut sorted = jobs.to_vec();
    sorted.sort_by_key(|job| job.id);

    for job in &sorted {
        let paid = if job.is_paid() { "true" } else { "" };
        writer
            .write_record(&[
                job.id.to_string(),
                job.contract_id.to_string(),
                job.description.clone(),
                job.price.to_string(),
                paid.to_string(),
                job.created_at
                    .to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            ])
            .map_err(|e| LedgerError::io(format!("Failed to write job record: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| LedgerError::io(format!("Failed to flush jobs output: {}", e)))?;

    Ok(())
}

/// Persist the mutable dataset files back to a directory
///
/// Deposits and payments only ever change profiles and jobs, so
/// `contracts.csv` is left untouched.
pub fn save(dir: &Path, profiles: &[Profile], jobs: &[Job]) -> Result<(), LedgerError> {
    let profiles_path = dir.join(PROFILES_FILE);
    let mut profiles_out = File::create(&profiles_path).map_err(|e| {
        LedgerError::io(format!("Failed to create '{}': {}", profiles_path.display(), e))
    })?;
    write_profiles_csv(profiles, &mut profiles_out)?;

    let jobs_path = dir.join(JOBS_FILE);
    let mut jobs_out = File::create(&jobs_path)
        .map_err(|e| LedgerError::io(format!("Failed to create '{}': {}", jobs_path.display(), e)))?;
    write_jobs_csv(jobs, &mut jobs_out)?;

    info!(dir = %dir.display(), "dataset saved");
    Ok(())
}
