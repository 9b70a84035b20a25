//! Error types for the marketplace ledger
//!
//! This module defines all error types that can occur during ledger
//! operations, queries, and dataset handling. Errors are designed to be
//! descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Authorization Errors**: Role mismatches on ledger operations
//! - **Lookup Errors**: Profiles, contracts, or jobs that are absent,
//!   not owned by the actor, or already settled
//! - **Business-Rule Rejections**: Deposit cap, insufficient funds,
//!   invalid amounts; always detected before any mutation
//! - **Storage Errors**: Transactional failures, always accompanied by
//!   a guaranteed rollback
//! - **Dataset Errors**: File I/O, CSV parsing, and configuration
//!   problems at the edges of the system

use super::contract::ContractId;
use super::job::JobId;
use super::profile::ProfileId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the marketplace ledger
///
/// This enum represents all possible errors that can occur during
/// ledger operations. Each variant includes relevant context to help
/// diagnose and resolve the issue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Actor's role does not permit the operation
    ///
    /// Deposits and job payments are reserved to clients.
    #[error("Profile {profile} must be a client to {operation}")]
    Unauthorized {
        /// Profile that attempted the operation
        profile: ProfileId,
        /// Operation that was refused
        operation: String,
    },

    /// Profile does not exist
    ///
    /// Raised when resolving the acting profile for an operation.
    #[error("Profile {profile} not found")]
    ProfileNotFound {
        /// The profile ID that was not found
        profile: ProfileId,
    },

    /// Contract absent or not owned by the actor
    ///
    /// Deliberately ambiguous: a contract another party owns looks
    /// exactly like one that does not exist.
    #[error("Contract {contract} not found")]
    ContractNotFound {
        /// The contract ID that was not found
        contract: ContractId,
    },

    /// Job absent, already paid, or owned by another client
    ///
    /// Deliberately ambiguous for the same reason as
    /// [`LedgerError::ContractNotFound`]. Also the outcome of losing a
    /// payment race: the job was settled by the time this call reached it.
    #[error("Job {job} not found")]
    JobNotFound {
        /// The job ID that was not found
        job: JobId,
    },

    /// Deposit exceeds the cap derived from outstanding jobs
    ///
    /// No mutation occurs and no transaction is opened.
    #[error("Deposit of {amount} for profile {profile} exceeds the cap of {cap}")]
    DepositCapExceeded {
        /// Client that attempted the deposit
        profile: ProfileId,
        /// Amount that was requested
        amount: Decimal,
        /// Maximum deposit currently allowed
        cap: Decimal,
    },

    /// Balance does not cover the requested amount
    ///
    /// Raised before the payment transaction opens, and again inside it
    /// if a concurrent operation drained the balance in between.
    #[error("Insufficient funds for profile {profile}: balance {balance}, required {required}")]
    InsufficientFunds {
        /// Profile whose balance fell short
        profile: ProfileId,
        /// Balance at the time of the check
        balance: Decimal,
        /// Amount the operation required
        required: Decimal,
    },

    /// Deposit amount is zero or negative
    ///
    /// A non-positive deposit would act as a disguised withdrawal and
    /// could drive a balance negative, so it is rejected outright.
    #[error("Invalid amount {amount}: deposits must be positive")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected to keep every balance exact.
    #[error("Arithmetic overflow in {operation} for profile {profile}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Profile whose balance was involved
        profile: ProfileId,
    },

    /// Storage-layer failure inside a transaction
    ///
    /// Every mutation applied before the failure has been rolled back.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure
        message: String,
    },

    /// Configuration file is invalid
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem
        message: String,
    },

    /// I/O error occurred while reading or writing dataset files
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// Dataset record failed to parse or validate
    #[error("Parse error in {file}{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Dataset file the record came from
        file: String,
        /// Line number within the file (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an Unauthorized error
    pub fn unauthorized(profile: ProfileId, operation: &str) -> Self {
        LedgerError::Unauthorized {
            profile,
            operation: operation.to_string(),
        }
    }

    /// Create a ProfileNotFound error
    pub fn profile_not_found(profile: ProfileId) -> Self {
        LedgerError::ProfileNotFound { profile }
    }

    /// Create a ContractNotFound error
    pub fn contract_not_found(contract: ContractId) -> Self {
        LedgerError::ContractNotFound { contract }
    }

    /// Create a JobNotFound error
    pub fn job_not_found(job: JobId) -> Self {
        LedgerError::JobNotFound { job }
    }

    /// Create a DepositCapExceeded error
    pub fn deposit_cap_exceeded(profile: ProfileId, amount: Decimal, cap: Decimal) -> Self {
        LedgerError::DepositCapExceeded {
            profile,
            amount,
            cap,
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(profile: ProfileId, balance: Decimal, required: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            profile,
            balance,
            required,
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, profile: ProfileId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            profile,
        }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        LedgerError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Io error
    pub fn io(message: impl Into<String>) -> Self {
        LedgerError::Io {
            message: message.into(),
        }
    }

    /// Create a Parse error
    pub fn parse(file: &str, line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::Parse {
            file: file.to_string(),
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::unauthorized(
        LedgerError::Unauthorized { profile: 7, operation: "deposit funds".to_string() },
        "Profile 7 must be a client to deposit funds"
    )]
    #[case::profile_not_found(
        LedgerError::ProfileNotFound { profile: 99 },
        "Profile 99 not found"
    )]
    #[case::contract_not_found(
        LedgerError::ContractNotFound { contract: 12 },
        "Contract 12 not found"
    )]
    #[case::job_not_found(
        LedgerError::JobNotFound { job: 5 },
        "Job 5 not found"
    )]
    #[case::deposit_cap_exceeded(
        LedgerError::DepositCapExceeded { profile: 1, amount: Decimal::new(76, 0), cap: Decimal::new(75, 0) },
        "Deposit of 76 for profile 1 exceeds the cap of 75"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds { profile: 1, balance: Decimal::new(130, 1), required: Decimal::new(200, 0) },
        "Insufficient funds for profile 1: balance 13.0, required 200"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: Decimal::new(-5, 0) },
        "Invalid amount -5: deposits must be positive"
    )]
    #[case::arithmetic_overflow(
        LedgerError::ArithmeticOverflow { operation: "credit".to_string(), profile: 6 },
        "Arithmetic overflow in credit for profile 6"
    )]
    #[case::storage(
        LedgerError::Storage { message: "profile 6 missing during credit".to_string() },
        "Storage error: profile 6 missing during credit"
    )]
    #[case::invalid_config(
        LedgerError::InvalidConfig { message: "deposit_cap_ratio must be positive".to_string() },
        "Invalid configuration: deposit_cap_ratio must be positive"
    )]
    #[case::parse_with_line(
        LedgerError::Parse { file: "jobs.csv".to_string(), line: Some(4), message: "invalid price".to_string() },
        "Parse error in jobs.csv at line 4: invalid price"
    )]
    #[case::parse_without_line(
        LedgerError::Parse { file: "jobs.csv".to_string(), line: None, message: "job 5 references missing contract 9".to_string() },
        "Parse error in jobs.csv: job 5 references missing contract 9"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::unauthorized(
        LedgerError::unauthorized(7, "deposit funds"),
        LedgerError::Unauthorized { profile: 7, operation: "deposit funds".to_string() }
    )]
    #[case::job_not_found(
        LedgerError::job_not_found(5),
        LedgerError::JobNotFound { job: 5 }
    )]
    #[case::deposit_cap_exceeded(
        LedgerError::deposit_cap_exceeded(1, Decimal::new(76, 0), Decimal::new(75, 0)),
        LedgerError::DepositCapExceeded { profile: 1, amount: Decimal::new(76, 0), cap: Decimal::new(75, 0) }
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds(1, Decimal::new(100, 0), Decimal::new(200, 0)),
        LedgerError::InsufficientFunds { profile: 1, balance: Decimal::new(100, 0), required: Decimal::new(200, 0) }
    )]
    #[case::arithmetic_overflow(
        LedgerError::arithmetic_overflow("credit", 6),
        LedgerError::ArithmeticOverflow { operation: "credit".to_string(), profile: 6 }
    )]
    #[case::parse(
        LedgerError::parse("profiles.csv", Some(2), "invalid balance"),
        LedgerError::Parse { file: "profiles.csv".to_string(), line: Some(2), message: "invalid balance".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
