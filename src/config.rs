//! Configuration for the ledger
//!
//! Tunable policy values with defaults matching the reference
//! marketplace rules. Loadable from a TOML file; any omitted key keeps
//! its default.

use crate::types::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Fraction of a client's outstanding job total a single deposit
    /// may not exceed
    pub deposit_cap_ratio: Decimal,

    /// How many clients the best-clients report returns when the caller
    /// passes no explicit limit
    pub best_clients_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            deposit_cap_ratio: Decimal::new(25, 2),
            best_clients_limit: 2,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse as
    /// TOML, contains unknown keys, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self, LedgerError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::io(format!("failed to read '{}': {}", path.display(), e)))?;
        let config: LedgerConfig =
            toml::from_str(&raw).map_err(|e| LedgerError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration values are usable
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidConfig`] if the cap ratio is not
    /// positive or the best-clients limit is zero.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.deposit_cap_ratio <= Decimal::ZERO {
            return Err(LedgerError::invalid_config(format!(
                "deposit_cap_ratio must be positive, got {}",
                self.deposit_cap_ratio
            )));
        }
        if self.best_clients_limit == 0 {
            return Err(LedgerError::invalid_config(
                "best_clients_limit must be at least 1",
            ));
        }
        Ok(())
    }
}
