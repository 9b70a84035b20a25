//! Profile types for the marketplace ledger
//!
//! This module defines the Profile structure representing a marketplace
//! party (client or contractor) and its role enumeration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Profile identifier
///
/// Supports profile IDs from 0 to 4,294,967,295
pub type ProfileId = u32;

/// Marketplace role of a profile
///
/// Clients fund jobs and pay for them; contractors perform jobs and
/// receive the payments. A profile holds exactly one role for its
/// whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    /// Hires contractors, deposits funds, and pays for jobs
    Client,

    /// Performs jobs and is credited when they are paid
    Contractor,
}

/// A party in the marketplace
///
/// Holds the single scalar balance the ledger operates on. The balance
/// is never negative as a committed value; only the ledger engine's
/// deposit and job-payment operations may change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The profile ID (u32: 0-4,294,967,295)
    pub id: ProfileId,

    /// Whether this profile acts as a client or a contractor
    #[serde(rename = "type")]
    pub role: ProfileRole,

    /// First name, used to build the display name
    pub first_name: String,

    /// Last name, used to build the display name
    pub last_name: String,

    /// Trade of the profile, aggregated by earnings reports
    ///
    /// Meaningful for contractors; clients may carry one as well.
    pub profession: String,

    /// Current funds, in the single implied currency
    ///
    /// Invariant: never negative once committed.
    pub balance: Decimal,
}

impl Profile {
    /// Whether this profile is a client
    pub fn is_client(&self) -> bool {
        self.role == ProfileRole::Client
    }

    /// Display name: first name, a space, last name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
