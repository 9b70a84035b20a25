//! Actor authorization policy
//!
//! Stateless predicates deciding whether an actor may perform a ledger
//! operation. Role checks gate the mutating operations; the ownership
//! predicate backs the query filters so reads never leak entities the
//! actor is not a party to.

use crate::types::{Contract, LedgerError, Profile, ProfileId};
use std::fmt;

/// Ledger operations subject to the client-only role check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerOperation {
    /// Fund the actor's own balance
    Deposit,
    /// Move funds from the actor to a contractor for one job
    PayJob,
}

impl fmt::Display for LedgerOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerOperation::Deposit => write!(f, "deposit funds"),
            LedgerOperation::PayJob => write!(f, "pay for a job"),
        }
    }
}

/// Require the actor to hold the client role
///
/// Deposits and job payments move the actor's own money, so both are
/// reserved to clients.
///
/// # Errors
///
/// Returns [`LedgerError::Unauthorized`] naming the refused operation
/// when the actor is a contractor.
pub fn require_client(actor: &Profile, operation: LedgerOperation) -> Result<(), LedgerError> {
    if actor.is_client() {
        Ok(())
    } else {
        Err(LedgerError::unauthorized(actor.id, &operation.to_string()))
    }
}

/// Whether the profile is a party to the contract, on either side
pub fn is_contract_party(profile: ProfileId, contract: &Contract) -> bool {
    contract.client_id == profile || contract.contractor_id == profile
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContractStatus, ProfileRole};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn profile(role: ProfileRole) -> Profile {
        Profile {
            id: 1,
            role,
            first_name: "Harry".to_string(),
            last_name: "Potter".to_string(),
            profession: "Wizard".to_string(),
            balance: Decimal::new(1150, 0),
        }
    }

    fn contract(client_id: ProfileId, contractor_id: ProfileId) -> Contract {
        Contract {
            id: 1,
            client_id,
            contractor_id,
            terms: "bla bla bla".to_string(),
            status: ContractStatus::InProgress,
        }
    }

    #[rstest]
    #[case::deposit(LedgerOperation::Deposit, "deposit funds")]
    #[case::pay_job(LedgerOperation::PayJob, "pay for a job")]
    fn test_operation_display(#[case] operation: LedgerOperation, #[case] expected: &str) {
        assert_eq!(operation.to_string(), expected);
    }

    #[rstest]
    #[case::client_deposit(ProfileRole::Client, LedgerOperation::Deposit, true)]
    #[case::client_pay(ProfileRole::Client, LedgerOperation::PayJob, true)]
    #[case::contractor_deposit(ProfileRole::Contractor, LedgerOperation::Deposit, false)]
    #[case::contractor_pay(ProfileRole::Contractor, LedgerOperation::PayJob, false)]
    fn test_require_client(
        #[case] role: ProfileRole,
        #[case] operation: LedgerOperation,
        #[case] allowed: bool,
    ) {
        let result = require_client(&profile(role), operation);
        assert_eq!(result.is_ok(), allowed);
        if !allowed {
            assert!(matches!(
                result.unwrap_err(),
                LedgerError::Unauthorized { profile: 1, .. }
            ));
        }
    }

    #[rstest]
    #[case::client_side(1, 1, 2, true)]
    #[case::contractor_side(2, 1, 2, true)]
    #[case::outsider(3, 1, 2, false)]
    fn test_is_contract_party(
        #[case] profile: ProfileId,
        #[case] client_id: ProfileId,
        #[case] contractor_id: ProfileId,
        #[case] expected: bool,
    ) {
        assert_eq!(
            is_contract_party(profile, &contract(client_id, contractor_id)),
            expected
        );
    }
}
