//! Error types for the ledger engine.

use starledger_core::ValidationFault;
use starledger_proof::VerifyError;
use thiserror::Error;

/// Failures from the internal insertion path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The existing chain failed validation; nothing was appended.
    /// Fatal to this insertion attempt, never auto-repaired.
    #[error("chain failed validation before insert: {} fault(s)", faults.len())]
    ChainTampered { faults: Vec<ValidationFault> },
}

/// Failures from submitting a claim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The ownership proof was rejected; the ledger was not touched.
    #[error(transparent)]
    Verification(#[from] VerifyError),

    /// The existing chain failed validation; nothing was appended.
    #[error("chain failed validation before insert: {} fault(s)", faults.len())]
    ChainTampered { faults: Vec<ValidationFault> },
}

impl From<InsertError> for SubmitError {
    fn from(e: InsertError) -> Self {
        match e {
            InsertError::ChainTampered { faults } => SubmitError::ChainTampered { faults },
        }
    }
}
