//! Error types for the ledger.

use starledger_core::CoreError;
use thiserror::Error;

use crate::integrity::IntegrityError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Validation after a tentative append (or of a restored snapshot) failed.
    #[error("chain rejected: {}", render_errors(.0))]
    ChainRejected(Vec<IntegrityError>),

    /// The ledger violated one of its own invariants.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    /// Block encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),
}

impl LedgerError {
    /// The integrity findings carried by a rejection, if any.
    pub fn integrity_errors(&self) -> &[IntegrityError] {
        match self {
            LedgerError::ChainRejected(errors) => errors,
            _ => &[],
        }
    }
}

fn render_errors(errors: &[IntegrityError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
