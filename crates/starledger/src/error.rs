//! Error types for the service.

use serde::Serialize;
use starledger_chain::LedgerError;
use starledger_core::CoreError;
use starledger_ownership::OwnershipError;
use thiserror::Error;

/// Errors that can occur during service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No block or star matched the query.
    #[error("not found: {0}")]
    NotFound(String),

    /// Ledger error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Ownership proof rejected.
    #[error("ownership error: {0}")]
    Ownership(#[from] OwnershipError),

    /// An accepted star could not be encoded for storage.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),
}

/// Flat classification of [`ServiceError`] for mapping to status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    NotFound,
    ChainRejected,
    ExpiredRequest,
    SignatureMismatch,
    MalformedChallenge,
    Encoding,
    InternalConsistency,
    InvalidRequest,
}

impl ServiceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Ledger(e) => match e {
                LedgerError::ChainRejected(_) => ErrorKind::ChainRejected,
                LedgerError::InternalConsistency(_) => ErrorKind::InternalConsistency,
                LedgerError::Codec(_) => ErrorKind::Encoding,
            },
            ServiceError::Ownership(e) => match e {
                OwnershipError::ExpiredRequest { .. } => ErrorKind::ExpiredRequest,
                OwnershipError::SignatureMismatch => ErrorKind::SignatureMismatch,
                OwnershipError::MalformedChallenge(_) => ErrorKind::MalformedChallenge,
                OwnershipError::InvalidAddress(_) => ErrorKind::InvalidRequest,
            },
            ServiceError::Codec(_) => ErrorKind::Encoding,
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
