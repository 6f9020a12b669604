//! Error types for the Star Ledger Core.

use thiserror::Error;

/// Core errors that can occur while encoding, decoding or verifying blocks.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("block {height} payload could not be decoded: {reason}")]
    Decoding { height: u64, reason: String },

    #[error("canonical encoding error: {0}")]
    Canonical(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
