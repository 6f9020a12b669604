//! Error types for ownership verification.

use thiserror::Error;

/// Reasons an ownership proof is rejected.
#[derive(Debug, Error)]
pub enum OwnershipError {
    /// The challenge is older than the freshness window.
    #[error("registry request expired ({elapsed}s old)")]
    ExpiredRequest { elapsed: i64 },

    /// The signature does not verify for the address and challenge.
    #[error("signature does not match address")]
    SignatureMismatch,

    /// The challenge could not be used as issued.
    ///
    /// Covers a message that does not parse, a tag other than the configured
    /// one, an embedded address other than the submitting one, and a timestamp
    /// outside the representable or skew-tolerated range. These are checked
    /// before expiry and signature, so a stale challenge for the wrong address
    /// reports this variant rather than [`OwnershipError::ExpiredRequest`].
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// No challenge can be issued for this address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Result type for ownership operations.
pub type Result<T> = std::result::Result<T, OwnershipError>;
