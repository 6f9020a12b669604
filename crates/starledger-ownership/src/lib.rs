//! # Star Ledger Ownership
//!
//! Proof that a client controls an address before it may register a star.
//!
//! ## Flow
//!
//! 1. The client asks for a challenge: `"<address>:<unix-seconds>:starRegistry"`.
//! 2. The client signs the challenge with the key behind the address.
//! 3. [`OwnershipVerifier::verify_and_build_payload`] checks the challenge
//!    shape, its freshness and the signature, then yields the
//!    [`StarRecord`] to store.
//!
//! Signature schemes plug in through
//! [`SignatureVerifier`](starledger_core::SignatureVerifier).

pub mod challenge;
pub mod error;
pub mod record;
pub mod verifier;

pub use challenge::{Challenge, DEFAULT_CHALLENGE_TAG, FRESHNESS_WINDOW_SECS};
pub use error::{OwnershipError, Result};
pub use record::StarRecord;
pub use verifier::{OwnershipConfig, OwnershipVerifier};
