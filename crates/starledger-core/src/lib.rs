//! # Star Ledger Core
//!
//! Pure primitives for the Star Ledger: blocks, digests, the canonical hash
//! input and the payload codec.
//!
//! This crate contains no I/O, no locking, no storage. It is pure computation
//! over the block data model plus the capability traits the ledger is built
//! against.
//!
//! ## Key Types
//!
//! - [`Block`] - One hash-linked entry of the ledger
//! - [`BlockPayload`] - Genesis sentinel or opaque encoded bytes
//! - [`BlockHash`] - 32-byte digest produced by a [`Hasher`]
//! - [`Address`] - Owner identity, checked by a [`SignatureVerifier`]
//!
//! ## Capabilities
//!
//! Hashing, signature verification and time are injected through the
//! [`Hasher`], [`SignatureVerifier`] and [`Clock`] traits so the ledger can be
//! driven by deterministic fakes in tests.
//!
//! ## Canonicalization
//!
//! Block hashes are computed over deterministic CBOR. See [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod clock;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod types;

pub use block::{Block, BlockPayload, GENESIS_SENTINEL};
pub use canonical::{canonical_hash_input, decode_hash_input, HashInput};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::BlockCodec;
pub use crypto::{
    Blake3Hasher, Ed25519Verifier, Hasher, Keypair, Sha256Hasher, SignatureVerifier,
};
pub use error::{CoreError, Result};
pub use types::{Address, BlockHash};
