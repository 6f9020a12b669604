//! # Star Ledger
//!
//! A single-node, tamper-evident ledger of registered stars. Clients prove
//! they control an address by signing a short-lived challenge, then append
//! a star to a hash-linked block chain that anyone can query and validate.
//!
//! ## Key Concepts
//!
//! - **Block**: Immutable once appended. Linked to its predecessor by hash.
//! - **Genesis**: Height 0, created with the ledger, carries no star.
//! - **Challenge**: `"<address>:<unix-seconds>:starRegistry"`, valid for 300s.
//! - **Validation**: Every append revalidates the whole chain and rolls back
//!   on any finding.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use starledger::ChainService;
//! use starledger::core::{Ed25519Verifier, Keypair};
//! use serde_json::json;
//!
//! fn example() -> starledger::Result<()> {
//!     let service = ChainService::with_verifier(Arc::new(Ed25519Verifier))?;
//!     let keypair = Keypair::generate();
//!     let address = keypair.address();
//!
//!     let challenge = service.request_ownership(&address)?;
//!     let message = challenge.message();
//!     let signature = keypair.sign(&message);
//!
//!     let block = service.submit_star(&address, &message, &signature, json!({"story": "hi"}))?;
//!     assert!(service.validate_chain().is_empty());
//!     assert_eq!(service.get_block_by_height(block.height)?, block);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `starledger::core` - Blocks, digests, capabilities, codec
//! - `starledger::chain` - The ledger and its integrity checker
//! - `starledger::ownership` - Challenges and ownership verification

pub mod config;
pub mod error;
pub mod service;

// Re-export component crates
pub use starledger_chain as chain;
pub use starledger_core as core;
pub use starledger_ownership as ownership;

// Re-export main types for convenience
pub use config::ServiceConfig;
pub use error::{ErrorKind, Result, ServiceError};
pub use service::ChainService;

// Re-export commonly used types
pub use starledger_chain::{ChainLedger, IntegrityError};
pub use starledger_core::{Address, Block, BlockHash, BlockPayload};
pub use starledger_ownership::{Challenge, OwnershipConfig, StarRecord};
