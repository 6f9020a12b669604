//! # Star Ledger Chain
//!
//! The in-memory block ledger. [`ChainLedger`] owns the ordered block
//! sequence, assigns heights and links, and validates the whole chain on
//! every append.
//!
//! ## Key Types
//!
//! - [`ChainLedger`] - The ledger, guarded by a single `RwLock`
//! - [`IntegrityError`] - One finding of [`validate`]
//! - [`Corruption`] - Diagnostic mutations for tamper-detection tests
//!
//! ## Design Notes
//!
//! - **Atomic append**: the tentative block is pushed, the chain validated,
//!   and the block popped again if anything is wrong. Readers never see a
//!   tentative block.
//! - **No short-circuit**: [`validate`] reports broken links and bad hashes
//!   over the full sequence.
//! - **Snapshots**: [`ChainLedger::snapshot`] and [`ChainLedger::restore`]
//!   are the seam for durability layered on top.

pub mod error;
pub mod integrity;
pub mod ledger;

pub use error::{LedgerError, Result};
pub use integrity::{validate, IntegrityError};
pub use ledger::{ChainLedger, Corruption, BOGUS_LINK};
