//! # Star Ledger Testkit
//!
//! Testing utilities for the Star Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned canonical hash inputs and digests
//! - **Generators**: Proptest strategies for stars, addresses and hash inputs
//! - **Fixtures**: A ready service with a deterministic key and a manual clock
//!
//! ## Golden Vectors
//!
//! ```rust
//! use starledger_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok) in verify_all_vectors() {
//!     assert!(ok, "{name}");
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use starledger_testkit::fixtures::TestFixture;
//! use serde_json::json;
//!
//! let fixture = TestFixture::new();
//! let block = fixture.register(json!({"story": "first"})).unwrap();
//! assert_eq!(block.height, 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{init_tracing, parties, stub_service, StubVerifier, TestFixture, FIXTURE_TIME};
pub use generators::{hash_input, star};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
