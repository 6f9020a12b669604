//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use serde_json::Value;
use starledger::{ChainService, Result, ServiceConfig};
use starledger_core::{
    Address, Blake3Hasher, Block, CoreError, Ed25519Verifier, Keypair, ManualClock,
    SignatureVerifier,
};

/// Time every fixture clock starts at.
pub const FIXTURE_TIME: i64 = 1_532_296_090;

/// A test fixture: a keypair, a manual clock and a service using both.
pub struct TestFixture {
    pub keypair: Keypair,
    pub clock: Arc<ManualClock>,
    pub service: ChainService,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self::with_keypair(Keypair::generate())
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_keypair(Keypair::from_seed(&seed))
    }

    fn with_keypair(keypair: Keypair) -> Self {
        let clock = Arc::new(ManualClock::new(FIXTURE_TIME));
        let service = ChainService::new(
            ServiceConfig::default(),
            Arc::new(Blake3Hasher),
            Arc::new(Ed25519Verifier),
            clock.clone(),
        )
        .expect("fresh ledger");

        Self {
            keypair,
            clock,
            service,
        }
    }

    /// The keypair's address.
    pub fn address(&self) -> Address {
        self.keypair.address()
    }

    /// Request a challenge for this fixture's address.
    pub fn challenge(&self) -> String {
        self.service
            .request_ownership(&self.address())
            .expect("valid address")
            .message()
    }

    /// Challenge, sign and submit `star` as `keypair`.
    pub fn register_as(&self, keypair: &Keypair, star: Value) -> Result<Block> {
        let address = keypair.address();
        let message = self.service.request_ownership(&address)?.message();
        let signature = keypair.sign(&message);
        self.service.submit_star(&address, &message, &signature, star)
    }

    /// Challenge, sign and submit `star` as this fixture's keypair.
    pub fn register(&self, star: Value) -> Result<Block> {
        self.register_as(&self.keypair, star)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic keypairs for multi-party tests.
pub fn parties(count: usize) -> Vec<Keypair> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[1] = 0x5a;
            Keypair::from_seed(&seed)
        })
        .collect()
}

/// Accepts `StubVerifier::sign(message)` as the signature of any address.
///
/// Lets tests use addresses from other schemes, such as `"1A1zP1..."`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubVerifier;

impl StubVerifier {
    /// The signature this verifier accepts for `message`.
    pub fn sign(message: &str) -> String {
        format!("stub-signature({message})")
    }
}

impl SignatureVerifier for StubVerifier {
    fn verify(
        &self,
        message: &str,
        _address: &Address,
        signature: &str,
    ) -> starledger_core::Result<()> {
        if signature == Self::sign(message) {
            Ok(())
        } else {
            Err(CoreError::InvalidSignature)
        }
    }
}

/// A service backed by [`StubVerifier`] and the given clock.
pub fn stub_service(clock: Arc<ManualClock>) -> ChainService {
    ChainService::new(
        ServiceConfig::default(),
        Arc::new(Blake3Hasher),
        Arc::new(StubVerifier),
        clock,
    )
    .expect("fresh ledger")
}

/// Install a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
