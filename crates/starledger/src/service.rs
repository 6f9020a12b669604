//! ChainService: the operations exposed to the routing layer.

use std::sync::Arc;

use starledger_chain::{ChainLedger, Corruption, IntegrityError};
use starledger_core::{
    Address, Blake3Hasher, Block, BlockHash, Clock, Hasher, SignatureVerifier, SystemClock,
};
use starledger_ownership::{Challenge, OwnershipVerifier, StarRecord};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};

/// The star registry service.
///
/// Composes ownership verification with the ledger. `Send + Sync`; share it
/// across threads with an `Arc`.
pub struct ChainService {
    ledger: Arc<ChainLedger>,
    ownership: OwnershipVerifier,
    config: ServiceConfig,
}

impl ChainService {
    /// Create a service over a fresh ledger.
    pub fn new(
        config: ServiceConfig,
        hasher: Arc<dyn Hasher>,
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let ledger = ChainLedger::new(hasher, clock.clone())?;
        Ok(Self::from_parts(config, ledger, verifier, clock))
    }

    /// Create a service with Blake3 hashing, the system clock and default config.
    pub fn with_verifier(verifier: Arc<dyn SignatureVerifier>) -> Result<Self> {
        Self::new(
            ServiceConfig::default(),
            Arc::new(Blake3Hasher),
            verifier,
            Arc::new(SystemClock),
        )
    }

    /// Create a service over a ledger restored from a snapshot.
    pub fn from_snapshot(
        blocks: Vec<Block>,
        config: ServiceConfig,
        hasher: Arc<dyn Hasher>,
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let ledger = ChainLedger::restore(blocks, hasher, clock.clone())?;
        Ok(Self::from_parts(config, ledger, verifier, clock))
    }

    fn from_parts(
        config: ServiceConfig,
        ledger: ChainLedger,
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let ownership = OwnershipVerifier::new(verifier, clock, config.ownership.clone());
        Self {
            ledger: Arc::new(ledger),
            ownership,
            config,
        }
    }

    /// Get the ledger, e.g. to take a snapshot.
    pub fn ledger(&self) -> &Arc<ChainLedger> {
        &self.ledger
    }

    /// Get the configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue an ownership challenge for `address`.
    pub fn request_ownership(&self, address: &Address) -> Result<Challenge> {
        Ok(self.ownership.request_challenge(address)?)
    }

    /// Verify an ownership proof and append the star to the ledger.
    ///
    /// On any error the ledger is unchanged.
    pub fn submit_star(
        &self,
        address: &Address,
        message: &str,
        signature: &str,
        star: serde_json::Value,
    ) -> Result<Block> {
        let record = self
            .ownership
            .verify_and_build_payload(address, message, signature, star)?;
        let payload = record.to_payload()?;
        let block = self.ledger.append(payload, Some(address.clone()))?;

        tracing::info!(%address, height = block.height, hash = %block.hash, "registered star");
        Ok(block)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the block at `height`.
    pub fn get_block_by_height(&self, height: u64) -> Result<Block> {
        self.ledger
            .get_by_height(height)
            .ok_or_else(|| ServiceError::NotFound(format!("block at height {height}")))
    }

    /// Get the block with the given hex digest.
    ///
    /// Text that is not a digest cannot match any block and is reported as
    /// not found.
    pub fn get_block_by_hash(&self, hash: &str) -> Result<Block> {
        let not_found = || ServiceError::NotFound(format!("block with hash {hash}"));

        let Ok(digest) = BlockHash::from_hex(hash) else {
            return Err(not_found());
        };
        self.ledger.get_by_hash(&digest)?.ok_or_else(not_found)
    }

    /// Get every star registered to `address`, in height order.
    pub fn get_stars_by_owner(&self, address: &Address) -> Result<Vec<StarRecord>> {
        let stars: Vec<StarRecord> = self.ledger.get_by_owner(address)?;
        if stars.is_empty() {
            return Err(ServiceError::NotFound(format!("stars owned by {address}")));
        }
        Ok(stars)
    }

    /// Validate the whole chain. Empty means intact.
    pub fn validate_chain(&self) -> Vec<IntegrityError> {
        self.ledger.validate()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Diagnostics
    // ─────────────────────────────────────────────────────────────────────────

    /// Break the link of the block at `height`, for exercising validation.
    pub fn corrupt_block_at_height(&self, height: u64) -> Result<Block> {
        self.ledger
            .corrupt(height, Corruption::BreakLink)
            .ok_or_else(|| ServiceError::NotFound(format!("block at height {height}")))
    }
}

impl std::fmt::Debug for ChainService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainService")
            .field("ledger", &self.ledger)
            .field("config", &self.config)
            .finish()
    }
}
