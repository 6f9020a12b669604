//! ChainLedger: the append-only block sequence.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use starledger_core::{
    Address, Block, BlockCodec, BlockHash, BlockPayload, Clock, CoreError, HashInput, Hasher,
};

use crate::error::{LedgerError, Result};
use crate::integrity::{validate, IntegrityError};

/// The digest written by [`Corruption::BreakLink`].
pub const BOGUS_LINK: BlockHash = BlockHash::from_bytes([0x11; 32]);

/// A diagnostic mutation applied to a stored block without rehashing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Corruption {
    /// Overwrite `previous_hash` with [`BOGUS_LINK`].
    BreakLink,
    /// Replace the stored payload bytes.
    OverwritePayload(Vec<u8>),
    /// Replace the stored owner.
    ReassignOwner(Address),
}

/// The block ledger.
///
/// Thread-safe via a single RwLock. Appends hold the write lock across
/// compute, push, validate and commit-or-rollback.
pub struct ChainLedger {
    inner: RwLock<LedgerInner>,
    hasher: Arc<dyn Hasher>,
    clock: Arc<dyn Clock>,
}

struct LedgerInner {
    blocks: Vec<Block>,
}

/// A block pushed for validation. Popped on drop unless committed,
/// including on unwind.
struct Tentative<'a> {
    blocks: &'a mut Vec<Block>,
    committed: bool,
}

impl Drop for Tentative<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.blocks.pop();
        }
    }
}

impl ChainLedger {
    /// Create a ledger seeded with a genesis block stamped by `clock`.
    pub fn new(hasher: Arc<dyn Hasher>, clock: Arc<dyn Clock>) -> Result<Self> {
        let genesis = Block::genesis(clock.now(), hasher.as_ref())?;
        tracing::info!(hash = %genesis.hash, "seeded genesis block");

        Ok(Self {
            inner: RwLock::new(LedgerInner {
                blocks: vec![genesis],
            }),
            hasher,
            clock,
        })
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// The snapshot must start with genesis and validate cleanly.
    pub fn restore(
        blocks: Vec<Block>,
        hasher: Arc<dyn Hasher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let errors = validate(&blocks, hasher.as_ref());
        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "rejected snapshot");
            return Err(LedgerError::ChainRejected(errors));
        }

        tracing::info!(len = blocks.len(), "restored ledger from snapshot");
        Ok(Self {
            inner: RwLock::new(LedgerInner { blocks }),
            hasher,
            clock,
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, LedgerInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a block carrying `payload`.
    ///
    /// Height, link and timestamp are assigned here. If the chain does not
    /// validate with the new block in place, the block is removed again and
    /// every finding is returned in [`LedgerError::ChainRejected`].
    pub fn append(&self, payload: BlockPayload, owner: Option<Address>) -> Result<Block> {
        let mut inner = self.write();

        let height = inner.blocks.len() as u64;
        let previous_hash = inner.blocks.last().map(|b| b.hash);
        let block = Block::seal(
            HashInput {
                height,
                owner,
                payload,
                timestamp: self.clock.now(),
                previous_hash,
            },
            self.hasher.as_ref(),
        )?;

        let mut tentative = Tentative {
            blocks: &mut inner.blocks,
            committed: false,
        };
        tentative.blocks.push(block.clone());

        let errors = validate(&tentative.blocks[..], self.hasher.as_ref());
        if !errors.is_empty() {
            drop(tentative);
            tracing::warn!(height, errors = errors.len(), "append rolled back");
            return Err(LedgerError::ChainRejected(errors));
        }
        tentative.committed = true;

        tracing::debug!(height, hash = %block.hash, "appended block");
        Ok(block)
    }

    /// Apply a diagnostic corruption to the block at `height`.
    ///
    /// Returns the corrupted block, or `None` if out of range.
    pub fn corrupt(&self, height: u64, corruption: Corruption) -> Option<Block> {
        let mut inner = self.write();
        let block = inner.blocks.get_mut(usize::try_from(height).ok()?)?;

        match corruption {
            Corruption::BreakLink => block.previous_hash = Some(BOGUS_LINK),
            Corruption::OverwritePayload(bytes) => block.payload = BlockPayload::Encoded(bytes),
            Corruption::ReassignOwner(owner) => block.owner = Some(owner),
        }

        tracing::warn!(height, "corrupted block");
        Some(block.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate the whole chain. Empty means intact.
    pub fn validate(&self) -> Vec<IntegrityError> {
        let inner = self.read();
        validate(&inner.blocks, self.hasher.as_ref())
    }

    /// Get the block at `height`.
    pub fn get_by_height(&self, height: u64) -> Option<Block> {
        let inner = self.read();
        inner.blocks.get(usize::try_from(height).ok()?).cloned()
    }

    /// Get the block whose stored hash is `hash`.
    ///
    /// More than one match means the ledger is corrupt.
    pub fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<Block>> {
        let inner = self.read();
        let mut matches = inner.blocks.iter().filter(|b| b.hash == *hash);

        let found = matches.next().cloned();
        if matches.next().is_some() {
            tracing::error!(%hash, "multiple blocks share a hash");
            return Err(LedgerError::InternalConsistency(format!(
                "multiple blocks with hash {hash}"
            )));
        }
        Ok(found)
    }

    /// Decode the payloads of every block owned by `owner`, in height order.
    ///
    /// The first block that fails to decode aborts the query. An owned block
    /// holding the genesis payload counts as a decode failure.
    pub fn get_by_owner<T: DeserializeOwned>(&self, owner: &Address) -> Result<Vec<T>> {
        let inner = self.read();
        let mut payloads = Vec::new();

        for block in inner.blocks.iter().filter(|b| b.owner.as_ref() == Some(owner)) {
            let payload = BlockCodec::decode(block)?.ok_or_else(|| CoreError::Decoding {
                height: block.height,
                reason: "owned block carries the genesis payload".to_string(),
            })?;
            payloads.push(payload);
        }
        Ok(payloads)
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.read().blocks.len()
    }

    /// Always false: the ledger holds at least genesis.
    pub fn is_empty(&self) -> bool {
        self.read().blocks.is_empty()
    }

    /// Height of the tip.
    pub fn height(&self) -> u64 {
        self.tip().height
    }

    /// The most recently appended block.
    pub fn tip(&self) -> Block {
        let inner = self.read();
        inner.blocks[inner.blocks.len() - 1].clone()
    }

    /// A consistent copy of the whole sequence.
    pub fn snapshot(&self) -> Vec<Block> {
        self.read().blocks.clone()
    }
}

impl std::fmt::Debug for ChainLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainLedger")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use starledger_core::{Blake3Hasher, ManualClock};

    fn ledger() -> (ChainLedger, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let ledger = ChainLedger::new(Arc::new(Blake3Hasher), clock.clone()).unwrap();
        (ledger, clock)
    }

    fn star(n: u64) -> BlockPayload {
        BlockCodec::encode(&json!({ "star": n })).unwrap()
    }

    #[test]
    fn test_fresh_ledger() {
        let (ledger, _) = ledger();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.height(), 0);
        assert!(ledger.tip().is_genesis());
        assert_eq!(ledger.tip().timestamp, 1_000);
        assert!(ledger.validate().is_empty());
    }

    #[test]
    fn test_append_assigns_height_and_link() {
        let (ledger, clock) = ledger();
        let genesis = ledger.tip();

        clock.advance(5);
        let block = ledger.append(star(1), Some(Address::new("alice"))).unwrap();

        assert_eq!(block.height, 1);
        assert_eq!(block.previous_hash, Some(genesis.hash));
        assert_eq!(block.timestamp, 1_005);
        assert_eq!(ledger.get_by_height(1), Some(block));
        assert_eq!(ledger.get_by_height(2), None);
        assert!(ledger.validate().is_empty());
    }

    #[test]
    fn test_heights_track_appends() {
        let (ledger, _) = ledger();
        for n in 1..=10u64 {
            let block = ledger.append(star(n), None).unwrap();
            assert_eq!(ledger.get_by_height(n), Some(block));
            assert_eq!(ledger.get_by_height(n + 1), None);
            assert_eq!(ledger.len() as u64, n + 1);
        }
        assert!(ledger.validate().is_empty());
    }

    #[test]
    fn test_get_by_height_out_of_range() {
        let (ledger, _) = ledger();
        assert!(ledger.get_by_height(1).is_none());
        assert!(ledger.get_by_height(u64::MAX).is_none());
    }

    #[test]
    fn test_get_by_hash() {
        let (ledger, _) = ledger();
        let block = ledger.append(star(1), None).unwrap();

        assert_eq!(ledger.get_by_hash(&block.hash).unwrap(), Some(block));
        assert_eq!(ledger.get_by_hash(&BlockHash::ZERO).unwrap(), None);
    }

    #[test]
    fn test_get_by_hash_duplicate_is_inconsistent() {
        let (ledger, _) = ledger();
        let block = ledger.append(star(1), None).unwrap();
        ledger.write().blocks.push(block.clone());

        assert!(matches!(
            ledger.get_by_hash(&block.hash),
            Err(LedgerError::InternalConsistency(_))
        ));
        assert_eq!(ledger.get_by_hash(&BlockHash::ZERO).unwrap(), None);
    }

    fn owned_genesis_payload(ledger: &ChainLedger, owner: &Address) -> Block {
        let tip = ledger.tip();
        Block::seal(
            HashInput {
                height: tip.height + 1,
                owner: Some(owner.clone()),
                payload: BlockPayload::Genesis,
                timestamp: tip.timestamp,
                previous_hash: Some(tip.hash),
            },
            &Blake3Hasher,
        )
        .unwrap()
    }

    #[test]
    fn test_owned_genesis_payload_rejected() {
        let (ledger, clock) = ledger();
        let owner = Address::new("abc");

        let err = ledger.append(BlockPayload::Genesis, Some(owner.clone())).unwrap_err();
        assert_eq!(
            err.integrity_errors(),
            &[IntegrityError::MisplacedGenesis { height: 1 }]
        );
        assert_eq!(ledger.len(), 1);

        let mut blocks = ledger.snapshot();
        blocks.push(owned_genesis_payload(&ledger, &owner));
        let result = ChainLedger::restore(blocks, Arc::new(Blake3Hasher), clock);
        assert!(matches!(
            result,
            Err(LedgerError::ChainRejected(ref e))
                if e == &[IntegrityError::MisplacedGenesis { height: 1 }]
        ));
    }

    #[test]
    fn test_get_by_owner_never_skips_owned_blocks() {
        let (ledger, _) = ledger();
        let owner = Address::new("abc");
        ledger.append(star(1), Some(owner.clone())).unwrap();
        let block = owned_genesis_payload(&ledger, &owner);
        ledger.write().blocks.push(block);

        let result: Result<Vec<Value>> = ledger.get_by_owner(&owner);
        assert!(matches!(
            result,
            Err(LedgerError::Codec(CoreError::Decoding { height: 2, .. }))
        ));
    }

    /// Digests with Blake3 until `remaining` runs out, then panics once.
    struct FuseHasher {
        remaining: AtomicUsize,
    }

    impl Hasher for FuseHasher {
        fn digest(&self, data: &[u8]) -> BlockHash {
            if self.remaining.fetch_sub(1, Ordering::SeqCst) == 0 {
                panic!("hasher fuse blown");
            }
            Blake3Hasher.digest(data)
        }
    }

    #[test]
    fn test_panicking_validation_leaves_no_tentative_block() {
        let hasher = Arc::new(FuseHasher {
            remaining: AtomicUsize::new(usize::MAX),
        });
        let ledger =
            ChainLedger::new(hasher.clone(), Arc::new(ManualClock::new(1_000))).unwrap();

        // Seal and the genesis recheck succeed; the new block's recheck panics.
        hasher.remaining.store(2, Ordering::SeqCst);
        let result = catch_unwind(AssertUnwindSafe(|| ledger.append(star(1), None)));
        assert!(result.is_err());

        assert_eq!(ledger.len(), 1);
        assert!(ledger.validate().is_empty());
        assert_eq!(ledger.append(star(1), None).unwrap().height, 1);
    }

    #[test]
    fn test_get_by_owner_in_height_order() {
        let (ledger, _) = ledger();
        let alice = Address::new("alice");
        ledger.append(star(1), Some(alice.clone())).unwrap();
        ledger.append(star(2), Some(Address::new("bob"))).unwrap();
        ledger.append(star(3), Some(alice.clone())).unwrap();

        let stars: Vec<Value> = ledger.get_by_owner(&alice).unwrap();
        assert_eq!(stars, vec![json!({"star": 1}), json!({"star": 3})]);

        let none: Vec<Value> = ledger.get_by_owner(&Address::new("carol")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_get_by_owner_aborts_on_bad_block() {
        let (ledger, _) = ledger();
        let alice = Address::new("alice");
        ledger.append(star(1), Some(alice.clone())).unwrap();
        ledger.append(star(2), Some(alice.clone())).unwrap();
        ledger.corrupt(2, Corruption::OverwritePayload(b"{oops".to_vec()));

        let result: Result<Vec<Value>> = ledger.get_by_owner(&alice);
        assert!(matches!(
            result,
            Err(LedgerError::Codec(CoreError::Decoding { height: 2, .. }))
        ));
    }

    #[test]
    fn test_failed_append_rolls_back() {
        let (ledger, _) = ledger();
        let original = ledger.append(star(1), None).unwrap();
        ledger.append(star(2), None).unwrap();
        let before = ledger.snapshot();

        ledger.corrupt(1, Corruption::OverwritePayload(b"{}".to_vec()));
        let corrupted = ledger.snapshot();

        let err = ledger.append(star(3), None).unwrap_err();
        assert_eq!(
            err.integrity_errors(),
            &[IntegrityError::InvalidBlocks { heights: vec![1] }]
        );
        assert_eq!(ledger.snapshot(), corrupted);

        // Undo the corruption; the next append reuses the height.
        let bytes = original.payload.as_bytes().unwrap().to_vec();
        ledger.corrupt(1, Corruption::OverwritePayload(bytes));
        assert_eq!(ledger.snapshot(), before);

        let block = ledger.append(star(3), None).unwrap();
        assert_eq!(block.height, 3);
    }

    #[test]
    fn test_corruptions_detected() {
        let (ledger, _) = ledger();
        for n in 1..=4 {
            ledger.append(star(n), Some(Address::new("alice"))).unwrap();
        }

        let broken = ledger.corrupt(2, Corruption::BreakLink).unwrap();
        assert_eq!(broken.previous_hash, Some(BOGUS_LINK));
        ledger.corrupt(4, Corruption::ReassignOwner(Address::new("mallory")));

        let errors = ledger.validate();
        assert!(errors.contains(&IntegrityError::ChainBroken { height: 2 }));
        assert!(errors.contains(&IntegrityError::InvalidBlocks {
            heights: vec![2, 4]
        }));

        assert!(ledger.corrupt(5, Corruption::BreakLink).is_none());
    }

    #[test]
    fn test_snapshot_restore() {
        let (ledger, clock) = ledger();
        ledger.append(star(1), Some(Address::new("alice"))).unwrap();
        ledger.append(star(2), None).unwrap();

        let json = serde_json::to_string(&ledger.snapshot()).unwrap();
        let blocks: Vec<Block> = serde_json::from_str(&json).unwrap();
        let restored = ChainLedger::restore(blocks, Arc::new(Blake3Hasher), clock).unwrap();

        assert_eq!(restored.snapshot(), ledger.snapshot());
        assert!(restored.validate().is_empty());
        assert_eq!(restored.append(star(3), None).unwrap().height, 3);
    }

    #[test]
    fn test_restore_rejects_bad_snapshots() {
        let (ledger, clock) = ledger();
        ledger.append(star(1), None).unwrap();

        let result = ChainLedger::restore(vec![], Arc::new(Blake3Hasher), clock.clone());
        assert!(matches!(
            result,
            Err(LedgerError::ChainRejected(ref e)) if e == &[IntegrityError::MissingGenesis]
        ));

        let mut blocks = ledger.snapshot();
        blocks[1].owner = Some(Address::new("mallory"));
        let result = ChainLedger::restore(blocks, Arc::new(Blake3Hasher), clock);
        assert!(matches!(result, Err(LedgerError::ChainRejected(_))));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_any_payload_overwrite_detected(
                count in 1u64..12,
                target in any::<u64>(),
                bytes in prop::collection::vec(any::<u8>(), 0..32),
            ) {
                let (ledger, _) = ledger();
                for n in 1..=count {
                    ledger.append(star(n), None).unwrap();
                }

                let target = 1 + target % count;
                let original = ledger.get_by_height(target).unwrap();
                prop_assume!(original.payload.as_bytes() != Some(bytes.as_slice()));

                ledger.corrupt(target, Corruption::OverwritePayload(bytes));
                prop_assert_eq!(
                    ledger.validate(),
                    vec![IntegrityError::InvalidBlocks { heights: vec![target] }]
                );
            }
        }
    }
}
