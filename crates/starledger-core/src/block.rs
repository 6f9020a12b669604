//! Block: one hash-linked entry of the ledger.
//!
//! A block's `hash` covers its canonical hash input (see [`crate::canonical`]).
//! Height and `previous_hash` are assigned by the ledger at append time.

use serde::{Deserialize, Serialize};

use crate::canonical::{canonical_hash_input, HashInput};
use crate::crypto::Hasher;
use crate::error::Result;
use crate::types::{Address, BlockHash};

/// The fixed payload carried by the genesis block.
pub const GENESIS_SENTINEL: &str = "First Block in the chain - Genesis Block";

/// What a block carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum BlockPayload {
    /// The genesis sentinel. Has no decodable payload.
    Genesis,
    /// Opaque bytes produced by [`crate::BlockCodec::encode`].
    Encoded(#[serde(with = "hex")] Vec<u8>),
}

impl BlockPayload {
    /// Check if this is the genesis sentinel.
    pub fn is_genesis(&self) -> bool {
        matches!(self, BlockPayload::Genesis)
    }

    /// The encoded bytes, if any.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            BlockPayload::Genesis => None,
            BlockPayload::Encoded(bytes) => Some(bytes),
        }
    }
}

/// A block of the ledger.
///
/// Serializes to the JSON shape rendered to clients and used in snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Zero-based position in the ledger.
    pub height: u64,

    /// Hash of the block at `height - 1` (None only for genesis).
    pub previous_hash: Option<BlockHash>,

    /// Digest of the canonical hash input.
    pub hash: BlockHash,

    /// The address that proved ownership (None for genesis).
    pub owner: Option<Address>,

    /// The stored payload.
    #[serde(rename = "body")]
    pub payload: BlockPayload,

    /// Seconds since the Unix epoch at append time.
    #[serde(rename = "time")]
    pub timestamp: i64,
}

impl Block {
    /// Build the height-0 block.
    pub fn genesis(timestamp: i64, hasher: &dyn Hasher) -> Result<Self> {
        Self::seal(
            HashInput {
                height: 0,
                owner: None,
                payload: BlockPayload::Genesis,
                timestamp,
                previous_hash: None,
            },
            hasher,
        )
    }

    /// Hash the given fields and assemble the block.
    pub fn seal(input: HashInput, hasher: &dyn Hasher) -> Result<Self> {
        let hash = hasher.digest(&canonical_hash_input(&input)?);
        let HashInput {
            height,
            owner,
            payload,
            timestamp,
            previous_hash,
        } = input;

        Ok(Self {
            height,
            previous_hash,
            hash,
            owner,
            payload,
            timestamp,
        })
    }

    /// The fields that participate in the hash.
    pub fn hash_input(&self) -> HashInput {
        HashInput {
            height: self.height,
            owner: self.owner.clone(),
            payload: self.payload.clone(),
            timestamp: self.timestamp,
            previous_hash: self.previous_hash,
        }
    }

    /// Recompute the hash from the stored fields.
    pub fn compute_hash(&self, hasher: &dyn Hasher) -> Result<BlockHash> {
        Ok(hasher.digest(&canonical_hash_input(&self.hash_input())?))
    }

    /// Check that the stored hash matches the stored fields.
    pub fn is_intact(&self, hasher: &dyn Hasher) -> bool {
        matches!(self.compute_hash(hasher), Ok(hash) if hash == self.hash)
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0 && self.payload.is_genesis()
    }
}
