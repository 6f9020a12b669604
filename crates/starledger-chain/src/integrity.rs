//! Full-chain integrity checking.

use serde::Serialize;
use starledger_core::{Block, Hasher};
use thiserror::Error;

/// One problem found while validating the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IntegrityError {
    /// A block's `previous_hash` does not match its predecessor's `hash`.
    #[error("chain broken at height {height}")]
    ChainBroken { height: u64 },

    /// Recomputed hashes differ from the stored ones.
    #[error("one or more blocks are invalid (heights: {})", render_heights(.heights))]
    InvalidBlocks { heights: Vec<u64> },

    /// A block's stored height differs from its position.
    #[error("height mismatch at position {position}: block claims {stored}")]
    HeightMismatch { position: u64, stored: u64 },

    /// The chain does not start with a genesis block.
    #[error("missing genesis block")]
    MissingGenesis,

    /// A block after the first carries the genesis payload.
    #[error("genesis payload at height {height}")]
    MisplacedGenesis { height: u64 },
}

fn render_heights(heights: &[u64]) -> String {
    heights
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a block sequence.
///
/// Every check runs over the whole sequence; findings accumulate instead of
/// stopping at the first one. An empty result means the chain is intact.
///
/// This performs:
/// - Genesis check on the first block, and on no other
/// - Height check against each block's position
/// - Link check of each `previous_hash` against its predecessor's stored `hash`
/// - Hash recomputation for every block (reported once, listing all heights)
pub fn validate(blocks: &[Block], hasher: &dyn Hasher) -> Vec<IntegrityError> {
    let mut errors = Vec::new();

    // 1. Genesis
    match blocks.first() {
        None => return vec![IntegrityError::MissingGenesis],
        Some(first) if !first.payload.is_genesis() => errors.push(IntegrityError::MissingGenesis),
        Some(_) => {}
    }

    for (position, block) in blocks.iter().enumerate() {
        let position = position as u64;

        // 2. Height
        if block.height != position {
            errors.push(IntegrityError::HeightMismatch {
                position,
                stored: block.height,
            });
        }

        if position > 0 && block.payload.is_genesis() {
            errors.push(IntegrityError::MisplacedGenesis { height: position });
        }

        // 3. Link
        let expected = match position {
            0 => None,
            _ => Some(blocks[position as usize - 1].hash),
        };
        if block.previous_hash != expected {
            errors.push(IntegrityError::ChainBroken { height: position });
        }
    }

    // 4. Hashes
    let invalid: Vec<u64> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| !block.is_intact(hasher))
        .map(|(position, _)| position as u64)
        .collect();
    if !invalid.is_empty() {
        errors.push(IntegrityError::InvalidBlocks { heights: invalid });
    }

    errors
}
