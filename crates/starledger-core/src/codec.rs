//! BlockCodec: structured payloads to and from stored block bytes.
//!
//! Payloads are stored as JSON bytes. The genesis block has no payload.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::block::{Block, BlockPayload};
use crate::error::{CoreError, Result};

/// Encodes payloads into [`BlockPayload`] and decodes them back.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockCodec;

impl BlockCodec {
    /// Serialize a payload into its stored representation.
    pub fn encode<T: Serialize + ?Sized>(payload: &T) -> Result<BlockPayload> {
        serde_json::to_vec(payload)
            .map(BlockPayload::Encoded)
            .map_err(|e| CoreError::Encoding(e.to_string()))
    }

    /// Decode a block's payload.
    ///
    /// Returns `Ok(None)` for the genesis sentinel.
    pub fn decode<T: DeserializeOwned>(block: &Block) -> Result<Option<T>> {
        match &block.payload {
            BlockPayload::Genesis => Ok(None),
            BlockPayload::Encoded(bytes) => serde_json::from_slice(bytes)
                .map(Some)
                .map_err(|e| CoreError::Decoding {
                    height: block.height,
                    reason: e.to_string(),
                }),
        }
    }
}
