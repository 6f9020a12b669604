//! StarRecord: the payload stored for an accepted registration.

use serde::{Deserialize, Serialize};
use starledger_core::{Address, BlockCodec, BlockPayload, Result};

/// A star registered to an owner.
///
/// The star itself is free-form JSON supplied by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    /// The address that proved ownership.
    pub owner: Address,

    /// The star description.
    pub star: serde_json::Value,
}

impl StarRecord {
    /// Encode for storage in a block.
    pub fn to_payload(&self) -> Result<BlockPayload> {
        BlockCodec::encode(self)
    }
}
