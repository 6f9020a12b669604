//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical hash input bytes and the digests both
//! bundled hashers produce over them. A change here breaks every stored
//! ledger.

use starledger_core::{
    canonical_hash_input, Address, Blake3Hasher, BlockHash, BlockPayload, HashInput, Hasher,
    Sha256Hasher,
};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub height: u64,
    pub owner: Option<&'static str>,
    /// Encoded payload bytes, or `None` for genesis.
    pub payload: Option<&'static [u8]>,
    pub timestamp: i64,
    pub previous_hash: Option<[u8; 32]>,
    /// Expected canonical bytes (hex).
    pub expected_cbor: &'static str,
    /// Expected Blake3 digest (hex).
    pub expected_blake3: &'static str,
    /// Expected SHA-256 digest (hex).
    pub expected_sha256: &'static str,
}

impl GoldenVector {
    /// The hash input this vector describes.
    pub fn hash_input(&self) -> HashInput {
        HashInput {
            height: self.height,
            owner: self.owner.map(Address::new),
            payload: match self.payload {
                Some(bytes) => BlockPayload::Encoded(bytes.to_vec()),
                None => BlockPayload::Genesis,
            },
            timestamp: self.timestamp,
            previous_hash: self.previous_hash.map(BlockHash::from_bytes),
        }
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis at epoch",
            height: 0,
            owner: None,
            payload: None,
            timestamp: 0,
            previous_hash: None,
            expected_cbor: "a5000001f6027828466972737420426c6f636b20696e2074686520636861696e202d2047656e6573697320426c6f636b030004f6",
            expected_blake3: "f5f52321af7c487e43ff9892bf9876f63487f7f160a2e9bf591a89b2c5b1edd4",
            expected_sha256: "131a161bbb48324fd37d85b07b37c915e9537f3096ed4fffbde21c5345f469d2",
        },
        GoldenVector {
            name: "genesis at 2025-01-14",
            height: 0,
            owner: None,
            payload: None,
            timestamp: 1_736_870_400,
            previous_hash: None,
            expected_cbor: "a5000001f6027828466972737420426c6f636b20696e2074686520636861696e202d2047656e6573697320426c6f636b031a67868a0004f6",
            expected_blake3: "354ca400f8327f324a0bbcfbbb9eceddee932a08c6a6899b6078c01e97473ad2",
            expected_sha256: "8ae168d5207d0fe154235feb694137438bcab8c24661e73ab84f4aae67d06976",
        },
        GoldenVector {
            name: "owned star block",
            height: 1,
            owner: Some("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"),
            payload: Some(br#"{"story":"Found star"}"#),
            timestamp: 1_736_870_410,
            previous_hash: Some([0xaa; 32]),
            expected_cbor: "a500010178223141317a5031655035514765666932444d505466544c35534c6d7637446976664e6102567b2273746f7279223a22466f756e642073746172227d031a67868a0a045820aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            expected_blake3: "29fc5a5146c7ebf8681e346def7b7de53038f13b13562051ce382f30a67bbc69",
            expected_sha256: "7403704932f0a79f87e47eceafc319ef27dc82511dbeed329c8efe544ea41455",
        },
        GoldenVector {
            name: "empty payload with negative timestamp",
            height: 2,
            owner: Some("abc"),
            payload: Some(b""),
            timestamp: -1,
            previous_hash: Some([0x00; 32]),
            expected_cbor: "a500020163616263024003200458200000000000000000000000000000000000000000000000000000000000000000",
            expected_blake3: "c037b5716e279d1e5108c7548c4226c16843c5123d6245300f506b16660589ca",
            expected_sha256: "7c29089dc111f00e164ddb5a22b26556fb1c41fc53dc8b3729c694134ffeef45",
        },
    ]
}

/// Check every vector against the current encoder and hashers.
///
/// Returns `(name, matches)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| {
            let matches = match canonical_hash_input(&v.hash_input()) {
                Ok(bytes) => {
                    hex::encode(&bytes) == v.expected_cbor
                        && Blake3Hasher.digest(&bytes).to_hex() == v.expected_blake3
                        && Sha256Hasher.digest(&bytes).to_hex() == v.expected_sha256
                }
                Err(_) => false,
            };
            (v.name.to_string(), matches)
        })
        .collect()
}
