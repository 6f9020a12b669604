//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};

use starledger_core::{Address, BlockHash, BlockPayload, HashInput, Keypair};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a base58-looking address, as used by wallet-style schemes.
pub fn address() -> impl Strategy<Value = Address> {
    "1[1-9A-HJ-NP-Za-km-z]{25,33}".prop_map(Address::new)
}

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a reasonable timestamp in seconds.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800
}

/// Generate a celestial coordinate string.
fn coordinate() -> impl Strategy<Value = String> {
    (0u32..360, 0u32..60, 0u32..600)
        .prop_map(|(d, m, s)| format!("{d}° {m}' {}.{}", s / 10, s % 10))
}

/// Generate a star description.
pub fn star() -> impl Strategy<Value = Value> {
    (
        coordinate(),
        coordinate(),
        "[ -~]{0,250}",
        proptest::option::of("[A-Za-z]{1,12}"),
    )
        .prop_map(|(dec, ra, story, magnitude)| {
            let mut star = json!({ "dec": dec, "ra": ra, "story": story });
            if let Some(magnitude) = magnitude {
                star["mag"] = json!(magnitude);
            }
            star
        })
}

/// Generate a block payload.
pub fn payload() -> impl Strategy<Value = BlockPayload> {
    prop_oneof![
        1 => Just(BlockPayload::Genesis),
        9 => prop::collection::vec(any::<u8>(), 0..=512).prop_map(BlockPayload::Encoded),
    ]
}

/// Generate a hash input.
pub fn hash_input() -> impl Strategy<Value = HashInput> {
    (
        0u64..=1_000_000,
        proptest::option::of(address()),
        payload(),
        timestamp(),
        proptest::option::of(block_hash()),
    )
        .prop_map(|(height, owner, payload, timestamp, previous_hash)| HashInput {
            height,
            owner,
            payload,
            timestamp,
            previous_hash,
        })
}
