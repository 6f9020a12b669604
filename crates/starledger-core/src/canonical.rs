//! Canonical CBOR encoding of the block hash input.
//!
//! The hash input is a CBOR map with integer keys, encoded with RFC 8949
//! Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats
//!
//! The field set is fixed: `height`, `owner`, `payload`, `timestamp` and
//! `previous_hash`. The block's own `hash` is never part of it. `owner` is
//! included so that reassigning a block invalidates its hash.
//!
//! **This encoding is frozen.** Changing it changes every block hash.

use ciborium::value::{Integer, Value};

use crate::block::{BlockPayload, GENESIS_SENTINEL};
use crate::error::{CoreError, Result};
use crate::types::{Address, BlockHash};

/// Hash input field keys (integer keys for compact encoding).
mod keys {
    pub const HEIGHT: u64 = 0;
    pub const OWNER: u64 = 1;
    pub const PAYLOAD: u64 = 2;
    pub const TIMESTAMP: u64 = 3;
    pub const PREVIOUS_HASH: u64 = 4;
}

/// The fields of a block that participate in its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashInput {
    pub height: u64,
    pub owner: Option<Address>,
    pub payload: BlockPayload,
    pub timestamp: i64,
    pub previous_hash: Option<BlockHash>,
}

/// Encode the hash input to canonical CBOR bytes.
pub fn canonical_hash_input(input: &HashInput) -> Result<Vec<u8>> {
    let value = hash_input_to_cbor_value(input);
    let mut buf = Vec::new();
    encode_value_to(&mut buf, &value)?;
    Ok(buf)
}

/// Decode canonical bytes back into a hash input.
///
/// Rejects input that parses but is not in canonical form.
pub fn decode_hash_input(bytes: &[u8]) -> Result<HashInput> {
    let value: Value =
        ciborium::from_reader(bytes).map_err(|e| CoreError::Canonical(e.to_string()))?;
    let input = cbor_value_to_hash_input(&value)?;

    if canonical_hash_input(&input)? != bytes {
        return Err(CoreError::Canonical("input is not canonically encoded".into()));
    }

    Ok(input)
}

fn hash_input_to_cbor_value(input: &HashInput) -> Value {
    let owner = match &input.owner {
        Some(address) => Value::Text(address.as_str().to_string()),
        None => Value::Null,
    };

    // Genesis and encoded payloads use different major types so they can
    // never collide.
    let payload = match &input.payload {
        BlockPayload::Genesis => Value::Text(GENESIS_SENTINEL.to_string()),
        BlockPayload::Encoded(bytes) => Value::Bytes(bytes.clone()),
    };

    let previous_hash = match &input.previous_hash {
        Some(hash) => Value::Bytes(hash.0.to_vec()),
        None => Value::Null,
    };

    Value::Map(vec![
        (Value::Integer(keys::HEIGHT.into()), Value::Integer(input.height.into())),
        (Value::Integer(keys::OWNER.into()), owner),
        (Value::Integer(keys::PAYLOAD.into()), payload),
        (Value::Integer(keys::TIMESTAMP.into()), Value::Integer(input.timestamp.into())),
        (Value::Integer(keys::PREVIOUS_HASH.into()), previous_hash),
    ])
}

fn cbor_value_to_hash_input(value: &Value) -> Result<HashInput> {
    let map = match value {
        Value::Map(m) => m,
        _ => return Err(CoreError::Canonical("expected map".into())),
    };

    if map.len() != 5 {
        return Err(CoreError::Canonical(format!(
            "expected 5 fields, got {}",
            map.len()
        )));
    }

    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
            .map(|(_, v)| v)
    };

    let height = match get(keys::HEIGHT) {
        Some(Value::Integer(i)) => u64::try_from(*i)
            .map_err(|_| CoreError::Canonical("height out of range".into()))?,
        _ => return Err(CoreError::Canonical("missing height".into())),
    };

    let owner = match get(keys::OWNER) {
        Some(Value::Text(s)) => Some(Address::new(s.clone())),
        Some(Value::Null) => None,
        _ => return Err(CoreError::Canonical("invalid owner".into())),
    };

    let payload = match get(keys::PAYLOAD) {
        Some(Value::Text(s)) if s == GENESIS_SENTINEL => BlockPayload::Genesis,
        Some(Value::Bytes(b)) => BlockPayload::Encoded(b.clone()),
        _ => return Err(CoreError::Canonical("invalid payload".into())),
    };

    let timestamp = match get(keys::TIMESTAMP) {
        Some(Value::Integer(i)) => i64::try_from(*i)
            .map_err(|_| CoreError::Canonical("timestamp out of range".into()))?,
        _ => return Err(CoreError::Canonical("missing timestamp".into())),
    };

    let previous_hash = match get(keys::PREVIOUS_HASH) {
        Some(Value::Bytes(b)) if b.len() == 32 => {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(b);
            Some(BlockHash(arr))
        }
        Some(Value::Null) => None,
        _ => return Err(CoreError::Canonical("invalid previous_hash".into())),
    };

    Ok(HashInput {
        height,
        owner,
        payload,
        timestamp,
        previous_hash,
    })
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Map(entries) => encode_map_canonical(buf, entries)?,
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::Canonical(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => return Err(CoreError::Canonical("unsupported CBOR value type".into())),
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) {
    let n = i128::from(i);

    if n >= 0 {
        encode_uint(buf, 0, n as u64);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        encode_uint(buf, 1, (-1 - n) as u64);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<()> {
    let mut pairs = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_buf = Vec::new();
        encode_value_to(&mut key_buf, k)?;
        pairs.push((key_buf, v));
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uint(buf, 5, pairs.len() as u64);
    for (key_bytes, value) in pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value)?;
    }
    Ok(())
}
