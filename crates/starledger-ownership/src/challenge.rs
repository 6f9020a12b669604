//! The challenge message a client signs to prove ownership.

use std::fmt;

use serde::{Deserialize, Serialize};
use starledger_core::Address;

use crate::error::{OwnershipError, Result};

/// Seconds a challenge stays valid after it is issued.
pub const FRESHNESS_WINDOW_SECS: i64 = 300;

/// Trailing tag of every challenge.
pub const DEFAULT_CHALLENGE_TAG: &str = "starRegistry";

const SEPARATOR: char = ':';

/// A challenge: `<address>:<timestamp>:<tag>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub address: Address,
    pub timestamp: i64,
    pub tag: String,
}

impl Challenge {
    /// Create a challenge, rejecting addresses that cannot be embedded.
    pub fn new(address: Address, timestamp: i64, tag: impl Into<String>) -> Result<Self> {
        if address.is_empty() {
            return Err(OwnershipError::InvalidAddress("address is empty".into()));
        }
        if address.as_str().contains(SEPARATOR) {
            return Err(OwnershipError::InvalidAddress(format!(
                "address contains '{SEPARATOR}': {address}"
            )));
        }

        Ok(Self {
            address,
            timestamp,
            tag: tag.into(),
        })
    }

    /// Parse a signed message back into its fields.
    pub fn parse(message: &str) -> Result<Self> {
        let fields: Vec<&str> = message.split(SEPARATOR).collect();
        let [address, timestamp, tag] = fields.as_slice() else {
            return Err(OwnershipError::MalformedChallenge(format!(
                "expected 3 fields, got {}",
                fields.len()
            )));
        };

        let timestamp = timestamp.parse::<i64>().map_err(|_| {
            OwnershipError::MalformedChallenge(format!("timestamp is not an integer: {timestamp}"))
        })?;

        Ok(Self {
            address: Address::new(*address),
            timestamp,
            tag: (*tag).to_string(),
        })
    }

    /// The exact text the client signs.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.address, self.timestamp, self.tag
        )
    }
}
