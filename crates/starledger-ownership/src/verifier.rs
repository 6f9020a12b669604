//! OwnershipVerifier: issues challenges and checks signed responses.

use std::sync::Arc;

use starledger_core::{Address, Clock, SignatureVerifier};

use crate::challenge::{Challenge, DEFAULT_CHALLENGE_TAG, FRESHNESS_WINDOW_SECS};
use crate::error::{OwnershipError, Result};
use crate::record::StarRecord;

/// Configuration for ownership verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipConfig {
    /// A challenge older than this many seconds is expired.
    pub freshness_window_secs: i64,
    /// Tag expected as the last challenge field.
    pub challenge_tag: String,
}

impl Default for OwnershipConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: FRESHNESS_WINDOW_SECS,
            challenge_tag: DEFAULT_CHALLENGE_TAG.to_string(),
        }
    }
}

/// Issues challenges and verifies ownership proofs.
pub struct OwnershipVerifier {
    verifier: Arc<dyn SignatureVerifier>,
    clock: Arc<dyn Clock>,
    config: OwnershipConfig,
}

impl OwnershipVerifier {
    /// Create a verifier.
    pub fn new(
        verifier: Arc<dyn SignatureVerifier>,
        clock: Arc<dyn Clock>,
        config: OwnershipConfig,
    ) -> Self {
        Self {
            verifier,
            clock,
            config,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &OwnershipConfig {
        &self.config
    }

    /// Issue a challenge for `address`, stamped with the current time.
    pub fn request_challenge(&self, address: &Address) -> Result<Challenge> {
        let challenge = Challenge::new(
            address.clone(),
            self.clock.now(),
            self.config.challenge_tag.as_str(),
        )?;
        tracing::debug!(%address, timestamp = challenge.timestamp, "issued challenge");
        Ok(challenge)
    }

    /// Verify a signed challenge and build the record to store.
    ///
    /// Checks, in order: the message parses and names `address` with the
    /// configured tag, the challenge is inside the freshness window, and the
    /// signature verifies. A timestamp a full window or more in the future
    /// is malformed; smaller clock skew is accepted.
    pub fn verify_and_build_payload(
        &self,
        address: &Address,
        message: &str,
        signature: &str,
        star: serde_json::Value,
    ) -> Result<StarRecord> {
        let challenge = Challenge::parse(message).map_err(|e| {
            tracing::debug!(%address, error = %e, "rejected challenge");
            e
        })?;

        if challenge.tag != self.config.challenge_tag {
            tracing::debug!(%address, tag = %challenge.tag, "rejected challenge tag");
            return Err(OwnershipError::MalformedChallenge(format!(
                "unexpected tag: {}",
                challenge.tag
            )));
        }
        if challenge.address != *address {
            tracing::debug!(
                %address,
                signed_for = %challenge.address,
                "rejected challenge address"
            );
            return Err(OwnershipError::MalformedChallenge(format!(
                "challenge was issued for {}",
                challenge.address
            )));
        }

        let window = self.config.freshness_window_secs;
        let elapsed = match self.clock.now().checked_sub(challenge.timestamp) {
            Some(elapsed) if elapsed > window.saturating_neg() => elapsed,
            _ => {
                tracing::debug!(
                    %address,
                    timestamp = challenge.timestamp,
                    "rejected out-of-range challenge timestamp"
                );
                return Err(OwnershipError::MalformedChallenge(format!(
                    "timestamp out of range: {}",
                    challenge.timestamp
                )));
            }
        };
        if elapsed >= window {
            tracing::debug!(%address, elapsed, "rejected expired challenge");
            return Err(OwnershipError::ExpiredRequest { elapsed });
        }
        if elapsed < 0 {
            tracing::warn!(%address, elapsed, "challenge timestamp is in the future");
        }

        if let Err(e) = self.verifier.verify(message, address, signature) {
            tracing::debug!(%address, error = %e, "rejected signature");
            return Err(OwnershipError::SignatureMismatch);
        }

        Ok(StarRecord {
            owner: address.clone(),
            star,
        })
    }
}

impl std::fmt::Debug for OwnershipVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipVerifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use starledger_core::{CoreError, Ed25519Verifier, Keypair, ManualClock};

    const T: i64 = 1_532_296_090;

    /// Accepts `"sig(<message>)"` as the signature of any address.
    struct StubVerifier;

    impl SignatureVerifier for StubVerifier {
        fn verify(
            &self,
            message: &str,
            _address: &Address,
            signature: &str,
        ) -> starledger_core::Result<()> {
            if signature == format!("sig({message})") {
                Ok(())
            } else {
                Err(CoreError::InvalidSignature)
            }
        }
    }

    fn stub() -> (OwnershipVerifier, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T));
        let verifier = OwnershipVerifier::new(
            Arc::new(StubVerifier),
            clock.clone(),
            OwnershipConfig::default(),
        );
        (verifier, clock)
    }

    #[test]
    fn test_request_challenge() {
        let (verifier, _) = stub();
        let challenge = verifier
            .request_challenge(&Address::new("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"))
            .unwrap();
        assert_eq!(
            challenge.message(),
            format!("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa:{T}:starRegistry")
        );
    }

    #[test]
    fn test_freshness_window() {
        let (verifier, clock) = stub();
        let address = Address::new("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
        let message = verifier.request_challenge(&address).unwrap().message();
        let signature = format!("sig({message})");

        clock.set(T + 10);
        let record = verifier
            .verify_and_build_payload(&address, &message, &signature, json!({"story": "a"}))
            .unwrap();
        assert_eq!(record.owner, address);
        assert_eq!(record.star, json!({"story": "a"}));

        clock.set(T + 299);
        assert!(verifier
            .verify_and_build_payload(&address, &message, &signature, json!({}))
            .is_ok());

        clock.set(T + 300);
        assert!(matches!(
            verifier.verify_and_build_payload(&address, &message, &signature, json!({})),
            Err(OwnershipError::ExpiredRequest { elapsed: 300 })
        ));

        clock.set(T + 310);
        assert!(matches!(
            verifier.verify_and_build_payload(&address, &message, &signature, json!({})),
            Err(OwnershipError::ExpiredRequest { elapsed: 310 })
        ));
    }

    #[test]
    fn test_expiry_checked_before_signature() {
        let (verifier, clock) = stub();
        let address = Address::new("abc");
        let message = verifier.request_challenge(&address).unwrap().message();

        clock.set(T + 1_000);
        assert!(matches!(
            verifier.verify_and_build_payload(&address, &message, "garbage", json!({})),
            Err(OwnershipError::ExpiredRequest { .. })
        ));
    }

    #[test]
    fn test_future_challenge_accepted() {
        let (verifier, _) = stub();
        let address = Address::new("abc");
        let message = format!("abc:{}:starRegistry", T + 60);
        let signature = format!("sig({message})");

        assert!(verifier
            .verify_and_build_payload(&address, &message, &signature, json!({}))
            .is_ok());
    }

    #[test]
    fn test_extreme_timestamps_rejected() {
        let (verifier, _) = stub();
        let address = Address::new("abc");

        for timestamp in [i64::MIN, i64::MIN + 1, i64::MAX, T + 300, T + 86_400] {
            let message = format!("abc:{timestamp}:starRegistry");
            let signature = format!("sig({message})");
            assert!(
                matches!(
                    verifier.verify_and_build_payload(&address, &message, &signature, json!({})),
                    Err(OwnershipError::MalformedChallenge(_))
                ),
                "accepted timestamp {timestamp}"
            );
        }

        let message = format!("abc:{}:starRegistry", T + 299);
        let signature = format!("sig({message})");
        assert!(verifier
            .verify_and_build_payload(&address, &message, &signature, json!({}))
            .is_ok());
    }

    #[test]
    fn test_signature_mismatch() {
        let (verifier, _) = stub();
        let address = Address::new("abc");
        let message = verifier.request_challenge(&address).unwrap().message();

        assert!(matches!(
            verifier.verify_and_build_payload(&address, &message, "sig(other)", json!({})),
            Err(OwnershipError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_malformed_challenges() {
        let (verifier, _) = stub();
        let address = Address::new("abc");

        for message in [
            "abc".to_string(),
            format!("abc:{T}"),
            "abc:yesterday:starRegistry".to_string(),
            format!("abc:{T}:otherRegistry"),
            format!("xyz:{T}:starRegistry"),
        ] {
            let signature = format!("sig({message})");
            assert!(
                matches!(
                    verifier.verify_and_build_payload(&address, &message, &signature, json!({})),
                    Err(OwnershipError::MalformedChallenge(_))
                ),
                "accepted {message:?}"
            );
        }
    }

    #[test]
    fn test_custom_config() {
        let clock = Arc::new(ManualClock::new(T));
        let verifier = OwnershipVerifier::new(
            Arc::new(StubVerifier),
            clock.clone(),
            OwnershipConfig {
                freshness_window_secs: 30,
                challenge_tag: "moonRegistry".into(),
            },
        );
        let address = Address::new("abc");
        let message = verifier.request_challenge(&address).unwrap().message();
        assert!(message.ends_with(":moonRegistry"));

        clock.advance(30);
        assert!(matches!(
            verifier.verify_and_build_payload(
                &address,
                &message,
                &format!("sig({message})"),
                json!({})
            ),
            Err(OwnershipError::ExpiredRequest { elapsed: 30 })
        ));
    }

    #[test]
    fn test_ed25519_roundtrip() {
        let clock = Arc::new(ManualClock::new(T));
        let verifier = OwnershipVerifier::new(
            Arc::new(Ed25519Verifier),
            clock.clone(),
            OwnershipConfig::default(),
        );
        let alice = Keypair::from_seed(&[0x01; 32]);
        let bob = Keypair::from_seed(&[0x02; 32]);

        let message = verifier.request_challenge(&alice.address()).unwrap().message();
        clock.advance(10);

        let address = alice.address();
        assert!(verifier
            .verify_and_build_payload(&address, &message, &alice.sign(&message), json!({}))
            .is_ok());
        assert!(matches!(
            verifier.verify_and_build_payload(&address, &message, &bob.sign(&message), json!({})),
            Err(OwnershipError::SignatureMismatch)
        ));
    }
}
