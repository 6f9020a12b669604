//! Cryptographic capabilities for the Star Ledger.
//!
//! The ledger never calls a hash function or a signature scheme directly.
//! It depends on the [`Hasher`] and [`SignatureVerifier`] traits; this module
//! provides the default Blake3 and SHA-256 hashers and an Ed25519 verifier.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{CoreError, Result};
use crate::types::{Address, BlockHash};

/// A collision-resistant digest over canonical block bytes.
pub trait Hasher: Send + Sync {
    /// Digest the given bytes.
    fn digest(&self, data: &[u8]) -> BlockHash;
}

/// Verifies that `signature` over `message` was produced by `address`.
pub trait SignatureVerifier: Send + Sync {
    /// Returns `Ok(())` only if the signature is valid for the address.
    fn verify(&self, message: &str, address: &Address, signature: &str) -> Result<()>;
}

/// Blake3 hasher (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl Hasher for Blake3Hasher {
    fn digest(&self, data: &[u8]) -> BlockHash {
        BlockHash(*blake3::hash(data).as_bytes())
    }
}

/// SHA-256 hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn digest(&self, data: &[u8]) -> BlockHash {
        let mut hasher = Sha256::new();
        hasher.update(data);
        BlockHash(hasher.finalize().into())
    }
}

/// Ed25519 signature verifier.
///
/// Addresses are the lowercase hex of the 32-byte public key; signatures are
/// the hex of the 64-byte signature over the UTF-8 message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, address: &Address, signature: &str) -> Result<()> {
        let key_bytes: [u8; 32] = hex::decode(address.as_str())
            .map_err(|_| CoreError::InvalidPublicKey)?
            .try_into()
            .map_err(|_| CoreError::InvalidPublicKey)?;
        let verifying_key =
            VerifyingKey::from_bytes(&key_bytes).map_err(|_| CoreError::InvalidPublicKey)?;

        let sig_bytes: [u8; 64] = hex::decode(signature)
            .map_err(|_| CoreError::InvalidSignature)?
            .try_into()
            .map_err(|_| CoreError::InvalidSignature)?;
        let sig = Signature::from_bytes(&sig_bytes);

        verifying_key
            .verify(message.as_bytes(), &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

/// An Ed25519 keypair whose address is accepted by [`Ed25519Verifier`].
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The address (hex public key) of this keypair.
    pub fn address(&self) -> Address {
        Address::new(hex::encode(self.signing_key.verifying_key().to_bytes()))
    }

    /// Sign a message, returning the hex-encoded signature.
    pub fn sign(&self, message: &str) -> String {
        hex::encode(self.signing_key.sign(message.as_bytes()).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.address())
    }
}
