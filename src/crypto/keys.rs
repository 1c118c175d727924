//! ECDSA key management for co-signer identities
//!
//! Provides key pair generation, recoverable signing, and public key
//! recovery using the secp256k1 elliptic curve. Approval signatures are
//! 65 bytes: the 64-byte compact signature followed by a recovery id
//! byte, so the approver's identity can be recovered from the signature
//! alone.

use rand::rngs::OsRng;
use ripemd::Ripemd160;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::Digest;
use thiserror::Error;

use super::hash::{double_sha256, sha256};

/// Length of an approval signature: 64-byte compact r||s plus one
/// recovery id byte.
pub const APPROVAL_SIGNATURE_LEN: usize = 65;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Malformed signature: expected {APPROVAL_SIGNATURE_LEN} bytes, got {0}")]
    BadSignatureLength(usize),
    #[error("Invalid recovery id: {0}")]
    InvalidRecoveryId(u8),
    #[error("Signature recovery failed")]
    RecoveryFailed,
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, public_key) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the private key as a hex string
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    /// Derive the signer identity (address) from the public key
    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }

    /// Produce a 65-byte recoverable approval signature over a digest
    pub fn sign_recoverable(&self, digest: &[u8; 32]) -> [u8; APPROVAL_SIGNATURE_LEN] {
        sign_recoverable(&self.secret_key, digest)
    }
}

/// Convert a public key to a signer address
/// Base58Check(version || RIPEMD160(SHA256(pubkey)))
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    let sha256_hash = sha256(&public_key.serialize());

    let mut ripemd = Ripemd160::new();
    ripemd.update(&sha256_hash);
    let ripemd_hash = ripemd.finalize();

    // Version byte 0x00, then 4-byte double-SHA256 checksum
    let mut address_bytes = vec![0x00];
    address_bytes.extend_from_slice(&ripemd_hash);

    let checksum = double_sha256(&address_bytes);
    address_bytes.extend_from_slice(&checksum[..4]);

    bs58::encode(address_bytes).into_string()
}

/// Parse a public key from hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Sign a 32-byte digest, producing a 65-byte recoverable signature
pub fn sign_recoverable(
    secret_key: &SecretKey,
    digest: &[u8; 32],
) -> [u8; APPROVAL_SIGNATURE_LEN] {
    let secp = Secp256k1::new();
    let message = Message::from_digest(*digest);
    let signature = secp.sign_ecdsa_recoverable(&message, secret_key);

    let (recovery_id, compact) = signature.serialize_compact();
    let mut bytes = [0u8; APPROVAL_SIGNATURE_LEN];
    bytes[..64].copy_from_slice(&compact);
    bytes[64] = recovery_id.to_i32() as u8;
    bytes
}

/// Recover the signing public key from a 65-byte signature over a digest
///
/// The trailing recovery id byte may be raw (0..=3) or carry the legacy
/// 27/28 offset.
pub fn recover_signer(digest: &[u8; 32], signature: &[u8]) -> Result<PublicKey, KeyError> {
    if signature.len() != APPROVAL_SIGNATURE_LEN {
        return Err(KeyError::BadSignatureLength(signature.len()));
    }

    let recovery_byte = match signature[64] {
        v @ 27..=30 => v - 27,
        v => v,
    };
    let recovery_id = RecoveryId::from_i32(i32::from(recovery_byte))
        .map_err(|_| KeyError::InvalidRecoveryId(signature[64]))?;

    let recoverable = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|_| KeyError::RecoveryFailed)?;

    let secp = Secp256k1::new();
    let message = Message::from_digest(*digest);
    secp.recover_ecdsa(&message, &recoverable)
        .map_err(|_| KeyError::RecoveryFailed)
}
