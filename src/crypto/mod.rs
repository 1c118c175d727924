//! Cryptographic utilities for the custody engine
//!
//! This module provides:
//! - SHA-256 hashing
//! - ECDSA key management with recoverable signatures (secp256k1)
//! - Signer address derivation

pub mod hash;
pub mod keys;

pub use hash::{double_sha256, sha256, sha256_hex};
pub use keys::{
    public_key_from_hex, public_key_to_address, recover_signer, sign_recoverable, KeyError,
    KeyPair, APPROVAL_SIGNATURE_LEN,
};
