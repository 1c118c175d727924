//! Operation descriptors and canonical digests
//!
//! An operation describes one proposed outgoing transfer. It is never
//! persisted; it exists only for the duration of a single authorization
//! attempt. The digest over its signed fields is what the approving
//! co-signer signs: a one-byte domain tag separates native transfers
//! from token transfers, and variable-length fields are length-prefixed
//! so field boundaries are unambiguous.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::sha256;

/// Domain tag for a native value transfer
const TRANSFER_TAG: u8 = 0x01;
/// Domain tag for a token transfer
const TOKEN_TAG: u8 = 0x02;

/// What an operation moves: native value with an attached payload, or
/// tokens of a referenced contract
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum OperationDetail {
    Transfer { payload: Vec<u8> },
    Token { token: String },
}

/// A proposed outgoing transfer awaiting authorization
#[derive(Clone, Debug)]
pub struct Operation {
    /// Destination identity
    pub destination: String,
    /// Value amount
    pub amount: u128,
    /// Payload or token reference
    pub detail: OperationDetail,
    /// Deadline after which the operation is no longer valid
    pub expiry: DateTime<Utc>,
    /// Caller-chosen anti-replay sequence id
    pub sequence_id: u64,
    /// The second signer's 65-byte approval signature over the digest
    pub signature: Vec<u8>,
}

impl Operation {
    /// Describe a native value transfer
    pub fn transfer(
        destination: &str,
        amount: u128,
        payload: Vec<u8>,
        expiry: DateTime<Utc>,
        sequence_id: u64,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            destination: destination.to_string(),
            amount,
            detail: OperationDetail::Transfer { payload },
            expiry,
            sequence_id,
            signature,
        }
    }

    /// Describe a token transfer
    pub fn token(
        destination: &str,
        amount: u128,
        token: &str,
        expiry: DateTime<Utc>,
        sequence_id: u64,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            destination: destination.to_string(),
            amount,
            detail: OperationDetail::Token {
                token: token.to_string(),
            },
            expiry,
            sequence_id,
            signature,
        }
    }

    /// Canonical digest binding every signed field of the operation
    ///
    /// This is the message the approving co-signer must sign. The
    /// signature itself is not part of the digest.
    pub fn digest(&self) -> [u8; 32] {
        let (tag, data): (u8, &[u8]) = match &self.detail {
            OperationDetail::Transfer { payload } => (TRANSFER_TAG, payload),
            OperationDetail::Token { token } => (TOKEN_TAG, token.as_bytes()),
        };

        let mut buf = Vec::with_capacity(
            1 + 4 + self.destination.len() + 16 + 4 + data.len() + 8 + 8,
        );
        buf.push(tag);
        buf.extend_from_slice(&(self.destination.len() as u32).to_be_bytes());
        buf.extend_from_slice(self.destination.as_bytes());
        buf.extend_from_slice(&self.amount.to_be_bytes());
        buf.extend_from_slice(&(data.len() as u32).to_be_bytes());
        buf.extend_from_slice(data);
        buf.extend_from_slice(&self.expiry.timestamp().to_be_bytes());
        buf.extend_from_slice(&self.sequence_id.to_be_bytes());

        let mut out = [0u8; 32];
        out.copy_from_slice(&sha256(&buf));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = Operation::transfer("dest", 100, vec![1, 2, 3], expiry(), 1, vec![]);
        let b = Operation::transfer("dest", 100, vec![1, 2, 3], expiry(), 1, vec![]);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_digest_ignores_signature() {
        let a = Operation::transfer("dest", 100, vec![], expiry(), 1, vec![]);
        let b = Operation::transfer("dest", 100, vec![], expiry(), 1, vec![0u8; 65]);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn test_domain_separation() {
        // Same fields, different kind: a signature over one must not
        // validate the other
        let native = Operation::transfer("dest", 100, b"tok".to_vec(), expiry(), 1, vec![]);
        let token = Operation::token("dest", 100, "tok", expiry(), 1, vec![]);
        assert_ne!(native.digest(), token.digest());
    }

    #[test]
    fn test_every_field_is_bound() {
        let base = Operation::transfer("dest", 100, vec![1], expiry(), 1, vec![]);

        let other = Operation::transfer("dest2", 100, vec![1], expiry(), 1, vec![]);
        assert_ne!(base.digest(), other.digest());

        let other = Operation::transfer("dest", 101, vec![1], expiry(), 1, vec![]);
        assert_ne!(base.digest(), other.digest());

        let other = Operation::transfer("dest", 100, vec![2], expiry(), 1, vec![]);
        assert_ne!(base.digest(), other.digest());

        let other = Operation::transfer(
            "dest",
            100,
            vec![1],
            expiry() + chrono::Duration::seconds(1),
            1,
            vec![],
        );
        assert_ne!(base.digest(), other.digest());

        let other = Operation::transfer("dest", 100, vec![1], expiry(), 2, vec![]);
        assert_ne!(base.digest(), other.digest());
    }

    #[test]
    fn test_length_prefix_prevents_field_sliding() {
        // "ab" + "c" must not collide with "a" + "bc"
        let a = Operation::transfer("ab", 0, b"c".to_vec(), expiry(), 1, vec![]);
        let b = Operation::transfer("a", 0, b"bc".to_vec(), expiry(), 1, vec![]);
        assert_ne!(a.digest(), b.digest());
    }
}
