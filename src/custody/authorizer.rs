//! Two-party operation authorization
//!
//! Validates that a proposed operation carries a second signer's
//! approval. Each check is a hard gate applied in a fixed order; the
//! first failure aborts the attempt. Identity recovery is injected
//! behind [`SignerRecovery`] so tests can substitute a deterministic
//! fake for the ECDSA machinery.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::crypto::{public_key_to_address, recover_signer, KeyError};
use crate::host::TransferError;

use super::operation::Operation;
use super::safe_mode::{SafeModeError, SafeModeGate};
use super::sequence::{SequenceError, SequenceWindow};
use super::signers::SignerRegistry;

/// Authorization and execution failures, one distinct kind per gate
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Unauthorized caller: {0}")]
    UnauthorizedCaller(String),
    #[error("Malformed signature: {0}")]
    MalformedSignature(#[from] KeyError),
    #[error(transparent)]
    SafeMode(#[from] SafeModeError),
    #[error("Operation expired at {expiry} (now {now})")]
    Expired {
        expiry: DateTime<Utc>,
        now: DateTime<Utc>,
    },
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("Approver not authorized: {0}")]
    UnauthorizedApprover(String),
    #[error("Self-approval not permitted: {0}")]
    SelfApproval(String),
    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}

/// Capability that recovers an approver identity from a signature over
/// a digest
pub trait SignerRecovery {
    fn recover(&self, digest: &[u8; 32], signature: &[u8]) -> Result<String, KeyError>;
}

/// Production recovery: secp256k1 public-key recovery, identity is the
/// derived address
pub struct EcdsaRecovery;

impl SignerRecovery for EcdsaRecovery {
    fn recover(&self, digest: &[u8; 32], signature: &[u8]) -> Result<String, KeyError> {
        let public_key = recover_signer(digest, signature)?;
        Ok(public_key_to_address(&public_key))
    }
}

/// Validates a two-party approval against the wallet's registry, gate,
/// and sequence window
pub struct TransactionAuthorizer<'a> {
    signers: &'a SignerRegistry,
    safe_mode: &'a SafeModeGate,
    sequence: &'a mut SequenceWindow,
    recovery: &'a dyn SignerRecovery,
}

impl<'a> TransactionAuthorizer<'a> {
    pub fn new(
        signers: &'a SignerRegistry,
        safe_mode: &'a SafeModeGate,
        sequence: &'a mut SequenceWindow,
        recovery: &'a dyn SignerRecovery,
    ) -> Self {
        Self {
            signers,
            safe_mode,
            sequence,
            recovery,
        }
    }

    /// Run every gate in order and return the validated approver identity
    ///
    /// On success the sequence window has accepted the operation's id;
    /// every failure leaves all state untouched.
    pub fn authorize(
        &mut self,
        caller: &str,
        operation: &Operation,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        if !self.signers.is_member(caller) {
            return Err(AuthError::UnauthorizedCaller(caller.to_string()));
        }

        let digest = operation.digest();
        let approver = self.recovery.recover(&digest, &operation.signature)?;

        self.safe_mode
            .check_destination(&operation.destination, self.signers)?;

        // Valid strictly until the expiry deadline
        if now >= operation.expiry {
            return Err(AuthError::Expired {
                expiry: operation.expiry,
                now,
            });
        }

        // The window mutates here; the two gates below must undo it on
        // failure so a rejected attempt leaves no partial effect.
        let window_before = self.sequence.clone();
        self.sequence.try_accept(operation.sequence_id)?;

        if !self.signers.is_member(&approver) {
            *self.sequence = window_before;
            return Err(AuthError::UnauthorizedApprover(approver));
        }
        if approver == caller {
            *self.sequence = window_before;
            return Err(AuthError::SelfApproval(approver));
        }

        log::debug!(
            "Operation authorized: caller {}, approver {}, sequence {}",
            caller,
            approver,
            operation.sequence_id
        );
        Ok(approver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// Deterministic recovery fake: maps whole signatures to identities,
    /// ignoring the digest
    struct FakeRecovery {
        identities: HashMap<Vec<u8>, String>,
    }

    impl FakeRecovery {
        fn new(pairs: &[(&[u8], &str)]) -> Self {
            Self {
                identities: pairs
                    .iter()
                    .map(|(sig, id)| (sig.to_vec(), id.to_string()))
                    .collect(),
            }
        }
    }

    impl SignerRecovery for FakeRecovery {
        fn recover(&self, _digest: &[u8; 32], signature: &[u8]) -> Result<String, KeyError> {
            if signature.len() != crate::crypto::APPROVAL_SIGNATURE_LEN {
                return Err(KeyError::BadSignatureLength(signature.len()));
            }
            self.identities
                .get(signature)
                .cloned()
                .ok_or(KeyError::RecoveryFailed)
        }
    }

    fn registry() -> SignerRegistry {
        SignerRegistry::new(vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ])
        .unwrap()
    }

    fn sig(byte: u8) -> Vec<u8> {
        vec![byte; crate::crypto::APPROVAL_SIGNATURE_LEN]
    }

    fn recovery() -> FakeRecovery {
        FakeRecovery::new(&[
            (&sig(1), "alice"),
            (&sig(2), "bob"),
            (&sig(3), "carol"),
            (&sig(9), "mallory"),
        ])
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn future() -> DateTime<Utc> {
        now() + chrono::Duration::hours(1)
    }

    fn op(signature: Vec<u8>) -> Operation {
        Operation::transfer("dest", 100, vec![], future(), 1, signature)
    }

    #[test]
    fn test_happy_path() {
        let registry = registry();
        let gate = SafeModeGate::new();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        let approver =
            TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
                .authorize("alice", &op(sig(2)), now())
                .unwrap();

        assert_eq!(approver, "bob");
        // Sequence id consumed
        assert_eq!(window.next_available(), 2);
    }

    #[test]
    fn test_unauthorized_caller() {
        let registry = registry();
        let gate = SafeModeGate::new();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("mallory", &op(sig(2)), now());

        assert!(matches!(result, Err(AuthError::UnauthorizedCaller(_))));
        assert_eq!(window.next_available(), 1);
    }

    #[test]
    fn test_malformed_signature() {
        let registry = registry();
        let gate = SafeModeGate::new();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        // Wrong length
        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(vec![2; 64]), now());
        assert!(matches!(result, Err(AuthError::MalformedSignature(_))));

        // Right length, unrecoverable
        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(sig(0)), now());
        assert!(matches!(result, Err(AuthError::MalformedSignature(_))));
        assert_eq!(window.next_available(), 1);
    }

    #[test]
    fn test_safe_mode_restriction() {
        let registry = registry();
        let mut gate = SafeModeGate::new();
        gate.activate();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(sig(2)), now());
        assert!(matches!(result, Err(AuthError::SafeMode(_))));
        // Sequence untouched by the earlier failure
        assert_eq!(window.next_available(), 1);

        // A signer destination is still allowed
        let to_signer = Operation::transfer("carol", 100, vec![], future(), 1, sig(2));
        let approver = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &to_signer, now())
            .unwrap();
        assert_eq!(approver, "bob");
    }

    #[test]
    fn test_expired() {
        let registry = registry();
        let gate = SafeModeGate::new();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        let expired = Operation::transfer("dest", 100, vec![], now(), 1, sig(2));
        // now == expiry is already too late
        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &expired, now());
        assert!(matches!(result, Err(AuthError::Expired { .. })));

        let long_gone = Operation::transfer(
            "dest",
            100,
            vec![],
            now() - chrono::Duration::days(1),
            1,
            sig(2),
        );
        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &long_gone, now());
        assert!(matches!(result, Err(AuthError::Expired { .. })));
        assert_eq!(window.next_available(), 1);
    }

    #[test]
    fn test_sequence_rejections_propagate() {
        let registry = registry();
        let gate = SafeModeGate::new();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(sig(2)), now())
            .unwrap();

        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(sig(2)), now());
        assert!(matches!(
            result,
            Err(AuthError::Sequence(SequenceError::Replayed(1)))
        ));

        let too_high = Operation::transfer("dest", 100, vec![], future(), 20_000, sig(2));
        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &too_high, now());
        assert!(matches!(
            result,
            Err(AuthError::Sequence(SequenceError::TooHigh { .. }))
        ));
    }

    #[test]
    fn test_unauthorized_approver() {
        let registry = registry();
        let gate = SafeModeGate::new();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(sig(9)), now());
        assert!(matches!(result, Err(AuthError::UnauthorizedApprover(_))));
        // The rejected attempt must not consume the sequence id
        assert_eq!(window.next_available(), 1);
        TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(sig(2)), now())
            .unwrap();
    }

    #[test]
    fn test_self_approval() {
        let registry = registry();
        let gate = SafeModeGate::new();
        let mut window = SequenceWindow::new();
        let recovery = recovery();

        let result = TransactionAuthorizer::new(&registry, &gate, &mut window, &recovery)
            .authorize("alice", &op(sig(1)), now());
        assert!(matches!(result, Err(AuthError::SelfApproval(_))));
        assert_eq!(window.next_available(), 1);
    }
}
