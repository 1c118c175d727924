//! The custodial wallet aggregate
//!
//! Owns the signer registry, the safe-mode gate, and the sequence
//! window, and routes every mutation through the authorization engine.
//! The serialized form is exactly the durable state surface: signer
//! list, safe-mode flag, sequence window. The event history is
//! observability only and is not persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::host::Host;

use super::authorizer::{AuthError, SignerRecovery, TransactionAuthorizer};
use super::events::{Deposited, SafeModeActivated, Transacted, WalletEvent};
use super::executor;
use super::operation::Operation;
use super::safe_mode::SafeModeGate;
use super::sequence::SequenceWindow;
use super::signers::{RegistryError, SignerRegistry};

/// Wallet-level errors
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Construction error: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// A 2-of-3 custodial wallet
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wallet {
    signers: SignerRegistry,
    safe_mode: SafeModeGate,
    sequence: SequenceWindow,
    #[serde(skip)]
    events: Vec<WalletEvent>,
}

impl Wallet {
    /// Create a wallet with exactly three distinct signer identities
    pub fn new(signers: Vec<String>) -> Result<Self, WalletError> {
        let signers = SignerRegistry::new(signers)?;
        log::info!("Wallet created with signers {:?}", signers.members());
        Ok(Self {
            signers,
            safe_mode: SafeModeGate::new(),
            sequence: SequenceWindow::new(),
            events: Vec::new(),
        })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether an identity is one of the three registered signers
    pub fn is_signer(&self, identity: &str) -> bool {
        self.signers.is_member(identity)
    }

    /// The registered signer identities
    pub fn signers(&self) -> &[String] {
        self.signers.members()
    }

    /// The next sequence id guaranteed to be acceptable
    pub fn next_sequence_id(&self) -> u64 {
        self.sequence.next_available()
    }

    /// Whether the safe-mode latch has been tripped
    pub fn safe_mode_active(&self) -> bool {
        self.safe_mode.is_active()
    }

    /// Records emitted during this process lifetime
    pub fn events(&self) -> &[WalletEvent] {
        &self.events
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Submit a native value transfer approved by a second signer
    ///
    /// `signature` is the co-signer's 65-byte recoverable signature over
    /// the operation's canonical digest.
    #[allow(clippy::too_many_arguments)]
    pub fn submit_operation(
        &mut self,
        caller: &str,
        destination: &str,
        amount: u128,
        payload: Vec<u8>,
        expiry: DateTime<Utc>,
        sequence_id: u64,
        signature: Vec<u8>,
        host: &mut dyn Host,
        recovery: &dyn SignerRecovery,
    ) -> Result<Transacted, WalletError> {
        let operation =
            Operation::transfer(destination, amount, payload, expiry, sequence_id, signature);
        self.submit(caller, operation, host, recovery)
    }

    /// Submit a token transfer approved by a second signer
    #[allow(clippy::too_many_arguments)]
    pub fn submit_token_operation(
        &mut self,
        caller: &str,
        destination: &str,
        amount: u128,
        token: &str,
        expiry: DateTime<Utc>,
        sequence_id: u64,
        signature: Vec<u8>,
        host: &mut dyn Host,
        recovery: &dyn SignerRecovery,
    ) -> Result<Transacted, WalletError> {
        let operation =
            Operation::token(destination, amount, token, expiry, sequence_id, signature);
        self.submit(caller, operation, host, recovery)
    }

    /// Trip the safe-mode latch, restricting all future destinations to
    /// registered signers. Irrevocable.
    pub fn activate_safe_mode(
        &mut self,
        caller: &str,
    ) -> Result<SafeModeActivated, WalletError> {
        if !self.signers.is_member(caller) {
            return Err(AuthError::UnauthorizedCaller(caller.to_string()).into());
        }

        self.safe_mode.activate();
        let record = SafeModeActivated {
            caller: caller.to_string(),
            timestamp: Utc::now(),
        };
        self.events
            .push(WalletEvent::SafeModeActivated(record.clone()));
        Ok(record)
    }

    /// Record unsolicited incoming value. Zero-amount arrivals are
    /// ignored.
    pub fn observe_deposit(
        &mut self,
        sender: &str,
        amount: u128,
        data: Vec<u8>,
    ) -> Option<Deposited> {
        if amount == 0 {
            return None;
        }

        let record = Deposited {
            sender: sender.to_string(),
            amount,
            data,
            timestamp: Utc::now(),
        };
        log::info!("Deposit of {} from {}", record.amount, record.sender);
        self.events.push(WalletEvent::Deposited(record.clone()));
        Some(record)
    }

    /// Authorize and execute one operation as a single atomic unit
    ///
    /// Sequence acceptance completes before the host transfer is
    /// invoked; if the transfer then fails, the pre-authorization window
    /// is restored so the rejected operation leaves no trace.
    fn submit(
        &mut self,
        caller: &str,
        operation: Operation,
        host: &mut dyn Host,
        recovery: &dyn SignerRecovery,
    ) -> Result<Transacted, WalletError> {
        let digest = operation.digest();
        let window_before = self.sequence.clone();

        let now = host.now();
        let approver =
            TransactionAuthorizer::new(&self.signers, &self.safe_mode, &mut self.sequence, recovery)
                .authorize(caller, &operation, now)?;

        match executor::execute(host, &operation, caller, &approver, &digest) {
            Ok(record) => {
                self.events.push(WalletEvent::Transacted(record.clone()));
                Ok(record)
            }
            Err(err) => {
                self.sequence = window_before;
                Err(AuthError::TransferFailed(err).into())
            }
        }
    }
}
