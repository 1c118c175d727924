//! Safe-mode lockdown gate
//!
//! A one-way latch: once tripped, every destination must be a registered
//! signer, and the gate can never reopen. Repeated activation is
//! harmless.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signers::SignerRegistry;

/// Safe-mode rejection
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SafeModeError {
    #[error("Safe mode active: destination {0} is not a registered signer")]
    DestinationNotSigner(String),
}

/// Irreversible destination-lockdown latch
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafeModeGate {
    active: bool,
}

impl SafeModeGate {
    /// Create an inactive gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the latch. There is no way back.
    pub fn activate(&mut self) {
        if !self.active {
            log::warn!("Safe mode activated: destinations restricted to registered signers");
        }
        self.active = true;
    }

    /// Whether the latch has been tripped
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Validate a destination against the lockdown policy
    pub fn check_destination(
        &self,
        destination: &str,
        registry: &SignerRegistry,
    ) -> Result<(), SafeModeError> {
        if self.active && !registry.is_member(destination) {
            return Err(SafeModeError::DestinationNotSigner(destination.to_string()));
        }
        Ok(())
    }
}
