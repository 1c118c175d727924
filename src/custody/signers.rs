//! Registered co-signer set
//!
//! The signer set is fixed at wallet creation: exactly three distinct
//! identities, with membership lookup as the only query. There are no
//! mutation operations after construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of registered signer identities
pub const SIGNER_COUNT: usize = 3;

/// Errors raised at registry construction
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Expected exactly {SIGNER_COUNT} signers, got {0}")]
    WrongSignerCount(usize),
    #[error("Duplicate signer identity: {0}")]
    DuplicateSigner(String),
}

/// Immutable set of the three authorized signer identities
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignerRegistry {
    signers: Vec<String>,
}

impl SignerRegistry {
    /// Create a registry from exactly three distinct identities
    pub fn new(signers: Vec<String>) -> Result<Self, RegistryError> {
        if signers.len() != SIGNER_COUNT {
            return Err(RegistryError::WrongSignerCount(signers.len()));
        }

        for i in 1..signers.len() {
            if signers[..i].contains(&signers[i]) {
                return Err(RegistryError::DuplicateSigner(signers[i].clone()));
            }
        }

        Ok(Self { signers })
    }

    /// Check whether an identity is a registered signer
    pub fn is_member(&self, identity: &str) -> bool {
        self.signers.iter().any(|s| s == identity)
    }

    /// The registered identities, in construction order
    pub fn members(&self) -> &[String] {
        &self.signers
    }
}
