//! Execution environment capabilities
//!
//! The engine never moves value itself; it asks the host environment to.
//! The [`Host`] trait captures what the engine needs from that
//! environment: a trusted clock and the two transfer primitives.
//! [`MemoryHost`] is a serializable in-memory ledger backing tests and
//! the CLI's ledger file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Failures reported by the underlying transfer mechanism
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u128, need: u128 },
    #[error("Unknown token: {0}")]
    UnknownToken(String),
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}

/// The execution environment as seen by the engine
pub trait Host {
    /// Trusted current time, observed at the moment an operation runs
    fn now(&self) -> DateTime<Utc>;

    /// Move native value out of the custodial account
    fn send_value(&mut self, to: &str, amount: u128, payload: &[u8])
        -> Result<(), TransferError>;

    /// Move tokens of the referenced contract out of the custodial account
    fn send_token(&mut self, token: &str, to: &str, amount: u128) -> Result<(), TransferError>;
}

/// In-memory ledger host
///
/// Tracks native and token balances per identity, debiting a single
/// custodial account on outgoing transfers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryHost {
    /// The custodial account all outgoing transfers debit
    account: String,
    /// Native balances by identity
    balances: HashMap<String, u128>,
    /// Token balances by token reference, then identity
    token_balances: HashMap<String, HashMap<String, u128>>,
}

impl MemoryHost {
    /// Create a ledger debiting the given custodial account
    pub fn new(account: &str) -> Self {
        Self {
            account: account.to_string(),
            balances: HashMap::new(),
            token_balances: HashMap::new(),
        }
    }

    /// The custodial account this ledger debits
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Credit native value to an identity
    pub fn credit(&mut self, to: &str, amount: u128) {
        *self.balances.entry(to.to_string()).or_insert(0) += amount;
    }

    /// Credit tokens to an identity, creating the token entry if needed
    pub fn credit_token(&mut self, token: &str, to: &str, amount: u128) {
        *self
            .token_balances
            .entry(token.to_string())
            .or_default()
            .entry(to.to_string())
            .or_insert(0) += amount;
    }

    /// Native balance of an identity
    pub fn balance(&self, identity: &str) -> u128 {
        self.balances.get(identity).copied().unwrap_or(0)
    }

    /// Token balance of an identity
    pub fn token_balance(&self, token: &str, identity: &str) -> u128 {
        self.token_balances
            .get(token)
            .and_then(|holders| holders.get(identity))
            .copied()
            .unwrap_or(0)
    }
}

impl Host for MemoryHost {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn send_value(
        &mut self,
        to: &str,
        amount: u128,
        _payload: &[u8],
    ) -> Result<(), TransferError> {
        let have = self.balance(&self.account);
        if have < amount {
            return Err(TransferError::InsufficientFunds { have, need: amount });
        }

        let account = self.account.clone();
        *self.balances.entry(account).or_insert(0) -= amount;
        self.credit(to, amount);
        Ok(())
    }

    fn send_token(&mut self, token: &str, to: &str, amount: u128) -> Result<(), TransferError> {
        if !self.token_balances.contains_key(token) {
            return Err(TransferError::UnknownToken(token.to_string()));
        }

        let have = self.token_balance(token, &self.account);
        if have < amount {
            return Err(TransferError::InsufficientFunds { have, need: amount });
        }

        let account = self.account.clone();
        let holders = self.token_balances.get_mut(token).unwrap();
        *holders.entry(account).or_insert(0) -= amount;
        *holders.entry(to.to_string()).or_insert(0) += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_transfer() {
        let mut host = MemoryHost::new("vault");
        host.credit("vault", 100);

        host.send_value("dest", 60, b"payload").unwrap();
        assert_eq!(host.balance("vault"), 40);
        assert_eq!(host.balance("dest"), 60);
    }

    #[test]
    fn test_insufficient_funds() {
        let mut host = MemoryHost::new("vault");
        host.credit("vault", 10);

        let result = host.send_value("dest", 60, &[]);
        assert_eq!(
            result,
            Err(TransferError::InsufficientFunds { have: 10, need: 60 })
        );
        // Balances untouched on failure
        assert_eq!(host.balance("vault"), 10);
        assert_eq!(host.balance("dest"), 0);
    }

    #[test]
    fn test_token_transfer() {
        let mut host = MemoryHost::new("vault");
        host.credit_token("GLD", "vault", 500);

        host.send_token("GLD", "dest", 200).unwrap();
        assert_eq!(host.token_balance("GLD", "vault"), 300);
        assert_eq!(host.token_balance("GLD", "dest"), 200);
    }

    #[test]
    fn test_unknown_token() {
        let mut host = MemoryHost::new("vault");
        let result = host.send_token("GLD", "dest", 1);
        assert_eq!(result, Err(TransferError::UnknownToken("GLD".to_string())));
    }
}
