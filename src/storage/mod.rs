//! Storage module for wallet and ledger persistence

pub mod persistence;

pub use persistence::{StorageConfig, StorageError, WalletStore};
