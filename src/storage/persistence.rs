//! Wallet persistence layer
//!
//! Saves and restores the durable wallet state (signer list, safe-mode
//! flag, sequence window) and the CLI's ledger file. Writes go to a
//! temporary file first and are renamed into place; the previous wallet
//! file is rotated into a bounded set of backups.

use crate::custody::Wallet;
use crate::host::MemoryHost;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub wallet_file: String,
    pub ledger_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".custody_data"),
            wallet_file: "wallet.json".to_string(),
            ledger_file: "ledger.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Wallet and ledger storage manager
pub struct WalletStore {
    config: StorageConfig,
}

impl WalletStore {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    fn wallet_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.wallet_file)
    }

    fn ledger_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.ledger_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.wallet_file, index))
    }

    /// Save the wallet state to disk
    pub fn save_wallet(&self, wallet: &Wallet) -> Result<(), StorageError> {
        let path = self.wallet_path();

        if self.config.backup_enabled && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        write_json(&self.config.data_dir, &path, wallet)
    }

    /// Load the wallet state from disk
    pub fn load_wallet(&self) -> Result<Wallet, StorageError> {
        let path = self.wallet_path();
        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Wallet file not found".to_string(),
            ));
        }
        read_json(&path)
    }

    /// Check if a saved wallet exists
    pub fn wallet_exists(&self) -> bool {
        self.wallet_path().exists()
    }

    /// Save the ledger to disk
    pub fn save_ledger(&self, ledger: &MemoryHost) -> Result<(), StorageError> {
        write_json(&self.config.data_dir, &self.ledger_path(), ledger)
    }

    /// Load the ledger from disk
    pub fn load_ledger(&self) -> Result<MemoryHost, StorageError> {
        let path = self.ledger_path();
        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Ledger file not found".to_string(),
            ));
        }
        read_json(&path)
    }

    /// Delete all saved state
    pub fn delete(&self) -> Result<(), StorageError> {
        for path in [self.wallet_path(), self.ledger_path()] {
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    /// Rotate backup files
    fn rotate_backups(&self) -> Result<(), StorageError> {
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// List available wallet backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|&i| self.backup_path(i).exists())
            .collect()
    }
}

/// Write a value as JSON via a temp file and atomic rename
fn write_json<T: serde::Serialize>(
    data_dir: &Path,
    path: &Path,
    value: &T,
) -> Result<(), StorageError> {
    let temp_path = data_dir.join(".write.tmp");
    let file = fs::File::create(&temp_path)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
