//! Custody Wallet: a 2-of-3 custodial authorization engine in Rust
//!
//! This crate implements a multi-party authorization engine for moving
//! value out of a shared account:
//! - Every outgoing transfer needs approval from two distinct
//!   registered co-signers (a fixed set of three identities)
//! - Approvals are 65-byte recoverable ECDSA signatures (secp256k1)
//!   over a canonical, domain-separated operation digest
//! - A fixed 10-slot sequence window with min-eviction prevents replay
//!   of previously approved instructions
//! - An irrevocable safe mode restricts destinations to co-signers
//! - Failed operations leave no observable state behind
//!
//! # Example
//!
//! ```rust
//! use custody_wallet::crypto::KeyPair;
//! use custody_wallet::custody::{EcdsaRecovery, Operation, Wallet};
//! use custody_wallet::host::MemoryHost;
//! use chrono::{Duration, Utc};
//!
//! let keys: Vec<KeyPair> = (0..3).map(|_| KeyPair::generate()).collect();
//! let mut wallet = Wallet::new(keys.iter().map(|k| k.address()).collect()).unwrap();
//!
//! let mut host = MemoryHost::new("vault");
//! host.credit("vault", 1_000);
//!
//! // The co-signer approves offline by signing the operation digest
//! let expiry = Utc::now() + Duration::hours(1);
//! let sequence_id = wallet.next_sequence_id();
//! let unsigned = Operation::transfer("destination", 250, vec![], expiry, sequence_id, vec![]);
//! let approval = keys[1].sign_recoverable(&unsigned.digest()).to_vec();
//!
//! // The caller submits with the approval attached
//! let record = wallet
//!     .submit_operation(
//!         &keys[0].address(),
//!         "destination",
//!         250,
//!         vec![],
//!         expiry,
//!         sequence_id,
//!         approval,
//!         &mut host,
//!         &EcdsaRecovery,
//!     )
//!     .unwrap();
//! assert_eq!(record.approver, keys[1].address());
//! ```

pub mod cli;
pub mod crypto;
pub mod custody;
pub mod host;
pub mod storage;

// Re-export commonly used types
pub use crypto::{KeyPair, APPROVAL_SIGNATURE_LEN};
pub use custody::{
    AuthError, Deposited, EcdsaRecovery, Operation, OperationDetail, SafeModeActivated,
    SequenceError, SignerRecovery, Transacted, Wallet, WalletError, WalletEvent,
};
pub use host::{Host, MemoryHost, TransferError};
pub use storage::{StorageConfig, WalletStore};
