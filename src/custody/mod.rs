//! 2-of-3 custodial authorization engine
//!
//! Every outgoing transfer needs approval from two distinct registered
//! co-signers: the caller submits the operation, and a second signer's
//! recoverable signature over its canonical digest rides along. The
//! engine validates the approval against the signer registry, the
//! safe-mode gate, the anti-replay sequence window, and the expiry
//! deadline, then executes through the host environment.
//!
//! # Example
//!
//! ```ignore
//! use custody_wallet::custody::{EcdsaRecovery, Wallet};
//!
//! let mut wallet = Wallet::new(vec![alice, bob, carol])?;
//!
//! // Bob approves offline by signing the operation digest;
//! // Alice submits with Bob's signature attached.
//! let record = wallet.submit_operation(
//!     &alice, &destination, amount, payload, expiry,
//!     sequence_id, bobs_signature, &mut host, &EcdsaRecovery,
//! )?;
//! ```

pub mod authorizer;
pub mod events;
pub mod executor;
pub mod operation;
pub mod safe_mode;
pub mod sequence;
pub mod signers;
pub mod wallet;

pub use authorizer::{AuthError, EcdsaRecovery, SignerRecovery, TransactionAuthorizer};
pub use events::{Deposited, SafeModeActivated, Transacted, WalletEvent};
pub use operation::{Operation, OperationDetail};
pub use safe_mode::{SafeModeError, SafeModeGate};
pub use sequence::{SequenceError, SequenceWindow, MAX_SEQUENCE_GAP, WINDOW_SIZE};
pub use signers::{RegistryError, SignerRegistry, SIGNER_COUNT};
pub use wallet::{Wallet, WalletError};
