//! Observable wallet records
//!
//! Every state-changing entry point emits one of these records. They are
//! kept in an in-memory history for observability and returned to the
//! caller; they are not part of the durable wallet state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::operation::OperationDetail;

/// Emitted when an authorized transfer completes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transacted {
    /// The registered signer who submitted the operation
    pub caller: String,
    /// The second signer recovered from the approval signature
    pub approver: String,
    /// Hex-encoded canonical operation digest
    pub digest: String,
    pub destination: String,
    pub amount: u128,
    /// Payload or token reference of the executed operation
    pub detail: OperationDetail,
    pub timestamp: DateTime<Utc>,
}

/// Emitted when unsolicited value arrives
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deposited {
    pub sender: String,
    pub amount: u128,
    pub data: Vec<u8>,
    pub timestamp: DateTime<Utc>,
}

/// Emitted when the safe-mode latch trips
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SafeModeActivated {
    pub caller: String,
    pub timestamp: DateTime<Utc>,
}

/// Any record the wallet can emit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum WalletEvent {
    Transacted(Transacted),
    Deposited(Deposited),
    SafeModeActivated(SafeModeActivated),
}
