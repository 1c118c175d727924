//! Transfer execution
//!
//! Performs the value movement for an operation that has already passed
//! authorization, and builds the observable record. Execution is handed
//! to the host environment; a host failure surfaces as a typed error and
//! the wallet rolls the sequence window back.

use crate::host::{Host, TransferError};

use super::events::Transacted;
use super::operation::{Operation, OperationDetail};

/// Carry out an authorized operation through the host and emit its record
pub fn execute(
    host: &mut dyn Host,
    operation: &Operation,
    caller: &str,
    approver: &str,
    digest: &[u8; 32],
) -> Result<Transacted, TransferError> {
    match &operation.detail {
        OperationDetail::Transfer { payload } => {
            host.send_value(&operation.destination, operation.amount, payload)?;
        }
        OperationDetail::Token { token } => {
            host.send_token(token, &operation.destination, operation.amount)?;
        }
    }

    let record = Transacted {
        caller: caller.to_string(),
        approver: approver.to_string(),
        digest: hex::encode(digest),
        destination: operation.destination.clone(),
        amount: operation.amount,
        detail: operation.detail.clone(),
        timestamp: host.now(),
    };

    log::info!(
        "Transferred {} to {} (caller {}, approver {})",
        record.amount,
        record.destination,
        record.caller,
        record.approver
    );

    Ok(record)
}
