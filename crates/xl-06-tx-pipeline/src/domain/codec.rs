//! Wire envelope for transactions.
//!
//! A transaction travels as a 4-byte little-endian length prefix
//! followed by the binary-encoded payload. The prefix must match the
//! remaining byte count exactly; trailing bytes are a decode error, not
//! padding. The transaction hash commits to the full envelope.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::TxHash;
use thiserror::Error;
use xl_01_state_tree::{ReadState, WriteState};

use crate::domain::result::TxResult;
use crate::domain::txs::{
    ClaimHashedTransferTx, DepositApprovalTx, DepositTx, HashedTransferTx, RegisterTx,
    StateCorruption, TransferTx, WithdrawTx,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Transaction envelope too short: {0} bytes")]
    TooShort(usize),

    #[error("Envelope declares {declared} payload bytes but carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Malformed transaction payload: {0}")]
    Malformed(String),
}

/// Union of the seven transaction kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Transaction {
    Register(RegisterTx),
    Transfer(TransferTx),
    Withdraw(WithdrawTx),
    Deposit(DepositTx),
    DepositApproval(DepositApprovalTx),
    HashedTransfer(HashedTransferTx),
    ClaimHashedTransfer(ClaimHashedTransferTx),
}

pub fn encode_tx(tx: &Transaction) -> Result<Vec<u8>, CodecError> {
    let payload = bincode::serialize(tx).map_err(|e| CodecError::Malformed(e.to_string()))?;
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decode_tx(raw: &[u8]) -> Result<Transaction, CodecError> {
    if raw.len() < 4 {
        return Err(CodecError::TooShort(raw.len()));
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&raw[..4]);
    let declared = u32::from_le_bytes(len_bytes) as usize;
    let payload = &raw[4..];
    if declared != payload.len() {
        return Err(CodecError::LengthMismatch {
            declared,
            actual: payload.len(),
        });
    }
    bincode::deserialize(payload).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Digest identifying a transaction: the hash of its full wire bytes.
pub fn tx_hash(raw: &[u8]) -> TxHash {
    Sha256::digest(raw).into()
}

impl Transaction {
    /// Validate against a read-only view, without effects. An error is
    /// state corruption, not a rejection.
    pub fn check(&self, state: &impl ReadState) -> Result<TxResult, StateCorruption> {
        match self {
            Transaction::Register(tx) => tx.check(state),
            Transaction::Transfer(tx) => tx.check(state),
            Transaction::Withdraw(tx) => tx.check(state),
            Transaction::Deposit(tx) => tx.check(state),
            Transaction::DepositApproval(tx) => tx.check(state),
            Transaction::HashedTransfer(tx) => tx.check(state),
            Transaction::ClaimHashedTransfer(tx) => tx.check(state),
        }
    }

    /// Re-validate against the working state and apply effects. An
    /// error is state corruption; the host must halt, not continue.
    pub fn deliver(
        &self,
        state: &mut impl WriteState,
        tx_hash: &TxHash,
    ) -> Result<TxResult, StateCorruption> {
        match self {
            Transaction::Register(tx) => tx.deliver(state),
            Transaction::Transfer(tx) => tx.deliver(state),
            Transaction::Withdraw(tx) => tx.deliver(state, tx_hash),
            Transaction::Deposit(tx) => tx.deliver(state, tx_hash),
            Transaction::DepositApproval(tx) => tx.deliver(state),
            Transaction::HashedTransfer(tx) => tx.deliver(state, tx_hash),
            Transaction::ClaimHashedTransfer(tx) => tx.deliver(state),
        }
    }
}
