//! The seven transaction kinds.
//!
//! Each kind exposes `check` (pure validation against a read view) and
//! `deliver` (re-validation plus effects against the working state).
//! Deliver re-runs the full check because the state may have moved
//! between mempool admission and block execution. Both return
//! `Err(StateCorruption)` when a stored record fails to decode; the
//! host halts on that, it is never a transaction failure.

pub mod claim_hashed_transfer;
pub mod deposit;
pub mod deposit_approval;
pub mod hashed_transfer;
pub mod register;
pub mod transfer;
pub mod withdraw;

pub use claim_hashed_transfer::ClaimHashedTransferTx;
pub use deposit::DepositTx;
pub use deposit_approval::DepositApprovalTx;
pub use hashed_transfer::HashedTransferTx;
pub use register::RegisterTx;
pub use transfer::{TransferOutput, TransferTx, MAX_REMARK_LEN};
pub use withdraw::WithdrawTx;

use shared_types::{Address, Identifier, Identity};
use thiserror::Error;
use tracing::error;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::{advance_nonce, has_address, identifier_to_identity, next_nonce_of};

use crate::domain::result::TxResult;
use crate::domain::signature::SignatureError;

/// A malformed record under a consensus-critical key. It cannot be
/// mapped to a transaction failure without risking divergence between
/// replicas, so it surfaces as an error the hosting process converts
/// into a halt of this replica.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("State corruption: {0}")]
pub struct StateCorruption(pub String);

pub(crate) fn corruption(e: impl std::fmt::Display) -> StateCorruption {
    error!("[xl-06] Unrecoverable state corruption: {e}");
    StateCorruption(e.to_string())
}

/// Lift a storage-layer result whose only failure mode is corruption.
pub(crate) fn fatal<T, E: std::fmt::Display>(res: Result<T, E>) -> Result<T, StateCorruption> {
    res.map_err(corruption)
}

/// Failure of the preconditions every signed, nonced transaction
/// shares. None of these consume the sender's nonce: the chain has not
/// established that the sender authorized this exact transaction, or
/// the nonce itself is the problem.
pub(crate) enum GateFailure {
    SenderNotRegistered,
    InvalidSignature,
    InvalidNonce,
    Duplicated,
}

/// Why validation stopped: an ordinary rejection that becomes the
/// transaction's result, or corruption that must abort the node.
/// `Rejected` carries the sender when the gate already identified one,
/// so deliver can burn the nonce where the rejection consumes it.
pub(crate) enum CheckFailure {
    Rejected(TxResult, Option<Identity>),
    Corrupt(StateCorruption),
}

impl From<StateCorruption> for CheckFailure {
    fn from(e: StateCorruption) -> CheckFailure {
        CheckFailure::Corrupt(e)
    }
}

impl CheckFailure {
    /// Result of a validate-only pass.
    pub(crate) fn into_result(self) -> Result<TxResult, StateCorruption> {
        match self {
            CheckFailure::Rejected(res, _) => Ok(res),
            CheckFailure::Corrupt(e) => Err(e),
        }
    }

    /// Result of a failed delivery: burn the offender's nonce when the
    /// rejection consumes one, then report the rejection.
    pub(crate) fn settle(self, state: &mut impl WriteState) -> Result<TxResult, StateCorruption> {
        match self {
            CheckFailure::Rejected(res, offender) => {
                if res.advances_nonce {
                    if let Some(id) = offender {
                        fatal(advance_nonce(state, &id))?;
                    }
                }
                Ok(res)
            }
            CheckFailure::Corrupt(e) => Err(e),
        }
    }
}

/// Resolve the sender, verify the recovered signer is an address bound
/// to it, and match the nonce against the account's next nonce.
/// `reject` maps a gate failure to the transaction kind's result code.
pub(crate) fn authenticate(
    state: &impl ReadState,
    sender: &Identifier,
    signer: Result<Address, SignatureError>,
    nonce: u64,
    reject: impl Fn(GateFailure) -> TxResult,
) -> Result<Identity, CheckFailure> {
    let gate = |g| CheckFailure::Rejected(reject(g), None);
    let id = match identifier_to_identity(state, sender) {
        Some(id) => id,
        None => return Err(gate(GateFailure::SenderNotRegistered)),
    };
    let addr = signer.map_err(|_| gate(GateFailure::InvalidSignature))?;
    if !has_address(state, &id, &addr) {
        return Err(gate(GateFailure::InvalidSignature));
    }
    let next = fatal(next_nonce_of(state, &id))?;
    if nonce > next {
        return Err(gate(GateFailure::InvalidNonce));
    }
    if nonce < next {
        return Err(gate(GateFailure::Duplicated));
    }
    Ok(id)
}
