//! Deposit proposal transaction.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Hash, Identifier, Identity, TxHash};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::advance_nonce;
use xl_03_deposit::{check_deposit, process_deposit, DepositError, Proposal};

use crate::domain::result::TxResult;
use crate::domain::signature::{personal_message_hash, recover_address, TxSignature};
use crate::domain::txs::{
    authenticate, corruption, fatal, CheckFailure, GateFailure, StateCorruption,
};

/// An approver's claim that the proposal's inputs arrived on the
/// external chain in the given block. Executes once enough approver
/// weight accumulates on identical content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositTx {
    pub from: Identifier,
    pub proposal: Proposal,
    pub nonce: u64,
    pub sig: TxSignature,
}

impl DepositTx {
    pub fn signing_digest(&self) -> Hash {
        let mut proposal = self.proposal.clone();
        proposal.sort();
        let inputs: Vec<_> = proposal
            .inputs
            .iter()
            .map(|input| {
                json!({
                    "from_addr": input.from_addr.to_string(),
                    "value": input.value.to_string(),
                })
            })
            .collect();
        let payload = json!({
            "block_number": proposal.block_number,
            "identity": self.from.to_string(),
            "inputs": inputs,
            "nonce": self.nonce,
        });
        personal_message_hash(payload.to_string().as_bytes())
    }

    fn gate_failure(gate: GateFailure) -> TxResult {
        match gate {
            GateFailure::SenderNotRegistered => TxResult::deposit_sender_not_registered(),
            GateFailure::InvalidSignature => TxResult::deposit_invalid_signature(),
            GateFailure::InvalidNonce => TxResult::deposit_invalid_nonce(),
            GateFailure::Duplicated => TxResult::deposit_duplicated(),
        }
    }

    fn deposit_failure(err: DepositError, sender: Identity) -> CheckFailure {
        let res = match err {
            DepositError::AlreadyExecuted(_) => TxResult::deposit_already_executed(),
            DepositError::NotApprover => TxResult::deposit_not_approver(),
            DepositError::DoubleApproval => TxResult::deposit_double_approval(),
            DepositError::InvalidProposal | DepositError::ProposalNotExist => {
                TxResult::deposit_invalid_format()
            }
            other => return CheckFailure::Corrupt(corruption(other)),
        };
        CheckFailure::Rejected(res, Some(sender))
    }

    fn check_inner(&self, state: &impl ReadState) -> Result<Identity, CheckFailure> {
        if !self.proposal.validate() {
            return Err(CheckFailure::Rejected(TxResult::deposit_invalid_format(), None));
        }
        let signer = recover_address(&self.signing_digest(), &self.sig);
        let sender = authenticate(state, &self.from, signer, self.nonce, Self::gate_failure)?;

        let mut proposal = self.proposal.clone();
        check_deposit(state, &mut proposal, &sender)
            .map_err(|e| Self::deposit_failure(e, sender))?;
        Ok(sender)
    }

    pub fn check(&self, state: &impl ReadState) -> Result<TxResult, StateCorruption> {
        match self.check_inner(state) {
            Ok(_) => Ok(TxResult::success()),
            Err(failure) => failure.into_result(),
        }
    }

    pub fn deliver(
        &self,
        state: &mut impl WriteState,
        tx_hash: &TxHash,
    ) -> Result<TxResult, StateCorruption> {
        let sender = match self.check_inner(state) {
            Ok(id) => id,
            Err(failure) => return failure.settle(state),
        };
        fatal(advance_nonce(state, &sender))?;

        let mut proposal = self.proposal.clone();
        let executed = fatal(process_deposit(state, &mut proposal, &sender, tx_hash))?;
        debug!(
            "[xl-06] Deposit proposal for block number {} by {}, executed: {}",
            proposal.block_number, sender, executed
        );
        Ok(if executed {
            TxResult::success()
        } else {
            TxResult::success().pending()
        })
    }
}
