//! Withdrawal to the external chain.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Address, Amount, Hash, Identifier, Identity, TxHash};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::{advance_nonce, balance_of, sub_balance};
use xl_05_withdraw::{add_receipt, PackedWithdraw};

use crate::domain::result::TxResult;
use crate::domain::signature::{personal_message_hash, recover_address, TxSignature};
use crate::domain::txs::{authenticate, fatal, CheckFailure, GateFailure, StateCorruption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawTx {
    pub from: Identifier,
    pub to_addr: Address,
    pub value: Amount,
    pub fee: Amount,
    pub nonce: u64,
    pub sig: TxSignature,
}

impl WithdrawTx {
    pub fn signing_digest(&self) -> Hash {
        let payload = json!({
            "fee": self.fee.to_string(),
            "identity": self.from.to_string(),
            "nonce": self.nonce,
            "to_addr": self.to_addr.to_string(),
            "value": self.value.to_string(),
        });
        personal_message_hash(payload.to_string().as_bytes())
    }

    fn gate_failure(gate: GateFailure) -> TxResult {
        match gate {
            GateFailure::SenderNotRegistered => TxResult::withdraw_sender_not_registered(),
            GateFailure::InvalidSignature => TxResult::withdraw_invalid_signature(),
            GateFailure::InvalidNonce => TxResult::withdraw_invalid_nonce(),
            GateFailure::Duplicated => TxResult::withdraw_duplicated(),
        }
    }

    fn check_inner(&self, state: &impl ReadState) -> Result<(Identity, Amount), CheckFailure> {
        if self.value.is_zero() {
            return Err(CheckFailure::Rejected(TxResult::withdraw_invalid_format(), None));
        }
        let total = match self.value.checked_add(self.fee) {
            Ok(total) => total,
            Err(_) => {
                return Err(CheckFailure::Rejected(TxResult::withdraw_invalid_format(), None))
            }
        };

        let signer = recover_address(&self.signing_digest(), &self.sig);
        let sender = authenticate(state, &self.from, signer, self.nonce, Self::gate_failure)?;

        let balance = fatal(balance_of(state, &Identifier::Id(sender)))?;
        if balance < total {
            return Err(CheckFailure::Rejected(
                TxResult::withdraw_not_enough_balance(),
                Some(sender),
            ));
        }
        Ok((sender, total))
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
        let (sender, total) = match self.check_inner(state) {
            Ok(ok) => ok,
            Err(failure) => return failure.settle(state),
        };
        fatal(advance_nonce(state, &sender))?;
        fatal(sub_balance(state, &Identifier::Id(sender), total))?;

        let packed = PackedWithdraw {
            from: sender,
            to_addr: self.to_addr,
            value: self.value,
            fee: self.fee,
            nonce: self.nonce,
        };
        add_receipt(state, &packed, tx_hash);
        debug!("[xl-06] Withdrawal of {} to {}", self.value, self.to_addr);

        // The receipt becomes provable at the next committed height.
        let receipt_height = state.height() + 1;
        Ok(TxResult::success()
            .with_data(packed.to_bytes().to_vec())
            .with_tag("withdraw.height", receipt_height.to_string()))
    }
}
