//! Multi-output value transfer.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Amount, Hash, Identifier, Identity};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::{add_balance, advance_nonce, balance_of, is_identity_registered, sub_balance};

use crate::domain::result::TxResult;
use crate::domain::signature::{personal_message_hash, recover_address, TxSignature};
use crate::domain::txs::{authenticate, fatal, CheckFailure, GateFailure, StateCorruption};

/// Longest accepted remark, in bytes.
pub const MAX_REMARK_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutput {
    pub to: Identifier,
    pub value: Amount,
    pub remark: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTx {
    pub from: Identifier,
    pub outputs: Vec<TransferOutput>,
    pub fee: Amount,
    pub nonce: u64,
    pub sig: TxSignature,
}

impl TransferTx {
    pub fn signing_digest(&self) -> Hash {
        let outputs: Vec<_> = self
            .outputs
            .iter()
            .map(|o| {
                json!({
                    "identity": o.to.to_string(),
                    "remark": base64::engine::general_purpose::STANDARD.encode(&o.remark),
                    "value": o.value.to_string(),
                })
            })
            .collect();
        let payload = json!({
            "fee": self.fee.to_string(),
            "identity": self.from.to_string(),
            "nonce": self.nonce,
            "outputs": outputs,
        });
        personal_message_hash(payload.to_string().as_bytes())
    }

    /// Fee plus all output values, unless the sum leaves the range.
    fn total_value(&self) -> Option<Amount> {
        let mut total = self.fee;
        for output in &self.outputs {
            total = total.checked_add(output.value).ok()?;
        }
        Some(total)
    }

    fn gate_failure(gate: GateFailure) -> TxResult {
        match gate {
            GateFailure::SenderNotRegistered => TxResult::transfer_sender_not_registered(),
            GateFailure::InvalidSignature => TxResult::transfer_invalid_signature(),
            GateFailure::InvalidNonce => TxResult::transfer_invalid_nonce(),
            GateFailure::Duplicated => TxResult::transfer_duplicated(),
        }
    }

    fn check_inner(&self, state: &impl ReadState) -> Result<(Identity, Amount), CheckFailure> {
        if self.outputs.is_empty()
            || self.outputs.iter().any(|o| o.remark.len() > MAX_REMARK_LEN)
        {
            return Err(CheckFailure::Rejected(TxResult::transfer_invalid_format(), None));
        }
        let total = match self.total_value() {
            Some(total) => total,
            None => return Err(CheckFailure::Rejected(TxResult::transfer_invalid_format(), None)),
        };

        let signer = recover_address(&self.signing_digest(), &self.sig);
        let sender = authenticate(state, &self.from, signer, self.nonce, Self::gate_failure)?;

        // Identity receivers must exist; address receivers may be
        // unbound and accumulate an address-only balance.
        for output in &self.outputs {
            if let Identifier::Id(id) = &output.to {
                if !is_identity_registered(state, id) {
                    return Err(CheckFailure::Rejected(
                        TxResult::transfer_invalid_receiver(),
                        Some(sender),
                    ));
                }
            }
        }

        let balance = fatal(balance_of(state, &Identifier::Id(sender)))?;
        if balance < total {
            return Err(CheckFailure::Rejected(
                TxResult::transfer_not_enough_balance(),
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

    pub fn deliver(&self, state: &mut impl WriteState) -> Result<TxResult, StateCorruption> {
        let (sender, total) = match self.check_inner(state) {
            Ok(ok) => ok,
            Err(failure) => return failure.settle(state),
        };
        fatal(advance_nonce(state, &sender))?;
        fatal(sub_balance(state, &Identifier::Id(sender), total))?;
        for output in &self.outputs {
            fatal(add_balance(state, &output.to, output.value))?;
        }
        debug!(
            "[xl-06] Transfer of {} from {} across {} outputs",
            total,
            sender,
            self.outputs.len()
        );
        Ok(TxResult::success())
    }
}
