//! Hashed time-locked transfer creation.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Amount, BlockTime, Hash, Identifier, Identity, TxHash};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::{advance_nonce, balance_of, is_identity_registered, sub_balance};
use xl_04_htlc::{check_create, create, HashedTransfer};

use crate::domain::result::TxResult;
use crate::domain::signature::{personal_message_hash, recover_address, TxSignature};
use crate::domain::txs::{authenticate, fatal, CheckFailure, GateFailure, StateCorruption};

/// Escrows `value` against a SHA-256 commitment until `expiry`. The
/// value and fee leave the sender immediately; the escrow resolves
/// through a later claim transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedTransferTx {
    pub from: Identifier,
    pub to: Identifier,
    pub value: Amount,
    pub hash_commit: Hash,
    pub expiry: BlockTime,
    pub fee: Amount,
    pub nonce: u64,
    pub sig: TxSignature,
}

impl HashedTransferTx {
    fn record(&self) -> HashedTransfer {
        HashedTransfer {
            from: self.from,
            to: self.to,
            value: self.value,
            hash_commit: self.hash_commit,
            expiry: self.expiry,
        }
    }

    pub fn signing_digest(&self) -> Hash {
        let payload = json!({
            "expiry": self.expiry,
            "fee": self.fee.to_string(),
            "hash_commit": format!("0x{}", hex::encode(self.hash_commit)),
            "identity": self.from.to_string(),
            "nonce": self.nonce,
            "to": self.to.to_string(),
            "value": self.value.to_string(),
        });
        personal_message_hash(payload.to_string().as_bytes())
    }

    fn gate_failure(gate: GateFailure) -> TxResult {
        match gate {
            GateFailure::SenderNotRegistered => TxResult::hashed_transfer_sender_not_registered(),
            GateFailure::InvalidSignature => TxResult::hashed_transfer_invalid_signature(),
            GateFailure::InvalidNonce => TxResult::hashed_transfer_invalid_nonce(),
            GateFailure::Duplicated => TxResult::hashed_transfer_duplicated(),
        }
    }

    fn check_inner(&self, state: &impl ReadState) -> Result<(Identity, Amount), CheckFailure> {
        let record = self.record();
        if !record.validate() {
            return Err(CheckFailure::Rejected(
                TxResult::hashed_transfer_invalid_format(),
                None,
            ));
        }
        let total = match self.value.checked_add(self.fee) {
            Ok(total) => total,
            Err(_) => {
                return Err(CheckFailure::Rejected(
                    TxResult::hashed_transfer_invalid_format(),
                    None,
                ))
            }
        };

        let signer = recover_address(&self.signing_digest(), &self.sig);
        let sender = authenticate(state, &self.from, signer, self.nonce, Self::gate_failure)?;

        if let Identifier::Id(id) = &self.to {
            if !is_identity_registered(state, id) {
                return Err(CheckFailure::Rejected(
                    TxResult::hashed_transfer_invalid_receiver(),
                    Some(sender),
                ));
            }
        }
        let balance = fatal(balance_of(state, &Identifier::Id(sender)))?;
        if balance < total {
            return Err(CheckFailure::Rejected(
                TxResult::hashed_transfer_not_enough_balance(),
                Some(sender),
            ));
        }
        if check_create(&record, state.block_time()).is_err() {
            return Err(CheckFailure::Rejected(
                TxResult::hashed_transfer_invalid_expiry(),
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
        fatal(create(state, &self.record(), tx_hash))?;
        debug!(
            "[xl-06] Hashed transfer of {} escrowed until {}",
            self.value, self.expiry
        );
        // Pending until claimed or revoked.
        Ok(TxResult::success().pending())
    }
}
