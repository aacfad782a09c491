//! Claim or revoke of an escrowed hashed transfer.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Hash, Identifier, Identity, TxHash};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::{advance_nonce, normalize};
use xl_04_htlc::{check_claim, check_revoke, claim, get, revoke, HashedTransfer, HtlcError};

use crate::domain::result::{TxResult, TxStatus};
use crate::domain::signature::{personal_message_hash, recover_address, TxSignature};
use crate::domain::status::set_tx_status;
use crate::domain::txs::{authenticate, fatal, CheckFailure, GateFailure, StateCorruption};

/// Which exit the sender is entitled to take.
enum Resolution {
    Claim,
    Revoke,
}

/// Resolves a hashed transfer: the receiver claims with the secret
/// before expiry, or the creator revokes after expiry. The secret is
/// empty for a revoke and exactly 32 bytes for a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimHashedTransferTx {
    pub from: Identifier,
    pub htlc_tx_hash: TxHash,
    pub secret: Vec<u8>,
    pub nonce: u64,
    pub sig: TxSignature,
}

impl ClaimHashedTransferTx {
    pub fn signing_digest(&self) -> Hash {
        let secret = if self.secret.is_empty() {
            String::new()
        } else {
            format!("0x{}", hex::encode(&self.secret))
        };
        let payload = json!({
            "htlc_tx_hash": format!("0x{}", hex::encode(self.htlc_tx_hash)),
            "identity": self.from.to_string(),
            "nonce": self.nonce,
            "secret": secret,
        });
        personal_message_hash(payload.to_string().as_bytes())
    }

    fn gate_failure(gate: GateFailure) -> TxResult {
        match gate {
            GateFailure::SenderNotRegistered => {
                TxResult::claim_hashed_transfer_sender_not_registered()
            }
            GateFailure::InvalidSignature => TxResult::claim_hashed_transfer_invalid_signature(),
            GateFailure::InvalidNonce => TxResult::claim_hashed_transfer_invalid_nonce(),
            GateFailure::Duplicated => TxResult::claim_hashed_transfer_duplicated(),
        }
    }

    fn check_inner(
        &self,
        state: &impl ReadState,
    ) -> Result<(Identity, HashedTransfer, Resolution), CheckFailure> {
        if !self.secret.is_empty() && self.secret.len() != 32 {
            return Err(CheckFailure::Rejected(
                TxResult::claim_hashed_transfer_invalid_format(),
                None,
            ));
        }

        let signer = recover_address(&self.signing_digest(), &self.sig);
        let sender = authenticate(state, &self.from, signer, self.nonce, Self::gate_failure)?;

        let record = match fatal(get(state, &self.htlc_tx_hash))? {
            Some(record) => record,
            None => {
                return Err(CheckFailure::Rejected(
                    TxResult::claim_hashed_transfer_tx_not_exist(),
                    Some(sender),
                ))
            }
        };

        let me = Identifier::Id(sender);
        let now = state.block_time();
        let resolution = if normalize(state, &record.to) == me {
            check_claim(&record, &self.secret, now).map_err(|e| {
                let res = match e {
                    HtlcError::Expired => TxResult::claim_hashed_transfer_expired(),
                    _ => TxResult::claim_hashed_transfer_invalid_secret(),
                };
                CheckFailure::Rejected(res, Some(sender))
            })?;
            Resolution::Claim
        } else if normalize(state, &record.from) == me {
            check_revoke(&record, now).map_err(|_| {
                CheckFailure::Rejected(
                    TxResult::claim_hashed_transfer_not_yet_expired(),
                    Some(sender),
                )
            })?;
            Resolution::Revoke
        } else {
            return Err(CheckFailure::Rejected(
                TxResult::claim_hashed_transfer_invalid_sender(),
                Some(sender),
            ));
        };
        Ok((sender, record, resolution))
    }

    pub fn check(&self, state: &impl ReadState) -> Result<TxResult, StateCorruption> {
        match self.check_inner(state) {
            Ok(_) => Ok(TxResult::success()),
            Err(failure) => failure.into_result(),
        }
    }

    pub fn deliver(&self, state: &mut impl WriteState) -> Result<TxResult, StateCorruption> {
        let (sender, record, resolution) = match self.check_inner(state) {
            Ok(ok) => ok,
            Err(failure) => return failure.settle(state),
        };
        fatal(advance_nonce(state, &sender))?;
        match resolution {
            Resolution::Claim => fatal(claim(state, &record, &self.htlc_tx_hash))?,
            Resolution::Revoke => fatal(revoke(state, &record, &self.htlc_tx_hash))?,
        }
        // The escrowing transaction was pending; it is now resolved.
        set_tx_status(state, &self.htlc_tx_hash, TxStatus::Success);
        debug!(
            "[xl-06] Hashed transfer 0x{} resolved by {}",
            hex::encode(self.htlc_tx_hash),
            sender
        );
        Ok(TxResult::success())
    }
}
