//! Approval of a previously proposed deposit.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Hash, Identifier, Identity, TxHash};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::advance_nonce;
use xl_03_deposit::{check_deposit_approval, process_deposit_approval, DepositError};

use crate::domain::result::{TxResult, TxStatus};
use crate::domain::signature::{personal_message_hash, recover_address, TxSignature};
use crate::domain::status::set_tx_status;
use crate::domain::txs::{
    authenticate, corruption, fatal, CheckFailure, GateFailure, StateCorruption,
};

/// A vote on an existing proposal, referencing the transaction that
/// created it. On quorum the deposit executes and the referenced
/// transaction's status resolves to success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositApprovalTx {
    pub from: Identifier,
    pub deposit_tx_hash: TxHash,
    pub nonce: u64,
    pub sig: TxSignature,
}

impl DepositApprovalTx {
    pub fn signing_digest(&self) -> Hash {
        let payload = json!({
            "deposit_tx_hash": format!("0x{}", hex::encode(self.deposit_tx_hash)),
            "identity": self.from.to_string(),
            "nonce": self.nonce,
        });
        personal_message_hash(payload.to_string().as_bytes())
    }

    fn gate_failure(gate: GateFailure) -> TxResult {
        match gate {
            GateFailure::SenderNotRegistered => TxResult::deposit_approval_sender_not_registered(),
            GateFailure::InvalidSignature => TxResult::deposit_approval_invalid_signature(),
            GateFailure::InvalidNonce => TxResult::deposit_approval_invalid_nonce(),
            GateFailure::Duplicated => TxResult::deposit_approval_duplicated(),
        }
    }

    fn deposit_failure(err: DepositError, sender: Identity) -> CheckFailure {
        let res = match err {
            DepositError::ProposalNotExist => TxResult::deposit_approval_proposal_not_exist(),
            DepositError::AlreadyExecuted(_) => TxResult::deposit_approval_already_executed(),
            DepositError::NotApprover => TxResult::deposit_approval_not_approver(),
            DepositError::DoubleApproval => TxResult::deposit_approval_double_approval(),
            DepositError::InvalidProposal => TxResult::deposit_approval_invalid_format(),
            other => return CheckFailure::Corrupt(corruption(other)),
        };
        CheckFailure::Rejected(res, Some(sender))
    }

    fn check_inner(&self, state: &impl ReadState) -> Result<Identity, CheckFailure> {
        let signer = recover_address(&self.signing_digest(), &self.sig);
        let sender = authenticate(state, &self.from, signer, self.nonce, Self::gate_failure)?;

        check_deposit_approval(state, &self.deposit_tx_hash, &sender)
            .map_err(|e| Self::deposit_failure(e, sender))?;
        Ok(sender)
    }

    pub fn check(&self, state: &impl ReadState) -> Result<TxResult, StateCorruption> {
        match self.check_inner(state) {
            Ok(_) => Ok(TxResult::success()),
            Err(failure) => failure.into_result(),
        }
    }

    pub fn deliver(&self, state: &mut impl WriteState) -> Result<TxResult, StateCorruption> {
        let sender = match self.check_inner(state) {
            Ok(id) => id,
            Err(failure) => return failure.settle(state),
        };
        fatal(advance_nonce(state, &sender))?;

        let executed = fatal(process_deposit_approval(state, &self.deposit_tx_hash, &sender))?;
        if executed {
            // The proposing transaction was pending until this vote.
            set_tx_status(state, &self.deposit_tx_hash, TxStatus::Success);
        }
        debug!(
            "[xl-06] Deposit approval of 0x{} by {}, executed: {}",
            hex::encode(self.deposit_tx_hash),
            sender,
            executed
        );
        Ok(TxResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::SigningKey;
    use shared_types::{Address, Amount};
    use xl_01_state_tree::StateStore;
    use xl_02_accounts::{balance_of, register};
    use xl_03_deposit::{set_approvers, Approver, DepositInput, Proposal};

    use crate::domain::signature::{address_of_key, sign_digest};
    use crate::domain::status::tx_status;
    use crate::domain::txs::deposit::DepositTx;

    fn proposal() -> Proposal {
        Proposal {
            block_number: 9,
            inputs: vec![DepositInput {
                from_addr: Address([0xBB; 20]),
                value: Amount::from(77),
            }],
        }
    }

    fn signed_approval(
        key: &SigningKey,
        from: Identity,
        deposit_tx_hash: TxHash,
        nonce: u64,
    ) -> DepositApprovalTx {
        let mut tx = DepositApprovalTx {
            from: Identifier::Id(from),
            deposit_tx_hash,
            nonce,
            sig: TxSignature {
                r: [0u8; 32],
                s: [0u8; 32],
                v: 0,
            },
        };
        tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
        tx
    }

    fn setup(store: &mut StateStore, keys: &[&SigningKey]) -> Vec<Identity> {
        let mut state = store.working();
        let ids: Vec<Identity> = keys
            .iter()
            .map(|key| register(&mut state, &address_of_key(key.verifying_key())).unwrap())
            .collect();
        let approvers: Vec<Approver> = ids
            .iter()
            .map(|&identity| Approver {
                identity,
                weight: 1,
            })
            .collect();
        set_approvers(&mut state, &approvers).unwrap();
        ids
    }

    fn propose(store: &mut StateStore, key: &SigningKey, from: Identity) -> TxHash {
        let mut tx = DepositTx {
            from: Identifier::Id(from),
            proposal: proposal(),
            nonce: 1,
            sig: TxSignature {
                r: [0u8; 32],
                s: [0u8; 32],
                v: 0,
            },
        };
        tx.sig = sign_digest(key, &tx.signing_digest()).unwrap();
        let tx_hash = [0x77; 32];
        assert!(tx.deliver(&mut store.working(), &tx_hash).unwrap().is_success());
        tx_hash
    }

    #[test]
    fn test_approval_reaches_quorum_and_resolves_deposit() {
        let mut store = StateStore::new(0);
        store.begin_block([0x55; 32], 1);
        let a = SigningKey::from_slice(&[1u8; 32]).unwrap();
        let b = SigningKey::from_slice(&[2u8; 32]).unwrap();
        let ids = setup(&mut store, &[&a, &b]);
        let deposit_hash = propose(&mut store, &a, ids[0]);

        let tx = signed_approval(&b, ids[1], deposit_hash, 1);
        assert!(tx.check(&store.working()).unwrap().is_success());
        assert!(tx.deliver(&mut store.working()).unwrap().is_success());

        assert_eq!(tx_status(&store.working(), &deposit_hash), TxStatus::Success);
        assert_eq!(
            balance_of(&store.working(), &Identifier::Addr(Address([0xBB; 20]))).unwrap(),
            Amount::from(77)
        );
    }

    #[test]
    fn test_approval_of_unknown_proposal_consumes_nonce() {
        let mut store = StateStore::new(0);
        store.begin_block([0x55; 32], 1);
        let a = SigningKey::from_slice(&[1u8; 32]).unwrap();
        let ids = setup(&mut store, &[&a]);

        let tx = signed_approval(&a, ids[0], [0x99; 32], 1);
        let res = tx.deliver(&mut store.working()).unwrap();
        assert_eq!(res.code, TxResult::deposit_approval_proposal_not_exist().code);
        assert_eq!(
            xl_02_accounts::next_nonce_of(&store.working(), &ids[0]).unwrap(),
            2
        );
    }

    #[test]
    fn test_proposer_cannot_approve_own_proposal_twice() {
        let mut store = StateStore::new(0);
        store.begin_block([0x55; 32], 1);
        let a = SigningKey::from_slice(&[1u8; 32]).unwrap();
        let b = SigningKey::from_slice(&[2u8; 32]).unwrap();
        let ids = setup(&mut store, &[&a, &b]);
        let deposit_hash = propose(&mut store, &a, ids[0]);

        let tx = signed_approval(&a, ids[0], deposit_hash, 2);
        let res = tx.deliver(&mut store.working()).unwrap();
        assert_eq!(res.code, TxResult::deposit_approval_double_approval().code);
    }
}
