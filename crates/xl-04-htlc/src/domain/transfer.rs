//! Hashed transfer records and their claim/revoke transitions.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{Amount, BlockTime, Hash, Identifier, TxHash};
use tracing::debug;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::add_balance;

use crate::domain::errors::HtlcError;

/// An escrowed transfer, keyed by the hash of the transaction that
/// created it. The value is already debited from `from` when the
/// record exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedTransfer {
    pub from: Identifier,
    pub to: Identifier,
    pub value: Amount,
    pub hash_commit: Hash,
    pub expiry: BlockTime,
}

impl HashedTransfer {
    /// Non-zero value and a positive expiry.
    pub fn validate(&self) -> bool {
        !self.value.is_zero() && self.expiry > 0
    }

    /// Expiry is inclusive: the transfer counts as expired exactly at
    /// its expiry time.
    pub fn is_expired(&self, now: BlockTime) -> bool {
        now >= self.expiry
    }
}

fn record_key(tx_hash: &TxHash) -> Vec<u8> {
    [b"htlc:".as_slice(), tx_hash].concat()
}

pub fn create(
    state: &mut impl WriteState,
    ht: &HashedTransfer,
    tx_hash: &TxHash,
) -> Result<(), HtlcError> {
    let encoded = bincode::serialize(ht)
        .map_err(|e| HtlcError::Corrupt(format!("encode hashed transfer: {e}")))?;
    state.ledger_set(&record_key(tx_hash), encoded);
    Ok(())
}

pub fn get(state: &impl ReadState, tx_hash: &TxHash) -> Result<Option<HashedTransfer>, HtlcError> {
    match state.ledger_get(&record_key(tx_hash)) {
        None => Ok(None),
        Some(raw) => bincode::deserialize(&raw)
            .map(Some)
            .map_err(|e| HtlcError::Corrupt(format!("decode hashed transfer: {e}"))),
    }
}

pub fn remove(state: &mut impl WriteState, tx_hash: &TxHash) {
    state.ledger_remove(&record_key(tx_hash));
}

pub fn check_create(ht: &HashedTransfer, now: BlockTime) -> Result<(), HtlcError> {
    if ht.is_expired(now) {
        return Err(HtlcError::InvalidExpiry);
    }
    Ok(())
}

pub fn check_claim(ht: &HashedTransfer, secret: &[u8], now: BlockTime) -> Result<(), HtlcError> {
    if ht.is_expired(now) {
        return Err(HtlcError::Expired);
    }
    let hash: Hash = Sha256::digest(secret).into();
    if hash != ht.hash_commit {
        return Err(HtlcError::InvalidSecret);
    }
    Ok(())
}

pub fn check_revoke(ht: &HashedTransfer, now: BlockTime) -> Result<(), HtlcError> {
    if !ht.is_expired(now) {
        return Err(HtlcError::NotYetExpired);
    }
    Ok(())
}

/// Credit the receiver and delete the record. The caller has already
/// run `check_claim`.
pub fn claim(
    state: &mut impl WriteState,
    ht: &HashedTransfer,
    tx_hash: &TxHash,
) -> Result<(), HtlcError> {
    add_balance(state, &ht.to, ht.value)?;
    remove(state, tx_hash);
    debug!("[xl-04] Claimed hashed transfer to {}", ht.to);
    Ok(())
}

/// Credit the sender back and delete the record. The caller has
/// already run `check_revoke`.
pub fn revoke(
    state: &mut impl WriteState,
    ht: &HashedTransfer,
    tx_hash: &TxHash,
) -> Result<(), HtlcError> {
    add_balance(state, &ht.from, ht.value)?;
    remove(state, tx_hash);
    debug!("[xl-04] Revoked hashed transfer from {}", ht.from);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Address, Identity};
    use xl_01_state_tree::StateStore;
    use xl_02_accounts::balance_of;

    const SECRET: &[u8] = b"the quick brown preimage";

    fn transfer(expiry: BlockTime) -> HashedTransfer {
        HashedTransfer {
            from: Identifier::Id(Identity([1u8; 20])),
            to: Identifier::Addr(Address([2u8; 20])),
            value: Amount::from(20),
            hash_commit: Sha256::digest(SECRET).into(),
            expiry,
        }
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let ht = transfer(10);
        assert!(!ht.is_expired(9));
        assert!(ht.is_expired(10));
        assert!(ht.is_expired(11));
    }

    #[test]
    fn test_check_create_rejects_expired() {
        let ht = transfer(10);
        assert!(check_create(&ht, 9).is_ok());
        assert_eq!(check_create(&ht, 10), Err(HtlcError::InvalidExpiry));
    }

    #[test]
    fn test_claim_before_expiry_with_secret() {
        let ht = transfer(10);
        assert!(check_claim(&ht, SECRET, 9).is_ok());
        assert_eq!(check_claim(&ht, SECRET, 11), Err(HtlcError::Expired));
        assert_eq!(
            check_claim(&ht, b"wrong secret", 9),
            Err(HtlcError::InvalidSecret)
        );
    }

    #[test]
    fn test_revoke_only_after_expiry() {
        let ht = transfer(10);
        assert_eq!(check_revoke(&ht, 9), Err(HtlcError::NotYetExpired));
        assert!(check_revoke(&ht, 10).is_ok());
        assert!(check_revoke(&ht, 11).is_ok());
    }

    #[test]
    fn test_claim_credits_and_deletes() {
        let mut store = StateStore::new(0);
        store.begin_block([0u8; 32], 5);
        let mut state = store.working();
        let ht = transfer(10);
        let tx_hash = [7u8; 32];

        create(&mut state, &ht, &tx_hash).unwrap();
        assert_eq!(get(&state, &tx_hash).unwrap(), Some(ht.clone()));

        claim(&mut state, &ht, &tx_hash).unwrap();
        assert_eq!(balance_of(&state, &ht.to).unwrap(), Amount::from(20));
        assert_eq!(get(&state, &tx_hash).unwrap(), None);
    }

    #[test]
    fn test_revoke_refunds_sender() {
        let mut store = StateStore::new(0);
        store.begin_block([0u8; 32], 11);
        let mut state = store.working();
        let ht = transfer(10);
        let tx_hash = [8u8; 32];

        create(&mut state, &ht, &tx_hash).unwrap();
        revoke(&mut state, &ht, &tx_hash).unwrap();
        assert_eq!(balance_of(&state, &ht.from).unwrap(), Amount::from(20));
        assert_eq!(get(&state, &tx_hash).unwrap(), None);
    }

    #[test]
    fn test_validate_rejects_zero_value_and_expiry() {
        let mut ht = transfer(10);
        assert!(ht.validate());
        ht.value = Amount::zero();
        assert!(!ht.validate());
        let mut ht = transfer(0);
        ht.expiry = 0;
        assert!(!ht.validate());
    }
}
