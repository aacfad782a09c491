//! Packed withdrawal records and receipt storage.

use sha2::{Digest, Sha256};
use shared_types::{Address, Amount, Hash, Identity, TxHash};
use tracing::debug;
use xl_01_state_tree::{ReadState, StateStore, TreeError, WriteState};

use crate::domain::errors::WithdrawError;

/// Byte length of the packed form: identity, destination address,
/// value, fee, nonce.
pub const PACKED_LEN: usize = 20 + 20 + 32 + 32 + 8;

/// The contract-visible form of one withdrawal. Its SHA-256 digest
/// keys the receipt in the withdrawal tree, so the packing must stay
/// byte-stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedWithdraw {
    pub from: Identity,
    pub to_addr: Address,
    pub value: Amount,
    pub fee: Amount,
    pub nonce: u64,
}

impl PackedWithdraw {
    pub fn to_bytes(&self) -> [u8; PACKED_LEN] {
        let mut out = [0u8; PACKED_LEN];
        out[..20].copy_from_slice(self.from.as_bytes());
        out[20..40].copy_from_slice(self.to_addr.as_bytes());
        out[40..72].copy_from_slice(&self.value.to_be_bytes());
        out[72..104].copy_from_slice(&self.fee.to_be_bytes());
        out[104..].copy_from_slice(&self.nonce.to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<PackedWithdraw, WithdrawError> {
        if bytes.len() != PACKED_LEN {
            return Err(WithdrawError::InvalidPacked {
                expected: PACKED_LEN,
                actual: bytes.len(),
            });
        }
        let mut from = [0u8; 20];
        from.copy_from_slice(&bytes[..20]);
        let mut to_addr = [0u8; 20];
        to_addr.copy_from_slice(&bytes[20..40]);
        let mut nonce = [0u8; 8];
        nonce.copy_from_slice(&bytes[104..]);
        Ok(PackedWithdraw {
            from: Identity(from),
            to_addr: Address(to_addr),
            value: Amount::from_be_bytes(&bytes[40..72]),
            fee: Amount::from_be_bytes(&bytes[72..104]),
            nonce: u64::from_be_bytes(nonce),
        })
    }

    /// Withdrawal tree key.
    pub fn tree_key(&self) -> Hash {
        Sha256::digest(self.to_bytes()).into()
    }
}

/// Append the receipt for an executed withdrawal. The stored value is
/// the hash of the transaction that performed it, tying the receipt
/// back to its origin.
pub fn add_receipt(state: &mut impl WriteState, packed: &PackedWithdraw, tx_hash: &TxHash) {
    state.withdraw_set(&packed.tree_key(), tx_hash.to_vec());
    debug!(
        "[xl-05] Withdrawal receipt {} -> {}",
        packed.from, packed.to_addr
    );
}

/// The originating tx hash of a receipt in the working version, if the
/// withdrawal executed.
pub fn receipt_of(state: &impl ReadState, packed: &PackedWithdraw) -> Option<Vec<u8>> {
    state.withdraw_get(&packed.tree_key())
}

/// Contract proof bytes for a withdrawal at a committed height.
pub fn withdraw_proof_bytes(
    store: &StateStore,
    packed: &PackedWithdraw,
    height: u64,
) -> Result<Vec<u8>, WithdrawError> {
    let proof = store
        .withdraw_proof_at(height, &packed.tree_key())
        .map_err(|e| match e {
            TreeError::VersionNotFound { .. } => WithdrawError::ProofNotAvailable(height),
            TreeError::KeyNotFound { .. } => WithdrawError::WithdrawalNotFound(height),
            other => WithdrawError::Tree(other),
        })?;
    Ok(proof.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xl_01_state_tree::PathProof;

    fn packed() -> PackedWithdraw {
        PackedWithdraw {
            from: Identity([1u8; 20]),
            to_addr: Address([2u8; 20]),
            value: Amount::from(1_000_000),
            fee: Amount::from(25),
            nonce: 3,
        }
    }

    #[test]
    fn test_packed_round_trip() {
        let p = packed();
        assert_eq!(PackedWithdraw::from_bytes(&p.to_bytes()).unwrap(), p);
        assert!(matches!(
            PackedWithdraw::from_bytes(&[0u8; 10]),
            Err(WithdrawError::InvalidPacked { .. })
        ));
    }

    #[test]
    fn test_tree_key_changes_with_any_field() {
        let base = packed();
        let mut other = base;
        other.nonce = 4;
        assert_ne!(base.tree_key(), other.tree_key());
        let mut other = base;
        other.fee = Amount::from(26);
        assert_ne!(base.tree_key(), other.tree_key());
    }

    #[test]
    fn test_receipt_and_proof_flow() {
        let mut store = StateStore::new(0);
        store.begin_block([0u8; 32], 1);
        let p = packed();
        let tx_hash = [9u8; 32];
        add_receipt(&mut store.working(), &p, &tx_hash);
        assert_eq!(
            receipt_of(&store.working(), &p),
            Some(tx_hash.to_vec())
        );
        store.commit();

        let bytes = withdraw_proof_bytes(&store, &p, 1).unwrap();
        let (_, withdraw_root) = store.roots_at(1).unwrap();
        let decoded = PathProof::verify(&bytes, &p.tree_key(), &withdraw_root).unwrap();
        assert_eq!(decoded.value, tx_hash.to_vec());
    }

    #[test]
    fn test_missing_withdrawal_and_pruned_height() {
        let mut store = StateStore::new(2);
        for i in 0..5u8 {
            store.begin_block([i; 32], i as u64 + 1);
            if i == 0 {
                add_receipt(&mut store.working(), &packed(), &[9u8; 32]);
            }
            store.commit();
        }

        // Height 1 (where the receipt landed) is pruned with keep=2.
        assert_eq!(
            withdraw_proof_bytes(&store, &packed(), 1),
            Err(WithdrawError::ProofNotAvailable(1))
        );
        // The receipt persists in later versions of the tree.
        withdraw_proof_bytes(&store, &packed(), 5).unwrap();

        let mut absent = packed();
        absent.nonce = 99;
        assert_eq!(
            withdraw_proof_bytes(&store, &absent, 5),
            Err(WithdrawError::WithdrawalNotFound(5))
        );
    }
}
