//! Per-transaction status records, keyed by transaction hash.

use shared_types::TxHash;
use xl_01_state_tree::{ReadState, WriteState};

use crate::domain::result::TxStatus;

const STATUS_PREFIX: &[u8] = b"txstatus:";

fn status_key(tx_hash: &TxHash) -> Vec<u8> {
    [STATUS_PREFIX, tx_hash].concat()
}

/// Recorded status of a transaction. Unknown hashes report
/// [`TxStatus::NotSet`].
pub fn tx_status(state: &impl ReadState, tx_hash: &TxHash) -> TxStatus {
    state
        .ledger_get(&status_key(tx_hash))
        .and_then(|raw| raw.first().copied())
        .and_then(|b| TxStatus::from_i8(b as i8))
        .unwrap_or(TxStatus::NotSet)
}

/// Record a transaction's status. Success is terminal: a later write
/// never downgrades it.
pub fn set_tx_status(state: &mut impl WriteState, tx_hash: &TxHash, status: TxStatus) {
    if tx_status(state, tx_hash) == TxStatus::Success {
        return;
    }
    state.ledger_set(&status_key(tx_hash), vec![status.as_i8() as u8]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use xl_01_state_tree::StateStore;

    #[test]
    fn test_status_lifecycle() {
        let mut store = StateStore::new(0);
        store.begin_block([0u8; 32], 1);
        let mut state = store.working();
        let hash = [1u8; 32];

        assert_eq!(tx_status(&state, &hash), TxStatus::NotSet);
        set_tx_status(&mut state, &hash, TxStatus::Pending);
        assert_eq!(tx_status(&state, &hash), TxStatus::Pending);
        set_tx_status(&mut state, &hash, TxStatus::Success);
        assert_eq!(tx_status(&state, &hash), TxStatus::Success);
    }

    #[test]
    fn test_success_is_terminal() {
        let mut store = StateStore::new(0);
        store.begin_block([0u8; 32], 1);
        let mut state = store.working();
        let hash = [2u8; 32];

        set_tx_status(&mut state, &hash, TxStatus::Success);
        set_tx_status(&mut state, &hash, TxStatus::Fail);
        assert_eq!(tx_status(&state, &hash), TxStatus::Success);
    }
}
