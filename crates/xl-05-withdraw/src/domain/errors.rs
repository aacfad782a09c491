//! Withdrawal subsystem errors.

use thiserror::Error;
use xl_01_state_tree::TreeError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawError {
    /// The requested height's tree version was pruned by garbage
    /// collection. Distinct from a missing withdrawal: the proof can
    /// never be produced, a partial or zeroed proof is never returned.
    #[error("Proof not available: height {0} has been pruned")]
    ProofNotAvailable(u64),

    /// No receipt for this packed withdrawal at the given height.
    #[error("Withdrawal not found at height {0}")]
    WithdrawalNotFound(u64),

    /// Malformed packed representation.
    #[error("Invalid packed withdrawal: expected {expected} bytes, got {actual}")]
    InvalidPacked { expected: usize, actual: usize },

    #[error(transparent)]
    Tree(TreeError),
}
