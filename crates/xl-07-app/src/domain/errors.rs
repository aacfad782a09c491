//! Application-level errors.

use thiserror::Error;
use xl_06_tx_pipeline::StateCorruption;

/// Failures that abort the node. Nothing here is recoverable at
/// runtime: a node that cannot apply genesis must not join consensus,
/// and one holding corrupted state must leave it before diverging.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid genesis: {0}")]
    InvalidGenesis(String),

    /// Corrupted consensus-critical state. The hosting process must
    /// halt rather than keep answering consensus calls.
    #[error(transparent)]
    Fatal(#[from] StateCorruption),
}
