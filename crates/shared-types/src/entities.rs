//! # Core Type Aliases
//!
//! Fixed-width aliases used across all subsystems.

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// The hash of a transaction envelope (SHA-256 over the raw bytes).
pub type TxHash = [u8; 32];

/// Block time as delivered by the consensus engine (Unix seconds).
pub type BlockTime = u64;

/// Errors shared by parsers of the fixed-width types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Input had the wrong byte length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Input was not valid in the canonical text encoding.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}
