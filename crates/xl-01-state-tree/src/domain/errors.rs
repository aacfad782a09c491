//! Error taxonomy for the versioned state tree.

use thiserror::Error;

/// Errors surfaced by tree lookups, version management and proof
/// construction or verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The requested version was never saved or has been garbage
    /// collected.
    #[error("Version {version} not available (retained from {oldest})")]
    VersionNotFound { version: u64, oldest: u64 },

    /// The key does not exist in the requested version.
    #[error("Key not found: {key_hex}")]
    KeyNotFound { key_hex: String },

    /// Proof bytes were malformed or truncated.
    #[error("Corrupt proof encoding")]
    CorruptProof,

    /// A replayed proof did not hash to the expected root.
    #[error("Proof root mismatch: expected {expected}, computed {computed}")]
    RootMismatch { expected: String, computed: String },
}
