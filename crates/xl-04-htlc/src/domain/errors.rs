//! HTLC subsystem errors.

use thiserror::Error;
use xl_02_accounts::AccountError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtlcError {
    /// Expiry already reached at creation time.
    #[error("Hashed transfer already expired at creation")]
    InvalidExpiry,

    /// Claim attempted at or after expiry.
    #[error("Hashed transfer expired")]
    Expired,

    /// The revealed secret does not hash to the commitment.
    #[error("Invalid secret")]
    InvalidSecret,

    /// Revoke attempted before expiry.
    #[error("Hashed transfer not yet expired")]
    NotYetExpired,

    /// No record under the referenced transaction hash.
    #[error("Hashed transfer not found")]
    NotFound,

    /// A stored record failed to decode; fatal for the process.
    #[error("Corrupt hashed transfer record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Account(#[from] AccountError),
}
