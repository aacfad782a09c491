//! Account subsystem errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The identity or the address is already bound.
    #[error("Account already registered")]
    AlreadyRegistered,

    /// A debit would drive the balance below zero.
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: String, need: String },

    /// Arithmetic left the representable amount range.
    #[error("Amount out of range")]
    InvalidAmount,

    /// A stored record failed to decode. Continuing would desync the
    /// authenticated state, so callers treat this as fatal.
    #[error("Corrupt account record: {0}")]
    Corrupt(String),
}
