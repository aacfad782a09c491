//! Deposit subsystem errors.

use thiserror::Error;
use xl_02_accounts::AccountError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositError {
    /// The external block number already has an executed proposal.
    #[error("Deposit already executed for block number {0}")]
    AlreadyExecuted(u64),

    /// The voter holds no approver weight.
    #[error("Not a deposit approver")]
    NotApprover,

    /// The voter already voted for this exact proposal content.
    #[error("Deposit already approved by this approver")]
    DoubleApproval,

    /// An approval referenced a deposit transaction nobody proposed.
    #[error("Deposit proposal does not exist")]
    ProposalNotExist,

    /// Empty input list or out-of-range value.
    #[error("Invalid deposit proposal")]
    InvalidProposal,

    /// A stored record failed to decode; fatal for the process.
    #[error("Corrupt deposit record: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Account(#[from] AccountError),
}
