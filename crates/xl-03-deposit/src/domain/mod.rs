pub mod errors;
pub mod proposal;
pub mod store;

pub use errors::DepositError;
pub use proposal::{Approver, DepositInput, Proposal};
pub use store::{
    approver_weight, approvers, check_deposit, check_deposit_approval, execution_of, has_approved,
    process_deposit, process_deposit_approval, proposal_by_tx_hash, proposal_weight,
    set_approvers, weight_sum,
};
