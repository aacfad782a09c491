pub mod errors;
pub mod header;
pub mod packed;

pub use errors::WithdrawError;
pub use header::{commitment_root, header_proof, root_from_app_leaf, BlockHeader};
pub use packed::{add_receipt, receipt_of, withdraw_proof_bytes, PackedWithdraw};
