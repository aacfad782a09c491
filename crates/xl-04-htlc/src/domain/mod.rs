pub mod errors;
pub mod transfer;

pub use errors::HtlcError;
pub use transfer::{
    check_claim, check_create, check_revoke, claim, create, get, remove, revoke, HashedTransfer,
};
