pub mod errors;
pub mod keys;
pub mod registry;

pub use errors::AccountError;
pub use registry::{
    add_balance, advance_nonce, balance_of, bind, has_address, identifier_to_identity,
    is_address_registered, is_identity_registered, next_nonce_of, normalize, register,
    save_balance, sub_balance,
};
