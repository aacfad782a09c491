//! # xl-02-accounts
//!
//! Account registry for CrossLedger: identity binding, balances and
//! nonces, all stored in the ledger tree.
//!
//! ## Role in System
//!
//! - **Dual naming**: every account is reachable by its chain-local
//!   [`Identity`](shared_types::Identity) and any bound external
//!   [`Address`](shared_types::Address); both resolve to the same
//!   record.
//! - **Address-only balances**: an unbound address can receive funds
//!   before registration; binding absorbs that balance into the
//!   identity's record.
//! - **Nonce authority**: `next_nonce_of` / `advance_nonce` are the only
//!   interface the transaction pipeline uses for replay protection.

pub mod domain;

pub use domain::*;
