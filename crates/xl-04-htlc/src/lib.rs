//! # xl-04-htlc
//!
//! Hashed time-locked transfers: value escrowed against a SHA-256
//! secret commitment with an inclusive expiry.
//!
//! ## Role in System
//!
//! - **Escrow records**: the enclosing transfer debits the sender; the
//!   record stored here only ever credits on resolution, so the locked
//!   value cannot be double spent.
//! - **Exclusivity**: claim requires the preimage before expiry; revoke
//!   requires expiry to have passed. `now >= expiry` counts as expired,
//!   so at any block time exactly one of the two paths is open.

pub mod domain;

pub use domain::*;
