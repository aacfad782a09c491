//! # Shared Types Crate
//!
//! This crate contains the primitive domain types shared by every
//! CrossLedger subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem primitives are
//!   defined here, never re-declared locally.
//! - **Canonical encodings**: an [`Identity`] renders as standard base64,
//!   an [`Address`] as lowercase `0x`-prefixed hex. Both parse back from
//!   their canonical form.
//! - **Bounded arithmetic**: [`Amount`] is a non-negative integer below
//!   2^256 by construction; overflowing operations return typed errors
//!   instead of wrapping.

pub mod address;
pub mod amount;
pub mod entities;
pub mod identifier;
pub mod identity;

pub use address::Address;
pub use amount::{Amount, AmountError};
pub use entities::*;
pub use identifier::Identifier;
pub use identity::Identity;
