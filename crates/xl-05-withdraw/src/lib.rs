//! # xl-05-withdraw
//!
//! Withdrawal receipts and the block commitment consumed by the relay
//! contract on the external chain.
//!
//! ## Role in System
//!
//! - **Receipts**: every executed withdrawal appends a record to the
//!   withdrawal tree, keyed by the digest of its packed form. The relay
//!   contract replays the same packing to locate the receipt.
//! - **Commitment**: the block header fields, including the app hash
//!   that carries both tree roots, fold into a single digest through a
//!   fixed binary hash tree. `header_proof` exposes the four sibling
//!   digests the external verifier needs to recompute that fold.

pub mod domain;

pub use domain::*;
