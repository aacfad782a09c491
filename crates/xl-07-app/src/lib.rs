//! # xl-07-app
//!
//! The application state machine as driven by the external consensus
//! engine: genesis, block lifecycle, transaction admission and
//! execution, commits and queries.
//!
//! ## Role in System
//!
//! - **Lifecycle**: `init_chain` seeds accounts and approvers from the
//!   genesis document, `begin_block` records the consensus-provided
//!   block context, `deliver_tx` executes, `commit` freezes both trees
//!   and returns the 40-byte app hash consensus embeds in the next
//!   header.
//! - **Queries**: read-only lookups over the latest committed version,
//!   plus withdrawal proofs against any retained height.

pub mod domain;

pub use domain::*;
