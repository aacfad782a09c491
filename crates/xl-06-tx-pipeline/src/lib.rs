//! # xl-06-tx-pipeline
//!
//! The transaction envelope, signature recovery and the two-phase
//! validate/execute pipeline for all seven transaction kinds.
//!
//! ## Role in System
//!
//! - **Two-phase execution**: `check` runs every precondition against a
//!   read-only view; `deliver` re-runs them against the working state
//!   and applies effects. A failure at deliver time still consumes the
//!   sender's nonce when the failure class proves the sender authorized
//!   a well-formed transaction, so a stale or losing transaction cannot
//!   be replayed.
//! - **Determinism**: signing payloads are canonical JSON with sorted
//!   keys, and the recovered signer must be an address bound to the
//!   claimed sender. Every replica reaches the same verdict from the
//!   same bytes.

pub mod domain;

pub use domain::*;
