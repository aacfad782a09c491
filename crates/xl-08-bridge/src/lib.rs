//! # xl-08-bridge
//!
//! Client-side plumbing for talking to external-chain endpoints: a
//! weighted endpoint pool that learns which nodes answer, a bounded
//! retry policy, and a submitter that serializes everything signed by
//! one identity.
//!
//! ## Role in System
//!
//! - **Endpoint pool**: each endpoint carries a reliability weight;
//!   successes double it, failures halve it, selection is weighted
//!   random. A flapping endpoint fades out instead of being banned.
//! - **Submission discipline**: one signing identity means one nonce
//!   sequence. The submitter hands out nonces under a lock, so two
//!   concurrent relays can never race each other into an invalid-nonce
//!   rejection.

pub mod domain;

pub use domain::*;
