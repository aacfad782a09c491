//! # xl-03-deposit
//!
//! Weighted multisig deposits: external chain events enter the ledger
//! only after a supermajority of approvers concurs on exact content.
//!
//! ## Role in System
//!
//! - **Proposals**: each proposal describes every incoming transfer
//!   observed in one external block; its canonical content hash is the
//!   unit approvers vote on.
//! - **Quorum**: a proposal executes when its accumulated approver
//!   weight strictly exceeds two thirds of the total weight.
//! - **At-most-once**: one execution per external block number, ever;
//!   competing proposals for the same block number die once any of them
//!   executes.

pub mod domain;

pub use domain::*;
