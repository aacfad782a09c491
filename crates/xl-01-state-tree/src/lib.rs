//! # xl-01-state-tree
//!
//! Versioned authenticated state tree for CrossLedger.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: every durable record of the ledger lives
//!   in one of two trees — the *ledger tree* (accounts and auxiliary
//!   records) and the *withdrawal tree* (append-only withdrawal
//!   receipts).
//! - **Versioned snapshots**: each commit freezes an immutable version of
//!   both trees; the retention window bounds how many old versions stay
//!   queryable before garbage collection discards them.
//! - **Path proofs**: any key of a retained version can be proven against
//!   that version's root in a byte-stable format an external contract
//!   can verify.
//!
//! ## Read/Write Split
//!
//! Validation runs against [`Snapshot`] (read-only, latest committed
//! version) while execution runs against [`WorkingState`] (the mutable
//! in-progress version). The split is enforced by the [`ReadState`] and
//! [`WriteState`] traits, so validation code cannot mutate by
//! construction.

pub mod domain;

pub use domain::*;
