//! # CrossLedger Test Suite
//!
//! Unified test crate containing cross-subsystem integration flows:
//! blocks driven through the application exactly as the consensus
//! engine drives them, then inspected through the query surface.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Keys, signing, and envelope fixtures
//! └── integration/      # Cross-subsystem choreography
//!     ├── account_flows.rs
//!     ├── deposit_flows.rs
//!     ├── htlc_flows.rs
//!     ├── withdraw_proofs.rs
//!     └── bridge_relay.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p xl-tests
//!
//! # By flow
//! cargo test -p xl-tests integration::htlc_flows::
//! ```

pub mod integration;

#[cfg(test)]
pub(crate) mod support;
