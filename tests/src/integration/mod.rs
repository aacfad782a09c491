//! Cross-subsystem flows driven through the application the way the
//! consensus engine drives it: begin_block, deliver, commit, query.

pub mod account_flows;
pub mod bridge_relay;
pub mod deposit_flows;
pub mod htlc_flows;
pub mod withdraw_proofs;
