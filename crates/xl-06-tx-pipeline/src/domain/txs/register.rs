//! Account registration.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared_types::{Address, Hash};
use tracing::info;
use xl_01_state_tree::{ReadState, WriteState};
use xl_02_accounts::{is_address_registered, register};

use crate::domain::result::TxResult;
use crate::domain::signature::{personal_message_hash, recover_address, TxSignature};
use crate::domain::txs::{fatal, StateCorruption};

/// Binds a fresh chain-local identity to an external address. Carries
/// no nonce: the address itself can register at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTx {
    pub addr: Address,
    pub sig: TxSignature,
}

impl RegisterTx {
    pub fn signing_digest(&self) -> Hash {
        let payload = json!({ "addr": self.addr.to_string() });
        personal_message_hash(payload.to_string().as_bytes())
    }

    fn check_inner(&self, state: &impl ReadState) -> Result<(), TxResult> {
        // The signer must be the address being registered.
        match recover_address(&self.signing_digest(), &self.sig) {
            Ok(addr) if addr == self.addr => {}
            _ => return Err(TxResult::register_invalid_signature()),
        }
        if is_address_registered(state, &self.addr) {
            return Err(TxResult::register_duplicated());
        }
        Ok(())
    }

    pub fn check(&self, state: &impl ReadState) -> Result<TxResult, StateCorruption> {
        Ok(match self.check_inner(state) {
            Ok(()) => TxResult::success(),
            Err(res) => res,
        })
    }

    pub fn deliver(&self, state: &mut impl WriteState) -> Result<TxResult, StateCorruption> {
        if let Err(res) = self.check_inner(state) {
            return Ok(res);
        }
        let id = fatal(register(state, &self.addr))?;
        info!("[xl-06] Registered {} as {}", self.addr, id);
        Ok(TxResult::success().with_data(id.as_bytes().to_vec()))
    }
}
