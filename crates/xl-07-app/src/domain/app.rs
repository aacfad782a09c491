//! The consensus-driven application.

use shared_types::{BlockTime, Hash};
use tracing::debug;
use xl_01_state_tree::StateStore;
use xl_06_tx_pipeline::{decode_tx, set_tx_status, tx_hash, TxResult, TxStatus};

use crate::domain::config::AppConfig;
use crate::domain::errors::AppError;
use crate::domain::genesis::{apply_genesis, parse_genesis};
use crate::domain::query::{handle_query, QueryRequest, QueryResponse};

/// Envelope bytes the codec cannot decode at all.
fn unparsable() -> TxResult {
    TxResult {
        code: 1,
        info: "Cannot parse transaction",
        status: TxStatus::Fail,
        advances_nonce: false,
        data: None,
        tags: Vec::new(),
    }
}

/// The application state machine. The consensus engine owns the call
/// order: `init_chain` once, then per block `begin_block`, any number
/// of `deliver_tx`, `commit`. `check_tx` and `query` may interleave at
/// any point and never mutate.
pub struct Application {
    store: StateStore,
}

impl Application {
    pub fn new(config: &AppConfig) -> Application {
        Application {
            store: StateStore::new(config.keep_versions),
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Seed accounts and approvers. The writes land in the working
    /// version and become visible to queries at the first commit.
    pub fn init_chain(&mut self, genesis_json: &str) -> Result<(), AppError> {
        let genesis = parse_genesis(genesis_json)?;
        apply_genesis(&mut self.store.working(), &genesis)
    }

    pub fn begin_block(&mut self, block_hash: Hash, block_time: BlockTime) {
        self.store.begin_block(block_hash, block_time);
    }

    /// Mempool admission: full validation against the latest committed
    /// version, without effects. An `Err` is corrupted state; the host
    /// must halt the node.
    pub fn check_tx(&self, raw: &[u8]) -> Result<TxResult, AppError> {
        let tx = match decode_tx(raw) {
            Ok(tx) => tx,
            Err(e) => {
                debug!("[xl-07] Rejected unparsable transaction: {e}");
                return Ok(unparsable());
            }
        };
        Ok(tx.check(&self.store.snapshot())?)
    }

    /// Execute one transaction against the working version and record
    /// its status under its hash. An `Err` is corrupted state; the host
    /// must halt the node instead of committing the block.
    pub fn deliver_tx(&mut self, raw: &[u8]) -> Result<TxResult, AppError> {
        let hash = tx_hash(raw);
        let tx = match decode_tx(raw) {
            Ok(tx) => tx,
            Err(e) => {
                debug!("[xl-07] Undeliverable transaction: {e}");
                return Ok(unparsable());
            }
        };
        let mut state = self.store.working();
        let res = tx.deliver(&mut state, &hash)?;
        set_tx_status(&mut state, &hash, res.status);
        if !res.is_success() {
            debug!(
                "[xl-07] Tx 0x{} failed with code {}: {}",
                hex::encode(hash),
                res.code,
                res.info
            );
        }
        Ok(res)
    }

    /// Freeze the block and return the app hash for the next header.
    pub fn commit(&mut self) -> [u8; 40] {
        self.store.commit()
    }

    pub fn query(&self, req: &QueryRequest) -> QueryResponse {
        handle_query(&self.store, req)
    }
}
