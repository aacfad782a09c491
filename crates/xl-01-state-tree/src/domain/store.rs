//! Two-tree state store: ledger records plus withdrawal receipts.
//!
//! The store owns both versioned trees, the block metadata of the block
//! being built, and the per-height version map used by queries and
//! proof construction. `commit` is the only place versions advance and
//! old versions are garbage collected.

use std::collections::BTreeMap;

use shared_types::{BlockTime, Hash};
use tracing::{debug, info};

use crate::domain::errors::TreeError;
use crate::domain::proof::PathProof;
use crate::domain::tree::{TreeRef, VersionedTree};

/// Tree versions frozen by the commit of one height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeMetadata {
    pub ledger_version: u64,
    pub withdraw_version: u64,
}

/// Read-only access to ledger state plus the block context. Validation
/// runs entirely against this trait, so it cannot mutate.
pub trait ReadState {
    fn ledger_get(&self, key: &[u8]) -> Option<Vec<u8>>;
    /// In-order scan over `[start, end)`; the callback returns `true`
    /// to stop early.
    fn ledger_range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        f: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    );
    fn withdraw_get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn block_hash(&self) -> Hash;
    fn block_time(&self) -> BlockTime;
    fn height(&self) -> u64;
}

/// Mutable access for execution. Every writer is also a reader.
pub trait WriteState: ReadState {
    fn ledger_set(&mut self, key: &[u8], value: Vec<u8>);
    fn ledger_remove(&mut self, key: &[u8]) -> bool;
    fn withdraw_set(&mut self, key: &[u8], value: Vec<u8>);
}

/// A detached view of the latest committed version. Cheap to create:
/// it clones two `Arc` roots, not the trees.
#[derive(Debug, Clone)]
pub struct Snapshot {
    ledger: TreeRef,
    withdraw: TreeRef,
    block_hash: Hash,
    block_time: BlockTime,
    height: u64,
}

impl ReadState for Snapshot {
    fn ledger_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.ledger
            .as_ref()
            .and_then(|root| crate::domain::node::get(root, key).map(<[u8]>::to_vec))
    }

    fn ledger_range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        f: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) {
        if let Some(root) = &self.ledger {
            crate::domain::node::range(root, start, end, f);
        }
    }

    fn withdraw_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.withdraw
            .as_ref()
            .and_then(|root| crate::domain::node::get(root, key).map(<[u8]>::to_vec))
    }

    fn block_hash(&self) -> Hash {
        self.block_hash
    }

    fn block_time(&self) -> BlockTime {
        self.block_time
    }

    fn height(&self) -> u64 {
        self.height
    }
}

/// The mutable in-progress version of both trees.
pub struct WorkingState<'a> {
    store: &'a mut StateStore,
}

impl ReadState for WorkingState<'_> {
    fn ledger_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.ledger.get(key)
    }

    fn ledger_range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        f: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) {
        self.store.ledger.range(start, end, f);
    }

    fn withdraw_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.withdraw.get(key)
    }

    fn block_hash(&self) -> Hash {
        self.store.block_hash
    }

    fn block_time(&self) -> BlockTime {
        self.store.block_time
    }

    fn height(&self) -> u64 {
        self.store.height
    }
}

impl WriteState for WorkingState<'_> {
    fn ledger_set(&mut self, key: &[u8], value: Vec<u8>) {
        self.store.ledger.set(key, value);
    }

    fn ledger_remove(&mut self, key: &[u8]) -> bool {
        self.store.ledger.remove(key)
    }

    fn withdraw_set(&mut self, key: &[u8], value: Vec<u8>) {
        self.store.withdraw.set(key, value);
    }
}

/// Owner of all durable ledger state.
#[derive(Debug)]
pub struct StateStore {
    ledger: VersionedTree,
    withdraw: VersionedTree,
    height: u64,
    block_hash: Hash,
    block_time: BlockTime,
    metadata: BTreeMap<u64, TreeMetadata>,
    /// Number of committed versions kept for queries and proofs. Zero
    /// disables garbage collection.
    keep_versions: u64,
}

impl StateStore {
    pub fn new(keep_versions: u64) -> Self {
        StateStore {
            ledger: VersionedTree::new(),
            withdraw: VersionedTree::new(),
            height: 0,
            block_hash: [0u8; 32],
            block_time: 0,
            metadata: BTreeMap::new(),
            keep_versions,
        }
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn block_time(&self) -> BlockTime {
        self.block_time
    }

    /// Record the consensus-provided context of the block about to be
    /// executed.
    pub fn begin_block(&mut self, block_hash: Hash, block_time: BlockTime) {
        self.block_hash = block_hash;
        self.block_time = block_time;
        debug!(
            "[xl-01] Begin block height={} time={}",
            self.height + 1,
            block_time
        );
    }

    /// Read-only view of the latest committed version, carrying the
    /// current block context.
    pub fn snapshot(&self) -> Snapshot {
        let (ledger, withdraw) = match self.metadata.get(&self.height) {
            Some(meta) => (
                self.ledger
                    .version_root(meta.ledger_version)
                    .cloned()
                    .unwrap_or(None),
                self.withdraw
                    .version_root(meta.withdraw_version)
                    .cloned()
                    .unwrap_or(None),
            ),
            None => (None, None),
        };
        Snapshot {
            ledger,
            withdraw,
            block_hash: self.block_hash,
            block_time: self.block_time,
            height: self.height,
        }
    }

    /// Mutable handle over the in-progress version.
    pub fn working(&mut self) -> WorkingState<'_> {
        WorkingState { store: self }
    }

    /// Freeze both trees, advance the height, prune versions that fell
    /// out of the retention window and return the 40-byte app hash:
    /// the first 20 bytes of the withdrawal root followed by the first
    /// 20 bytes of the ledger root.
    pub fn commit(&mut self) -> [u8; 40] {
        let (ledger_root, ledger_version) = self.ledger.save_version();
        let (withdraw_root, withdraw_version) = self.withdraw.save_version();
        self.height += 1;
        self.metadata.insert(
            self.height,
            TreeMetadata {
                ledger_version,
                withdraw_version,
            },
        );

        if self.keep_versions > 0 && self.height > self.keep_versions {
            let floor_height = self.height - self.keep_versions;
            let stale: Vec<u64> = self
                .metadata
                .range(..floor_height)
                .map(|(h, _)| *h)
                .collect();
            if let Some((_, &meta)) = self.metadata.range(floor_height..).next() {
                let dropped_l = self.ledger.delete_versions_below(meta.ledger_version);
                let dropped_w = self.withdraw.delete_versions_below(meta.withdraw_version);
                if dropped_l + dropped_w > 0 {
                    debug!(
                        "[xl-01] Pruned {} ledger and {} withdraw versions below height {}",
                        dropped_l, dropped_w, floor_height
                    );
                }
            }
            for h in stale {
                self.metadata.remove(&h);
            }
        }

        let mut app_hash = [0u8; 40];
        app_hash[..20].copy_from_slice(&withdraw_root[..20]);
        app_hash[20..].copy_from_slice(&ledger_root[..20]);
        info!(
            "[xl-01] Committed height={} app_hash={}",
            self.height,
            hex::encode(app_hash)
        );
        app_hash
    }

    /// Root hashes frozen at `height`.
    pub fn roots_at(&self, height: u64) -> Result<(Hash, Hash), TreeError> {
        let meta = self.metadata_at(height)?;
        let ledger = root_hash(self.ledger.version_root(meta.ledger_version)?);
        let withdraw = root_hash(self.withdraw.version_root(meta.withdraw_version)?);
        Ok((ledger, withdraw))
    }

    pub fn metadata_at(&self, height: u64) -> Result<TreeMetadata, TreeError> {
        self.metadata
            .get(&height)
            .copied()
            .ok_or(TreeError::VersionNotFound {
                version: height,
                oldest: self.metadata.keys().next().copied().unwrap_or(0),
            })
    }

    /// Membership proof in the withdrawal tree as of `height`. Pruned
    /// heights fail with `VersionNotFound`; an absent key with
    /// `KeyNotFound`.
    pub fn withdraw_proof_at(&self, height: u64, key: &[u8]) -> Result<PathProof, TreeError> {
        let meta = self.metadata_at(height)?;
        let root = self.withdraw.version_root(meta.withdraw_version)?;
        let root = root.as_ref().ok_or_else(|| TreeError::KeyNotFound {
            key_hex: hex::encode(key),
        })?;
        PathProof::construct(root, key).ok_or_else(|| TreeError::KeyNotFound {
            key_hex: hex::encode(key),
        })
    }
}

fn root_hash(root: &TreeRef) -> Hash {
    match root {
        None => crate::domain::node::EMPTY_ROOT,
        Some(node) => node.hash,
    }
}
