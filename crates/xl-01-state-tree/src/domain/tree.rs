//! Versioned tree: a working root plus a window of saved versions.

use std::collections::BTreeMap;
use std::sync::Arc;

use shared_types::Hash;

use crate::domain::errors::TreeError;
use crate::domain::node::{self, Node, EMPTY_ROOT};

/// A frozen root of one saved version. `None` is the empty tree.
pub type TreeRef = Option<Arc<Node>>;

/// One logical tree across versions. Mutations apply to the working
/// root; `save_version` freezes it and advances the version counter.
#[derive(Debug, Default)]
pub struct VersionedTree {
    working: TreeRef,
    /// Version the working root will be saved as.
    version: u64,
    saved: BTreeMap<u64, TreeRef>,
}

impl VersionedTree {
    pub fn new() -> Self {
        VersionedTree {
            working: None,
            version: 1,
            saved: BTreeMap::new(),
        }
    }

    /// The version the next `save_version` will produce.
    pub fn working_version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.working
            .as_ref()
            .and_then(|root| node::get(root, key).map(<[u8]>::to_vec))
    }

    pub fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.working = Some(match &self.working {
            None => Node::leaf(key.to_vec(), value, self.version),
            Some(root) => node::set(root, key, value, self.version),
        });
    }

    /// Remove `key` from the working root. Returns whether it existed.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        match &self.working {
            None => false,
            Some(root) => {
                let (new_root, found) = node::remove(root, key, self.version);
                if found {
                    self.working = new_root;
                }
                found
            }
        }
    }

    /// Iterate the working root over `[start, end)` in key order. The
    /// callback returns `true` to stop early.
    pub fn range(
        &self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        f: &mut dyn FnMut(&[u8], &[u8]) -> bool,
    ) {
        if let Some(root) = &self.working {
            node::range(root, start, end, f);
        }
    }

    pub fn working_hash(&self) -> Hash {
        match &self.working {
            None => EMPTY_ROOT,
            Some(root) => root.hash,
        }
    }

    /// Freeze the working root as the current version and start the
    /// next. Returns the frozen root hash and its version number.
    pub fn save_version(&mut self) -> (Hash, u64) {
        let saved_version = self.version;
        self.saved.insert(saved_version, self.working.clone());
        self.version += 1;
        // Re-stamp nothing: the working root carries over into the next
        // version unchanged until the first mutation rebuilds its path.
        (self.working_hash(), saved_version)
    }

    /// Root of a saved version.
    pub fn version_root(&self, version: u64) -> Result<&TreeRef, TreeError> {
        self.saved.get(&version).ok_or(TreeError::VersionNotFound {
            version,
            oldest: self.oldest_version().unwrap_or(self.version),
        })
    }

    pub fn get_versioned(&self, key: &[u8], version: u64) -> Result<Option<Vec<u8>>, TreeError> {
        let root = self.version_root(version)?;
        Ok(root
            .as_ref()
            .and_then(|r| node::get(r, key).map(<[u8]>::to_vec)))
    }

    pub fn oldest_version(&self) -> Option<u64> {
        self.saved.keys().next().copied()
    }

    /// Drop every saved version strictly below `floor`. Node memory is
    /// reclaimed once no retained root shares it.
    pub fn delete_versions_below(&mut self, floor: u64) -> usize {
        let keep = self.saved.split_off(&floor);
        let dropped = self.saved.len();
        self.saved = keep;
        dropped
    }
}
