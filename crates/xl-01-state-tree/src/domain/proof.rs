//! Path proofs and their contract-consumable byte encoding.

use sha2::{Digest, Sha256};
use shared_types::Hash;
use std::sync::Arc;

use crate::domain::encoding::{read_bytes, read_uvarint, read_varint, write_bytes, write_varint};
use crate::domain::errors::TreeError;
use crate::domain::node::{hash_inner, hash_leaf, Node, NodeKind};

/// One inner node along the proof path, described by its structural
/// fields and the hash of the child not on the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofInnerNode {
    pub height: i8,
    pub size: u64,
    pub version: u64,
    pub sibling: Hash,
    /// True when the sibling is the left child, i.e. the proven leaf
    /// sits in the right subtree of this node.
    pub sibling_is_left: bool,
}

/// A membership proof for one key: the leaf plus the inner nodes from
/// root to leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathProof {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub leaf_version: u64,
    /// Root-to-leaf order.
    pub path: Vec<ProofInnerNode>,
}

impl PathProof {
    /// Build a proof for `key` from a saved root. Returns `None` when
    /// the key is absent.
    pub fn construct(root: &Arc<Node>, key: &[u8]) -> Option<PathProof> {
        let mut path = Vec::new();
        let mut node = root;
        loop {
            match &node.kind {
                NodeKind::Leaf { value } => {
                    if node.key != key {
                        return None;
                    }
                    return Some(PathProof {
                        key: key.to_vec(),
                        value: value.clone(),
                        leaf_version: node.version,
                        path,
                    });
                }
                NodeKind::Inner { left, right } => {
                    let go_left = key < node.key.as_slice();
                    let (next, sibling) = if go_left { (left, right) } else { (right, left) };
                    path.push(ProofInnerNode {
                        height: node.height,
                        size: node.size,
                        version: node.version,
                        sibling: sibling.hash,
                        sibling_is_left: !go_left,
                    });
                    node = next;
                }
            }
        }
    }

    /// Replay the path from the leaf hash upward. The caller compares
    /// the result against the independently-known root.
    pub fn compute_root_hash(&self) -> Hash {
        let mut hash = hash_leaf(&self.key, &self.value, self.leaf_version);
        for inner in self.path.iter().rev() {
            hash = if inner.sibling_is_left {
                hash_inner(inner.height, inner.size, inner.version, &inner.sibling, &hash)
            } else {
                hash_inner(inner.height, inner.size, inner.version, &hash, &inner.sibling)
            };
        }
        hash
    }

    /// The byte-stable encoding consumed by the external verifier. The
    /// layout is fixed: reserved version byte, one byte of leaf-version
    /// varint length plus that varint, the length-prefixed leaf value,
    /// one byte of path length, then per inner node (root to leaf) one
    /// byte `orientation | prefix_len` (top bit set when the sibling is
    /// the left child), the structural prefix varints and the 32-byte
    /// sibling digest.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(0); // reserved proof version

        let mut scratch = Vec::new();
        write_varint(&mut scratch, self.leaf_version as i64);
        out.push(scratch.len() as u8);
        out.extend_from_slice(&scratch);

        write_bytes(&mut out, &self.value);

        out.push(self.path.len() as u8);
        for inner in &self.path {
            scratch.clear();
            write_varint(&mut scratch, i64::from(inner.height));
            write_varint(&mut scratch, inner.size as i64);
            write_varint(&mut scratch, inner.version as i64);
            let mut prefix_len_and_order = scratch.len() as u8 & 0x7f;
            if inner.sibling_is_left {
                prefix_len_and_order |= 0x80;
            }
            out.push(prefix_len_and_order);
            out.extend_from_slice(&scratch);
            out.extend_from_slice(&inner.sibling);
        }
        out
    }

    /// Decode the contract encoding back into a structured proof. The
    /// key is not part of the bytes; the verifier supplies it.
    pub fn from_bytes(bytes: &[u8], key: &[u8]) -> Result<PathProof, TreeError> {
        let mut pos = 0usize;
        let reserved = *bytes.get(pos).ok_or(TreeError::CorruptProof)?;
        pos += 1;
        if reserved != 0 {
            return Err(TreeError::CorruptProof);
        }

        let version_len = *bytes.get(pos).ok_or(TreeError::CorruptProof)? as usize;
        pos += 1;
        if pos + version_len > bytes.len() {
            return Err(TreeError::CorruptProof);
        }
        let mut vpos = pos;
        let leaf_version = read_varint(bytes, &mut vpos)?;
        if vpos != pos + version_len || leaf_version < 0 {
            return Err(TreeError::CorruptProof);
        }
        pos += version_len;

        let value = read_bytes(bytes, &mut pos)?.to_vec();

        let path_len = *bytes.get(pos).ok_or(TreeError::CorruptProof)? as usize;
        pos += 1;
        let mut path = Vec::with_capacity(path_len);
        for _ in 0..path_len {
            let prefix_len_and_order = *bytes.get(pos).ok_or(TreeError::CorruptProof)?;
            pos += 1;
            let sibling_is_left = prefix_len_and_order & 0x80 != 0;
            let prefix_len = (prefix_len_and_order & 0x7f) as usize;
            if pos + prefix_len + 32 > bytes.len() {
                return Err(TreeError::CorruptProof);
            }
            let prefix_end = pos + prefix_len;
            let height = read_varint(bytes, &mut pos)?;
            let size = read_varint(bytes, &mut pos)?;
            let version = read_varint(bytes, &mut pos)?;
            if pos != prefix_end || size < 0 || version < 0 {
                return Err(TreeError::CorruptProof);
            }
            let height = i8::try_from(height).map_err(|_| TreeError::CorruptProof)?;
            let mut sibling = [0u8; 32];
            sibling.copy_from_slice(&bytes[pos..pos + 32]);
            pos += 32;
            path.push(ProofInnerNode {
                height,
                size: size as u64,
                version: version as u64,
                sibling,
                sibling_is_left,
            });
        }
        if pos != bytes.len() {
            return Err(TreeError::CorruptProof);
        }
        Ok(PathProof {
            key: key.to_vec(),
            value,
            leaf_version: leaf_version as u64,
            path,
        })
    }

    /// Full verification: decode, replay and compare against a root.
    pub fn verify(bytes: &[u8], key: &[u8], expected_root: &Hash) -> Result<PathProof, TreeError> {
        let proof = PathProof::from_bytes(bytes, key)?;
        let computed = proof.compute_root_hash();
        if &computed != expected_root {
            return Err(TreeError::RootMismatch {
                expected: hex::encode(expected_root),
                computed: hex::encode(computed),
            });
        }
        Ok(proof)
    }
}

/// Hash a key/value pair the way leaf records are committed, without
/// the tree context. Used by callers that commit record digests.
pub fn kv_pair_hash(key: &[u8], value: &[u8]) -> Hash {
    let mut pre = Vec::with_capacity(key.len() + value.len() + 10);
    write_bytes(&mut pre, key);
    write_bytes(&mut pre, value);
    Sha256::digest(&pre).into()
}
