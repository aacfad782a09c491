//! Immutable balanced-tree nodes.
//!
//! The tree is an AVL+ variant: values live only in leaves, inner nodes
//! carry the smallest key of their right subtree for navigation. Nodes
//! are immutable and shared between versions through `Arc`; an update
//! rebuilds only the path from the touched leaf to the root, stamping the
//! rebuilt nodes with the working version.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use shared_types::Hash;

use crate::domain::encoding::{write_bytes, write_varint};

/// Root hash of an empty tree.
pub const EMPTY_ROOT: Hash = [0u8; 32];

#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf { value: Vec<u8> },
    Inner { left: Arc<Node>, right: Arc<Node> },
}

/// A single immutable node. The hash is computed at construction and
/// never recomputed.
#[derive(Debug, Clone)]
pub struct Node {
    pub height: i8,
    pub size: u64,
    pub version: u64,
    /// For a leaf, the record key. For an inner node, the smallest key in
    /// the right subtree; lookups descend left when the probe key sorts
    /// strictly before it.
    pub key: Vec<u8>,
    pub kind: NodeKind,
    pub hash: Hash,
}

impl Node {
    pub fn leaf(key: Vec<u8>, value: Vec<u8>, version: u64) -> Arc<Node> {
        let hash = hash_leaf(&key, &value, version);
        Arc::new(Node {
            height: 0,
            size: 1,
            version,
            key,
            kind: NodeKind::Leaf { value },
            hash,
        })
    }

    pub fn inner(left: Arc<Node>, right: Arc<Node>, version: u64) -> Arc<Node> {
        let height = 1 + left.height.max(right.height);
        let size = left.size + right.size;
        let key = leftmost_key(&right).to_vec();
        let hash = hash_inner(height, size, version, &left.hash, &right.hash);
        Arc::new(Node {
            height,
            size,
            version,
            key,
            kind: NodeKind::Inner { left, right },
            hash,
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    fn balance_factor(&self) -> i8 {
        match &self.kind {
            NodeKind::Leaf { .. } => 0,
            NodeKind::Inner { left, right } => left.height - right.height,
        }
    }
}

fn leftmost_key(node: &Node) -> &[u8] {
    match &node.kind {
        NodeKind::Leaf { .. } => &node.key,
        NodeKind::Inner { left, .. } => leftmost_key(left),
    }
}

/// Leaf hash preimage: height 0, size 1, version, key bytes, and the
/// hash of the value (never the value itself).
pub fn hash_leaf(key: &[u8], value: &[u8], version: u64) -> Hash {
    let mut pre = Vec::with_capacity(key.len() + 48);
    write_varint(&mut pre, 0);
    write_varint(&mut pre, 1);
    write_varint(&mut pre, version as i64);
    write_bytes(&mut pre, key);
    let value_hash = Sha256::digest(value);
    write_bytes(&mut pre, &value_hash);
    Sha256::digest(&pre).into()
}

/// Inner hash preimage: height, size, version and the two child hashes.
/// Keys do not enter inner hashes.
pub fn hash_inner(height: i8, size: u64, version: u64, left: &Hash, right: &Hash) -> Hash {
    let mut pre = Vec::with_capacity(80);
    write_varint(&mut pre, i64::from(height));
    write_varint(&mut pre, size as i64);
    write_varint(&mut pre, version as i64);
    write_bytes(&mut pre, left);
    write_bytes(&mut pre, right);
    Sha256::digest(&pre).into()
}

/// Look up `key` in the subtree rooted at `node`.
pub fn get<'a>(node: &'a Node, key: &[u8]) -> Option<&'a [u8]> {
    match &node.kind {
        NodeKind::Leaf { value } => {
            if node.key == key {
                Some(value)
            } else {
                None
            }
        }
        NodeKind::Inner { left, right } => {
            if key < node.key.as_slice() {
                get(left, key)
            } else {
                get(right, key)
            }
        }
    }
}

/// Insert or replace `key`, returning the new root. Rebuilt nodes carry
/// `version`.
pub fn set(node: &Arc<Node>, key: &[u8], value: Vec<u8>, version: u64) -> Arc<Node> {
    match &node.kind {
        NodeKind::Leaf { .. } => {
            use std::cmp::Ordering;
            match key.cmp(node.key.as_slice()) {
                Ordering::Equal => Node::leaf(key.to_vec(), value, version),
                Ordering::Less => {
                    let new = Node::leaf(key.to_vec(), value, version);
                    Node::inner(new, Arc::clone(node), version)
                }
                Ordering::Greater => {
                    let new = Node::leaf(key.to_vec(), value, version);
                    Node::inner(Arc::clone(node), new, version)
                }
            }
        }
        NodeKind::Inner { left, right } => {
            let rebuilt = if key < node.key.as_slice() {
                let new_left = set(left, key, value, version);
                Node::inner(new_left, Arc::clone(right), version)
            } else {
                let new_right = set(right, key, value, version);
                Node::inner(Arc::clone(left), new_right, version)
            };
            balance(rebuilt, version)
        }
    }
}

/// Remove `key`. Returns the new root (None when the tree empties) and
/// whether the key was present. Inner nodes rebuilt on the way up
/// recompute their navigation key, so a deleted leftmost leaf cannot
/// leave a stale key behind.
pub fn remove(node: &Arc<Node>, key: &[u8], version: u64) -> (Option<Arc<Node>>, bool) {
    match &node.kind {
        NodeKind::Leaf { .. } => {
            if node.key == key {
                (None, true)
            } else {
                (Some(Arc::clone(node)), false)
            }
        }
        NodeKind::Inner { left, right } => {
            if key < node.key.as_slice() {
                let (new_left, found) = remove(left, key, version);
                if !found {
                    return (Some(Arc::clone(node)), false);
                }
                match new_left {
                    None => (Some(Arc::clone(right)), true),
                    Some(l) => {
                        let rebuilt = Node::inner(l, Arc::clone(right), version);
                        (Some(balance(rebuilt, version)), true)
                    }
                }
            } else {
                let (new_right, found) = remove(right, key, version);
                if !found {
                    return (Some(Arc::clone(node)), false);
                }
                match new_right {
                    None => (Some(Arc::clone(left)), true),
                    Some(r) => {
                        let rebuilt = Node::inner(Arc::clone(left), r, version);
                        (Some(balance(rebuilt, version)), true)
                    }
                }
            }
        }
    }
}

/// In-order traversal over `[start, end)`. The callback returns `true`
/// to stop early; the function reports whether traversal was stopped.
pub fn range(
    node: &Node,
    start: Option<&[u8]>,
    end: Option<&[u8]>,
    f: &mut dyn FnMut(&[u8], &[u8]) -> bool,
) -> bool {
    match &node.kind {
        NodeKind::Leaf { value } => {
            if let Some(s) = start {
                if node.key.as_slice() < s {
                    return false;
                }
            }
            if let Some(e) = end {
                if node.key.as_slice() >= e {
                    return false;
                }
            }
            f(&node.key, value)
        }
        NodeKind::Inner { left, right } => {
            let descend_left = match start {
                Some(s) => s < node.key.as_slice(),
                None => true,
            };
            let descend_right = match end {
                Some(e) => e > node.key.as_slice(),
                None => true,
            };
            if descend_left && range(left, start, end, f) {
                return true;
            }
            if descend_right && range(right, start, end, f) {
                return true;
            }
            false
        }
    }
}

fn balance(node: Arc<Node>, version: u64) -> Arc<Node> {
    let bf = node.balance_factor();
    if bf > 1 {
        let (left, right) = children(&node);
        if left.balance_factor() >= 0 {
            rotate_right(&node, version)
        } else {
            let new_left = rotate_left(&left, version);
            let rebuilt = Node::inner(new_left, right, version);
            rotate_right(&rebuilt, version)
        }
    } else if bf < -1 {
        let (left, right) = children(&node);
        if right.balance_factor() <= 0 {
            rotate_left(&node, version)
        } else {
            let new_right = rotate_right(&right, version);
            let rebuilt = Node::inner(left, new_right, version);
            rotate_left(&rebuilt, version)
        }
    } else {
        node
    }
}

fn children(node: &Node) -> (Arc<Node>, Arc<Node>) {
    match &node.kind {
        NodeKind::Inner { left, right } => (Arc::clone(left), Arc::clone(right)),
        NodeKind::Leaf { .. } => unreachable!("rotation on a leaf"),
    }
}

fn rotate_right(node: &Node, version: u64) -> Arc<Node> {
    let (left, right) = children(node);
    let (ll, lr) = children(&left);
    let new_right = Node::inner(lr, right, version);
    Node::inner(ll, new_right, version)
}

fn rotate_left(node: &Node, version: u64) -> Arc<Node> {
    let (left, right) = children(node);
    let (rl, rr) = children(&right);
    let new_left = Node::inner(left, rl, version);
    Node::inner(new_left, rr, version)
}
