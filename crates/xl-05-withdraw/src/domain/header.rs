//! Block header commitment tree.
//!
//! The header's thirteen fields hash into named leaves which combine
//! through a fixed binary tree:
//!
//! ```text
//! 13
//! 7 6
//! 4 3 3 3
//! 2 2 2 1 2 1 2 1
//! ```
//!
//! The external verifier receives only the app-hash leaf and four
//! sibling digests and refolds them left to right; both sides must
//! agree on this exact shape, so the split rule (first half gets the
//! extra leaf) is load-bearing.

use sha2::{Digest, Sha256};
use shared_types::{BlockTime, Hash};
use xl_01_state_tree::domain::encoding::{write_bytes, write_uvarint};
use xl_01_state_tree::kv_pair_hash;

/// The consensus-engine header fields entering the commitment.
#[derive(Debug, Clone, Default)]
pub struct BlockHeader {
    /// 40-byte app hash carrying both tree roots.
    pub app_hash: Vec<u8>,
    pub chain_id: String,
    pub consensus_hash: Vec<u8>,
    pub data_hash: Vec<u8>,
    pub evidence_hash: Vec<u8>,
    pub height: u64,
    pub last_block_id_hash: Vec<u8>,
    pub last_commit_hash: Vec<u8>,
    pub num_txs: u64,
    pub last_results_hash: Vec<u8>,
    pub time: BlockTime,
    pub total_txs: u64,
    pub validators_hash: Vec<u8>,
}

fn bytes_field_hash(b: &[u8]) -> Hash {
    if b.is_empty() {
        return Sha256::digest([]).into();
    }
    let mut pre = Vec::with_capacity(b.len() + 4);
    write_bytes(&mut pre, b);
    Sha256::digest(&pre).into()
}

fn int_field_hash(v: u64) -> Hash {
    if v == 0 {
        return Sha256::digest([]).into();
    }
    let mut pre = Vec::with_capacity(10);
    write_uvarint(&mut pre, v);
    Sha256::digest(&pre).into()
}

/// Hash of two child digests, each length prefixed.
fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut pre = Vec::with_capacity(68);
    write_bytes(&mut pre, left);
    write_bytes(&mut pre, right);
    Sha256::digest(&pre).into()
}

/// Recursive combine: the first half takes the extra element on odd
/// counts.
fn simple_hash_from_hashes(hashes: &[Hash]) -> Hash {
    match hashes.len() {
        0 => [0u8; 32],
        1 => hashes[0],
        n => {
            let split = (n + 1) / 2;
            let left = simple_hash_from_hashes(&hashes[..split]);
            let right = simple_hash_from_hashes(&hashes[split..]);
            hash_pair(&left, &right)
        }
    }
}

impl BlockHeader {
    /// The thirteen named leaves, in commitment order.
    fn leaves(&self) -> [Hash; 13] {
        [
            kv_pair_hash(b"App", &bytes_field_hash(&self.app_hash)),
            kv_pair_hash(b"ChainID", &bytes_field_hash(self.chain_id.as_bytes())),
            kv_pair_hash(b"Consensus", &bytes_field_hash(&self.consensus_hash)),
            kv_pair_hash(b"Data", &bytes_field_hash(&self.data_hash)),
            kv_pair_hash(b"Evidence", &bytes_field_hash(&self.evidence_hash)),
            kv_pair_hash(b"Height", &int_field_hash(self.height)),
            kv_pair_hash(b"LastBlockID", &bytes_field_hash(&self.last_block_id_hash)),
            kv_pair_hash(b"LastCommit", &bytes_field_hash(&self.last_commit_hash)),
            kv_pair_hash(b"NumTxs", &int_field_hash(self.num_txs)),
            kv_pair_hash(b"Results", &bytes_field_hash(&self.last_results_hash)),
            kv_pair_hash(b"Time", &int_field_hash(self.time)),
            kv_pair_hash(b"TotalTxs", &int_field_hash(self.total_txs)),
            kv_pair_hash(b"Validators", &bytes_field_hash(&self.validators_hash)),
        ]
    }

    /// The app-hash leaf, the starting point of the external refold.
    pub fn app_leaf(&self) -> Hash {
        self.leaves()[0]
    }
}

/// The block's externally visible commitment digest.
pub fn commitment_root(header: &BlockHeader) -> Hash {
    simple_hash_from_hashes(&header.leaves())
}

/// The four sibling digests that, folded against the app-hash leaf,
/// reproduce the commitment root.
pub fn header_proof(header: &BlockHeader) -> [Hash; 4] {
    let leaves = header.leaves();
    [
        leaves[1],
        simple_hash_from_hashes(&leaves[2..4]),
        simple_hash_from_hashes(&leaves[4..7]),
        simple_hash_from_hashes(&leaves[7..13]),
    ]
}

/// The verifier-side fold: combine the app-hash leaf with each sibling
/// in order.
pub fn root_from_app_leaf(app_leaf: &Hash, proof: &[Hash; 4]) -> Hash {
    let mut root = *app_leaf;
    for sibling in proof {
        root = hash_pair(&root, sibling);
    }
    root
}
