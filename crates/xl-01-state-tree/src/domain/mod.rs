pub mod encoding;
pub mod errors;
pub mod node;
pub mod proof;
pub mod store;
pub mod tree;

pub use errors::TreeError;
pub use node::{Node, EMPTY_ROOT};
pub use proof::{kv_pair_hash, PathProof, ProofInnerNode};
pub use store::{ReadState, Snapshot, StateStore, TreeMetadata, WorkingState, WriteState};
pub use tree::{TreeRef, VersionedTree};
