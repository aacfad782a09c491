//! Deposit proposals and their canonical content hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{Address, Amount, Hash, Identity};

use xl_01_state_tree::domain::encoding::write_uvarint;

/// One approver and its voting weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    pub identity: Identity,
    pub weight: u32,
}

/// One incoming transfer observed on the external chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInput {
    pub from_addr: Address,
    pub value: Amount,
}

/// Every incoming transfer of one external block, proposed as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub block_number: u64,
    pub inputs: Vec<DepositInput>,
}

impl Proposal {
    /// Non-empty inputs with in-range, non-zero values.
    pub fn validate(&self) -> bool {
        !self.inputs.is_empty() && self.inputs.iter().all(|input| !input.value.is_zero())
    }

    /// Order inputs by address then value, so hash equality means
    /// content equality regardless of observation order.
    pub fn sort(&mut self) {
        self.inputs
            .sort_by(|a, b| (a.from_addr.0, a.value).cmp(&(b.from_addr.0, b.value)));
    }

    /// Canonical content hash. Sorts first.
    pub fn hash(&mut self) -> Hash {
        self.sort();
        let mut pre = Vec::with_capacity(16 + self.inputs.len() * 52);
        write_uvarint(&mut pre, self.block_number);
        write_uvarint(&mut pre, self.inputs.len() as u64);
        for input in &self.inputs {
            pre.extend_from_slice(input.from_addr.as_bytes());
            pre.extend_from_slice(&input.value.to_be_bytes());
        }
        Sha256::digest(&pre).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(addr_byte: u8, value: u64) -> DepositInput {
        DepositInput {
            from_addr: Address([addr_byte; 20]),
            value: Amount::from(value),
        }
    }

    #[test]
    fn test_hash_ignores_input_order() {
        let mut a = Proposal {
            block_number: 7,
            inputs: vec![input(1, 10), input(2, 20)],
        };
        let mut b = Proposal {
            block_number: 7,
            inputs: vec![input(2, 20), input(1, 10)],
        };
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_hash_binds_block_number_and_content() {
        let mut a = Proposal {
            block_number: 7,
            inputs: vec![input(1, 10)],
        };
        let mut b = Proposal {
            block_number: 8,
            inputs: vec![input(1, 10)],
        };
        let mut c = Proposal {
            block_number: 7,
            inputs: vec![input(1, 11)],
        };
        assert_ne!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn test_validate_rejects_empty_and_zero() {
        let empty = Proposal {
            block_number: 1,
            inputs: vec![],
        };
        assert!(!empty.validate());

        let zero = Proposal {
            block_number: 1,
            inputs: vec![input(1, 0)],
        };
        assert!(!zero.validate());

        let ok = Proposal {
            block_number: 1,
            inputs: vec![input(1, 1)],
        };
        assert!(ok.validate());
    }
}
