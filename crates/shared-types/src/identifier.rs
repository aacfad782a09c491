//! Account identifier union.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Address, Identity};

/// Either side of an account's identity: the chain-local [`Identity`] or
/// an external [`Address`]. Most subsystem operations accept an
/// `Identifier` and normalize it to the bound [`Identity`] when one
/// exists.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Identifier {
    Id(Identity),
    Addr(Address),
}

impl Identifier {
    /// Canonical byte form used when building tree keys: a one-byte tag
    /// followed by the 20 raw bytes.
    pub fn to_key_bytes(&self) -> [u8; 21] {
        let mut out = [0u8; 21];
        match self {
            Identifier::Id(id) => {
                out[0] = 0x01;
                out[1..].copy_from_slice(id.as_bytes());
            }
            Identifier::Addr(addr) => {
                out[0] = 0x02;
                out[1..].copy_from_slice(addr.as_bytes());
            }
        }
        out
    }

    pub fn as_identity(&self) -> Option<&Identity> {
        match self {
            Identifier::Id(id) => Some(id),
            Identifier::Addr(_) => None,
        }
    }

    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Identifier::Id(_) => None,
            Identifier::Addr(addr) => Some(addr),
        }
    }
}

impl From<Identity> for Identifier {
    fn from(id: Identity) -> Self {
        Identifier::Id(id)
    }
}

impl From<Address> for Identifier {
    fn from(addr: Address) -> Self {
        Identifier::Addr(addr)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{}", id),
            Identifier::Addr(addr) => write!(f, "{}", addr),
        }
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{:?}", id),
            Identifier::Addr(addr) => write!(f, "{:?}", addr),
        }
    }
}
