//! Chain-local account identifier.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::entities::ParseError;

/// The chain-local 20-byte account identifier, independent of any
/// external-chain address. Canonical text form is standard base64.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// Construct from a byte slice; fails unless exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() != 20 {
            return Err(ParseError::InvalidLength {
                expected: 20,
                actual: bytes.len(),
            });
        }
        let mut id = [0u8; 20];
        id.copy_from_slice(bytes);
        Ok(Identity(id))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", base64::engine::general_purpose::STANDARD.encode(self.0))
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self)
    }
}

impl FromStr for Identity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| ParseError::InvalidEncoding(e.to_string()))?;
        Identity::from_slice(&bytes)
    }
}
