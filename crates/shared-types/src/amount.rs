//! Bounded ledger amounts.

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors from [`Amount`] arithmetic and parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The result of an operation left the range `[0, 2^256)`.
    #[error("Amount out of range")]
    OutOfRange,

    /// The input was not a decimal integer.
    #[error("Invalid amount string: {0}")]
    InvalidString(String),
}

/// An arbitrary-precision non-negative integer bounded below 2^256.
///
/// Every balance, transfer value and fee on the ledger is an `Amount`.
/// Arithmetic never wraps: [`Amount::checked_add`] and
/// [`Amount::checked_sub`] return [`AmountError::OutOfRange`] when the
/// result would leave the representable range.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(pub U256);

impl Amount {
    pub fn zero() -> Self {
        Amount(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: Amount) -> Result<Amount, AmountError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(AmountError::OutOfRange)
    }

    pub fn checked_sub(&self, other: Amount) -> Result<Amount, AmountError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(AmountError::OutOfRange)
    }

    /// Parse a decimal string.
    pub fn from_dec_str(s: &str) -> Result<Amount, AmountError> {
        U256::from_dec_str(s)
            .map(Amount)
            .map_err(|e| AmountError::InvalidString(e.to_string()))
    }

    /// Big-endian 32-byte form, as packed into withdrawal records.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut buf = [0u8; 32];
        self.0.to_big_endian(&mut buf);
        buf
    }

    /// Reconstruct from the big-endian 32-byte form.
    pub fn from_be_bytes(bytes: &[u8]) -> Amount {
        Amount(U256::from_big_endian(bytes))
    }
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self {
        Amount(U256::from(v))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_dec_str(s)
    }
}

// In human-readable formats amounts are decimal strings so that values
// above 2^53 survive JSON round trips (deserialization additionally
// accepts plain integers for convenience in genesis files). Binary
// formats carry the fixed 32-byte big-endian form instead, since they
// cannot dispatch on value type.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.0.to_string())
        } else {
            serializer.serialize_bytes(&self.to_be_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string or non-negative integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                Amount::from_dec_str(v).map_err(de::Error::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                if v < 0 {
                    return Err(de::Error::custom(AmountError::OutOfRange));
                }
                Ok(Amount::from(v as u64))
            }
        }

        struct AmountBytesVisitor;

        impl<'de> Visitor<'de> for AmountBytesVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("32 big-endian bytes")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Amount, E> {
                if v.len() != 32 {
                    return Err(de::Error::invalid_length(v.len(), &self));
                }
                Ok(Amount::from_be_bytes(v))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(AmountVisitor)
        } else {
            deserializer.deserialize_bytes(AmountBytesVisitor)
        }
    }
}
