//! Unsigned 256-bit amounts and block heights
//!
//! Wraps `primitive_types::U256` for deterministic integer arithmetic.
//! Only checked operations are exposed; overflow is surfaced as `None`
//! and treated as a fatal fault by callers. Saturating and wrapping
//! arithmetic are deliberately absent from the public surface.

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Unsigned 256-bit integer used for amounts and block heights.
///
/// `Amount::MAX` doubles as the "not present" sentinel for index
/// lookups across the external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(U256);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(U256::zero());

    /// Maximum representable value; the index-lookup sentinel.
    pub const MAX: Amount = Amount(U256::MAX);

    /// Construct from an inner U256.
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Whether this amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Inner U256 value.
    pub fn as_u256(&self) -> U256 {
        self.0
    }

    /// Checked addition. `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction. `None` on underflow.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<usize> for Amount {
    fn from(value: usize) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s).map(Amount).map_err(|_| AmountParseError {
            input: s.to_string(),
        })
    }
}

/// Error produced when parsing an amount from a decimal string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid decimal amount: {input}")]
pub struct AmountParseError {
    pub input: String,
}

// Decimal-string serde: uint256 values do not fit JSON numbers.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_dec_str(&s).map(Amount).map_err(de::Error::custom)
    }
}
