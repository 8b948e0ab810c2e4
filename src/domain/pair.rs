//! Canonical identity for an unordered token pair.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::DexError;

/// Canonical key for a pool: two distinct token addresses in ascending
/// byte order.
///
/// Construction sorts the inputs, so `(X, Y)` and `(Y, X)` produce the
/// same key and resolve to the same pool. Serializes as
/// `"0x<first>:0x<second>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    token_a: Address,
    token_b: Address,
}

impl PairKey {
    /// Creates a canonically-ordered pair key.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidPair`] if both addresses are equal.
    pub fn new(token_1: Address, token_2: Address) -> Result<Self, DexError> {
        if token_1 == token_2 {
            return Err(DexError::InvalidPair);
        }
        let (token_a, token_b) = if token_1 < token_2 {
            (token_1, token_2)
        } else {
            (token_2, token_1)
        };
        Ok(Self { token_a, token_b })
    }

    /// Returns the first token (lower address).
    #[must_use]
    pub const fn first(&self) -> Address {
        self.token_a
    }

    /// Returns the second token (higher address).
    #[must_use]
    pub const fn second(&self) -> Address {
        self.token_b
    }

    /// Returns `true` if the given token is part of this pair.
    #[must_use]
    pub fn contains(&self, token: Address) -> bool {
        self.token_a == token || self.token_b == token
    }

    /// Returns the counterpart of `token` in this pair.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidRequest`] if `token` is not in the pair.
    pub fn other(&self, token: Address) -> Result<Address, DexError> {
        if token == self.token_a {
            Ok(self.token_b)
        } else if token == self.token_b {
            Ok(self.token_a)
        } else {
            Err(DexError::InvalidRequest(format!(
                "token {token} is not part of pair {self}"
            )))
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.token_a, self.token_b)
    }
}

impl FromStr for PairKey {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(':')
            .ok_or_else(|| DexError::InvalidRequest(format!("malformed pair key {s:?}")))?;
        let token_a: Address = a
            .parse()
            .map_err(|e| DexError::InvalidRequest(format!("{e}")))?;
        let token_b: Address = b
            .parse()
            .map_err(|e| DexError::InvalidRequest(format!("{e}")))?;
        Self::new(token_a, token_b)
    }
}

impl Serialize for PairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PairKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
