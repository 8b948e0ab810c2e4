//! Proportional swap fee expressed in basis points.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::DexError;

/// Basis-point denominator (10 000 = 100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// A proportional fee in basis points, retained by the pool on every swap.
///
/// The fee is applied to the input side: the effective input is
/// `amount_in * (10_000 - bps) / 10_000` truncated, so the retained fee
/// rounds up and never favours the trader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeBps(u16);

impl FeeBps {
    /// Conventional 0.30% exchange fee.
    pub const DEFAULT: Self = Self(30);

    /// Creates a fee, rejecting values of 100% or more.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Validation`] if `bps >= 10_000`.
    pub fn new(bps: u16) -> Result<Self, DexError> {
        if u128::from(bps) >= BPS_DENOMINATOR {
            return Err(DexError::Validation(format!(
                "fee of {bps} bps is not below 100%"
            )));
        }
        Ok(Self(bps))
    }

    /// Returns the raw basis-point value.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Splits `amount_in` into `(net_input, fee)`.
    ///
    /// `net_input = amount_in * (10_000 - bps) / 10_000` with truncating
    /// division; the fee is the remainder, so rounding loss lands on the
    /// fee side.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::ArithmeticOverflow`] if the scaled product
    /// exceeds `u128`.
    pub fn split_input(&self, amount_in: Amount) -> Result<(Amount, Amount), DexError> {
        let complement = Amount::new(BPS_DENOMINATOR - u128::from(self.0));
        let net = amount_in
            .checked_mul(&complement)
            .ok_or(DexError::ArithmeticOverflow("fee scaling"))?
            .checked_div(&Amount::new(BPS_DENOMINATOR), Rounding::Down)
            .ok_or(DexError::ArithmeticOverflow("fee scaling"))?;
        let fee = amount_in
            .checked_sub(&net)
            .ok_or(DexError::ArithmeticOverflow("fee remainder"))?;
        Ok((net, fee))
    }
}

impl Default for FeeBps {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for FeeBps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.0)
    }
}
