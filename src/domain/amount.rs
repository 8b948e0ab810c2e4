//! Raw token amounts with checked arithmetic.

use std::fmt;

/// Rounding direction for integer division.
///
/// The engine always rounds in the pool's favour: output and share
/// computations round [`Down`](Rounding::Down); only fee complements
/// effectively round up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Floor division.
    Down,
    /// Ceiling division.
    Up,
}

/// A raw token amount in the smallest unit.
///
/// `Amount` never interprets decimals. All arithmetic is checked: methods
/// return `None` on overflow, underflow, or division by zero instead of
/// panicking, and callers convert `None` into
/// [`DexError::ArithmeticOverflow`](crate::error::DexError::ArithmeticOverflow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division with explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        if divisor.0 == 0 {
            return None;
        }
        match rounding {
            Rounding::Down => Some(Self(self.0 / divisor.0)),
            Rounding::Up => {
                let q = self.0 / divisor.0;
                let r = self.0 % divisor.0;
                if r != 0 {
                    // q + 1 cannot overflow: r != 0 implies self < u128::MAX
                    // or divisor > 1, either way q < u128::MAX.
                    Some(Self(q + 1))
                } else {
                    Some(Self(q))
                }
            }
        }
    }

    /// Integer square root via Newton's method.
    ///
    /// Used for genesis share minting: `shares = isqrt(amount_a * amount_b)`.
    #[must_use]
    pub const fn isqrt(&self) -> Self {
        if self.0 == 0 {
            return Self::ZERO;
        }
        let n = self.0;
        let mut x = n;
        let mut y = x.div_ceil(2);
        while y < x {
            x = y;
            y = (x + n / x) / 2;
        }
        Self(x)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
