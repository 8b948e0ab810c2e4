//! Constant-product liquidity pool engine (`x · y = k`).
//!
//! The pool is a per-pair reserve ledger with share accounting. Fees are
//! deducted from the input amount before the pricing formula is applied
//! and stay in the reserves, so the invariant product never decreases:
//!
//! 1. `net = amount_in × (10 000 − fee_bps) / 10 000` (truncated)
//! 2. `amount_out = reserve_out × net / (reserve_in + net)` (truncated)
//! 3. `reserve_in += amount_in`, `reserve_out -= amount_out`
//!
//! All mutations go through a two-phase protocol: a pure `quote_*` method
//! validates and computes the outcome, then the matching `commit_*`
//! applies it. The orchestration layer performs external token transfers
//! between the two phases and aborts the whole call on any failure, so a
//! pool never observes a partial state change.
//!
//! # Lifecycle
//!
//! `Uninitialized → Active → Emptied → Active …` — an emptied pool is
//! indistinguishable from a fresh one and accepts the next deposit at
//! any ratio.

use std::collections::HashMap;

use super::fee::BPS_DENOMINATOR;
use super::{Address, Amount, FeeBps, PairKey, Rounding};
use crate::error::DexError;

/// Validated outcome of an `addLiquidity` call, produced by
/// [`LiquidityPool::quote_add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddQuote {
    /// Deposit for the pair's first token.
    pub amount_a: Amount,
    /// Deposit for the pair's second token.
    pub amount_b: Amount,
    /// Shares the provider will be credited.
    pub shares_minted: u128,
}

/// Validated outcome of a `removeLiquidity` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveQuote {
    /// Shares to burn.
    pub shares: u128,
    /// Payout in the pair's first token (truncated, pool-favouring).
    pub amount_a: Amount,
    /// Payout in the pair's second token.
    pub amount_b: Amount,
}

/// Validated outcome of a swap, including the exact post-trade reserves.
///
/// Reserves are precomputed so the commit happens *before* the outbound
/// transfer: a reentrant observer can never see stale reserves for a
/// trade that is already priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Input token address.
    pub token_in: Address,
    /// Output token address.
    pub token_out: Address,
    /// Gross input, fee included.
    pub amount_in: Amount,
    /// Fee retained by the pool.
    pub fee: Amount,
    /// Output the caller receives.
    pub amount_out: Amount,
    /// Reserve of the pair's first token after the trade.
    pub new_reserve_a: Amount,
    /// Reserve of the pair's second token after the trade.
    pub new_reserve_b: Amount,
}

/// Per-pair constant-product reserve ledger with share accounting.
///
/// # Invariants
///
/// - `reserve_a == 0 ⇔ reserve_b == 0 ⇔ total_shares == 0`
/// - `sum(share_of) == total_shares`
/// - the reserve product never decreases across a swap
#[derive(Debug, Clone)]
pub struct LiquidityPool {
    pair: PairKey,
    fee: FeeBps,
    reserve_a: Amount,
    reserve_b: Amount,
    total_shares: u128,
    share_of: HashMap<Address, u128>,
}

impl LiquidityPool {
    /// Creates an empty (uninitialized) pool for the given pair.
    #[must_use]
    pub fn new(pair: PairKey, fee: FeeBps) -> Self {
        Self {
            pair,
            fee,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            total_shares: 0,
            share_of: HashMap::new(),
        }
    }

    /// Returns the canonical pair key.
    #[must_use]
    pub const fn pair(&self) -> PairKey {
        self.pair
    }

    /// Returns the pool's fee.
    #[must_use]
    pub const fn fee(&self) -> FeeBps {
        self.fee
    }

    /// Returns the current reserves in canonical order.
    #[must_use]
    pub const fn reserves(&self) -> (Amount, Amount) {
        (self.reserve_a, self.reserve_b)
    }

    /// Returns the outstanding share total.
    #[must_use]
    pub const fn total_shares(&self) -> u128 {
        self.total_shares
    }

    /// Returns `provider`'s share balance.
    #[must_use]
    pub fn shares_of(&self, provider: Address) -> u128 {
        self.share_of.get(&provider).copied().unwrap_or(0)
    }

    /// Returns `true` if the pool holds no liquidity (uninitialized or
    /// emptied — the two states are observably identical).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_shares == 0
    }

    /// Validates a liquidity deposit and computes the shares to mint.
    ///
    /// Amounts are in canonical pair order. On a fresh or emptied pool
    /// any positive pair of amounts is accepted and establishes the
    /// price: `shares = isqrt(amount_a × amount_b)`. On an active pool
    /// the deposit must match the reserve ratio within `tolerance_bps`
    /// and mints `min(aΔ·S/Ra, bΔ·S/Rb)` truncated, which never dilutes
    /// existing holders.
    ///
    /// # Errors
    ///
    /// - [`DexError::ZeroAmount`] if either amount is zero.
    /// - [`DexError::RatioMismatch`] if the deposit deviates from the
    ///   reserve ratio beyond tolerance.
    /// - [`DexError::Validation`] if the deposit is too small to mint a
    ///   single share.
    /// - [`DexError::ArithmeticOverflow`] on any overflowing intermediate.
    pub fn quote_add(
        &self,
        amount_a: Amount,
        amount_b: Amount,
        tolerance_bps: u16,
    ) -> Result<AddQuote, DexError> {
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(DexError::ZeroAmount);
        }

        let shares_minted = if self.is_empty() {
            let product = amount_a
                .checked_mul(&amount_b)
                .ok_or(DexError::ArithmeticOverflow("genesis share product"))?;
            let shares = product.isqrt().get();
            if shares == 0 {
                return Err(DexError::Validation(
                    "deposit too small to mint shares".to_string(),
                ));
            }
            shares
        } else {
            self.check_ratio(amount_a, amount_b, tolerance_bps)?;

            let total = Amount::new(self.total_shares);
            let share_a = amount_a
                .checked_mul(&total)
                .ok_or(DexError::ArithmeticOverflow("share numerator"))?
                .checked_div(&self.reserve_a, Rounding::Down)
                .ok_or(DexError::ArithmeticOverflow("share division"))?;
            let share_b = amount_b
                .checked_mul(&total)
                .ok_or(DexError::ArithmeticOverflow("share numerator"))?
                .checked_div(&self.reserve_b, Rounding::Down)
                .ok_or(DexError::ArithmeticOverflow("share division"))?;

            let minted = share_a.min(share_b).get();
            if minted == 0 {
                return Err(DexError::Validation(
                    "deposit too small to mint shares".to_string(),
                ));
            }
            minted
        };

        Ok(AddQuote {
            amount_a,
            amount_b,
            shares_minted,
        })
    }

    /// Applies a previously validated deposit.
    ///
    /// Must be called on the same state the quote was computed from,
    /// under the caller's exclusive lock.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::ArithmeticOverflow`] if a reserve or the share
    /// total would overflow.
    pub fn commit_add(&mut self, provider: Address, quote: &AddQuote) -> Result<(), DexError> {
        self.reserve_a = self
            .reserve_a
            .checked_add(&quote.amount_a)
            .ok_or(DexError::ArithmeticOverflow("reserve_a on deposit"))?;
        self.reserve_b = self
            .reserve_b
            .checked_add(&quote.amount_b)
            .ok_or(DexError::ArithmeticOverflow("reserve_b on deposit"))?;
        self.total_shares = self
            .total_shares
            .checked_add(quote.shares_minted)
            .ok_or(DexError::ArithmeticOverflow("total shares on deposit"))?;
        let balance = self.share_of.entry(provider).or_insert(0);
        *balance = balance
            .checked_add(quote.shares_minted)
            .ok_or(DexError::ArithmeticOverflow("provider shares on deposit"))?;
        Ok(())
    }

    /// Validates a share burn and computes the proportional payout.
    ///
    /// `amount_x = reserve_x × shares / total_shares` truncated, so the
    /// provider never extracts more than their proportional share.
    ///
    /// # Errors
    ///
    /// - [`DexError::ZeroAmount`] if `shares` is zero.
    /// - [`DexError::Unauthorized`] if `shares` exceeds the provider's
    ///   balance.
    /// - [`DexError::ArithmeticOverflow`] on an overflowing intermediate.
    pub fn quote_remove(&self, provider: Address, shares: u128) -> Result<RemoveQuote, DexError> {
        if shares == 0 {
            return Err(DexError::ZeroAmount);
        }
        let owned = self.shares_of(provider);
        if shares > owned {
            return Err(DexError::Unauthorized(format!(
                "burning {shares} shares but only {owned} owned"
            )));
        }

        let total = Amount::new(self.total_shares);
        let amount_a = self
            .reserve_a
            .checked_mul(&Amount::new(shares))
            .ok_or(DexError::ArithmeticOverflow("withdrawal numerator"))?
            .checked_div(&total, Rounding::Down)
            .ok_or(DexError::ArithmeticOverflow("withdrawal division"))?;
        let amount_b = self
            .reserve_b
            .checked_mul(&Amount::new(shares))
            .ok_or(DexError::ArithmeticOverflow("withdrawal numerator"))?
            .checked_div(&total, Rounding::Down)
            .ok_or(DexError::ArithmeticOverflow("withdrawal division"))?;

        Ok(RemoveQuote {
            shares,
            amount_a,
            amount_b,
        })
    }

    /// Burns shares and decrements reserves per a validated quote.
    ///
    /// Called *before* the outbound transfers so a reentrant observer
    /// sees post-withdrawal reserves.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::ArithmeticOverflow`] on underflow, which only
    /// happens if the quote was computed against different state.
    pub fn commit_remove(&mut self, provider: Address, quote: &RemoveQuote) -> Result<(), DexError> {
        let owned = self.shares_of(provider);
        let remaining = owned
            .checked_sub(quote.shares)
            .ok_or(DexError::ArithmeticOverflow("provider shares on burn"))?;
        self.reserve_a = self
            .reserve_a
            .checked_sub(&quote.amount_a)
            .ok_or(DexError::ArithmeticOverflow("reserve_a on withdrawal"))?;
        self.reserve_b = self
            .reserve_b
            .checked_sub(&quote.amount_b)
            .ok_or(DexError::ArithmeticOverflow("reserve_b on withdrawal"))?;
        self.total_shares = self
            .total_shares
            .checked_sub(quote.shares)
            .ok_or(DexError::ArithmeticOverflow("total shares on burn"))?;
        if remaining == 0 {
            self.share_of.remove(&provider);
        } else {
            self.share_of.insert(provider, remaining);
        }
        Ok(())
    }

    /// Prices a swap without mutating state.
    ///
    /// # Errors
    ///
    /// - [`DexError::InvalidRequest`] if `token_in` is not in the pair.
    /// - [`DexError::ZeroAmount`] if `amount_in` is zero.
    /// - [`DexError::InsufficientLiquidity`] on an empty pool, or when
    ///   the trade is too small to produce any output.
    /// - [`DexError::ArithmeticOverflow`] on an overflowing intermediate.
    pub fn quote_swap(&self, token_in: Address, amount_in: Amount) -> Result<SwapQuote, DexError> {
        let token_out = self.pair.other(token_in)?;
        if amount_in.is_zero() {
            return Err(DexError::ZeroAmount);
        }
        if self.is_empty() {
            return Err(DexError::InsufficientLiquidity);
        }

        let in_is_a = token_in == self.pair.first();
        let (reserve_in, reserve_out) = if in_is_a {
            (self.reserve_a, self.reserve_b)
        } else {
            (self.reserve_b, self.reserve_a)
        };

        let (net, fee) = self.fee.split_input(amount_in)?;
        if net.is_zero() {
            return Err(DexError::InsufficientLiquidity);
        }

        // amount_out = reserve_out * net / (reserve_in + net), truncated.
        // Multiplication before division minimises rounding loss, and the
        // floor keeps the reserve product from ever shrinking.
        let denominator = reserve_in
            .checked_add(&net)
            .ok_or(DexError::ArithmeticOverflow("swap denominator"))?;
        let amount_out = reserve_out
            .checked_mul(&net)
            .ok_or(DexError::ArithmeticOverflow("swap numerator"))?
            .checked_div(&denominator, Rounding::Down)
            .ok_or(DexError::ArithmeticOverflow("swap division"))?;

        if amount_out.is_zero() {
            return Err(DexError::InsufficientLiquidity);
        }

        let new_reserve_in = reserve_in
            .checked_add(&amount_in)
            .ok_or(DexError::ArithmeticOverflow("reserve_in after swap"))?;
        let new_reserve_out = reserve_out
            .checked_sub(&amount_out)
            .ok_or(DexError::ArithmeticOverflow("reserve_out after swap"))?;

        let (new_reserve_a, new_reserve_b) = if in_is_a {
            (new_reserve_in, new_reserve_out)
        } else {
            (new_reserve_out, new_reserve_in)
        };

        Ok(SwapQuote {
            token_in,
            token_out,
            amount_in,
            fee,
            amount_out,
            new_reserve_a,
            new_reserve_b,
        })
    }

    /// Sets the reserves to their exact post-trade values.
    ///
    /// Share balances are untouched: the fee accrues to all holders
    /// through the grown reserves.
    pub fn commit_swap(&mut self, quote: &SwapQuote) {
        self.reserve_a = quote.new_reserve_a;
        self.reserve_b = quote.new_reserve_b;
    }

    /// Checks a follow-on deposit against the current reserve ratio.
    ///
    /// Cross-product form avoids division: the deviation
    /// `|aΔ·Rb − bΔ·Ra|` must stay within `tolerance_bps` of the larger
    /// cross product.
    fn check_ratio(
        &self,
        amount_a: Amount,
        amount_b: Amount,
        tolerance_bps: u16,
    ) -> Result<(), DexError> {
        let cross_a = amount_a
            .checked_mul(&self.reserve_b)
            .ok_or(DexError::ArithmeticOverflow("ratio cross product"))?;
        let cross_b = amount_b
            .checked_mul(&self.reserve_a)
            .ok_or(DexError::ArithmeticOverflow("ratio cross product"))?;

        let (larger, smaller) = if cross_a >= cross_b {
            (cross_a, cross_b)
        } else {
            (cross_b, cross_a)
        };
        let diff = larger
            .checked_sub(&smaller)
            .ok_or(DexError::ArithmeticOverflow("ratio deviation"))?;

        let allowed = larger
            .checked_mul(&Amount::new(u128::from(tolerance_bps)))
            .ok_or(DexError::ArithmeticOverflow("ratio tolerance"))?
            .checked_div(&Amount::new(BPS_DENOMINATOR), Rounding::Down)
            .ok_or(DexError::ArithmeticOverflow("ratio tolerance"))?;

        if diff > allowed {
            return Err(DexError::RatioMismatch);
        }
        Ok(())
    }
}
