//! Pool entry combining the pricing engine with server-side metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Address, LiquidityPool, PairKey};

/// Aggregate wrapping a [`LiquidityPool`] with operational metadata.
///
/// Each pool in the registry is stored as a `PoolEntry`. The `pool`
/// field holds the live reserve and share state while the remaining
/// fields track bookkeeping the engine itself does not care about.
#[derive(Debug)]
pub struct PoolEntry {
    /// Canonical pair key (immutable after creation).
    pub pair: PairKey,

    /// Ledger account holding the pool's token reserves.
    pub vault: Address,

    /// The pricing engine. Updated on swap / liquidity operations.
    pub pool: LiquidityPool,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last state mutation.
    pub last_modified_at: DateTime<Utc>,

    /// Number of swaps executed on this pool.
    pub swap_count: u64,

    /// Cumulative gross swap input across both tokens, smallest units.
    pub total_volume: u128,

    /// Guard flag for the two-phase mutation protocol. Set while a
    /// mutation holds the entry between its quote and commit phases.
    pub in_flight: bool,
}

impl PoolEntry {
    /// Creates a new entry around an empty pool.
    #[must_use]
    pub fn new(pool: LiquidityPool, vault: Address) -> Self {
        let now = Utc::now();
        Self {
            pair: pool.pair(),
            vault,
            pool,
            created_at: now,
            last_modified_at: now,
            swap_count: 0,
            total_volume: 0,
            in_flight: false,
        }
    }

    /// Stamps the entry after a successful mutation.
    pub fn touch(&mut self) {
        self.last_modified_at = Utc::now();
    }
}

/// Lightweight snapshot of a pool for list and detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolSummary {
    /// Canonical pair key.
    pub pair: PairKey,
    /// First token of the pair.
    pub token_a: Address,
    /// Second token of the pair.
    pub token_b: Address,
    /// Reserve of the first token.
    pub reserve_a: u128,
    /// Reserve of the second token.
    pub reserve_b: u128,
    /// Outstanding liquidity shares.
    pub total_shares: u128,
    /// Fee tier in basis points.
    pub fee_bps: u16,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Number of swaps executed.
    pub swap_count: u64,
}

impl From<&PoolEntry> for PoolSummary {
    fn from(entry: &PoolEntry) -> Self {
        let (reserve_a, reserve_b) = entry.pool.reserves();
        Self {
            pair: entry.pair,
            token_a: entry.pair.first(),
            token_b: entry.pair.second(),
            reserve_a: reserve_a.get(),
            reserve_b: reserve_b.get(),
            total_shares: entry.pool.total_shares(),
            fee_bps: entry.pool.fee().get(),
            created_at: entry.created_at,
            swap_count: entry.swap_count,
        }
    }
}
