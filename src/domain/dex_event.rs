//! Domain events reflecting registry and pool state mutations.
//!
//! Every successful mutation emits a [`DexEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers;
//! they are fire-and-forget and never block the mutation that produced
//! them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PairKey;

/// Domain event emitted after every state mutation.
///
/// All u128 amounts are stored as `String` so JSON consumers never lose
/// precision to double rounding.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DexEvent {
    /// Emitted when a token is created through the registry.
    TokenCreated {
        /// Address of the new token.
        token: String,
        /// Ticker symbol.
        symbol: String,
        /// Account the initial supply was minted to.
        creator: String,
        /// Initial supply (string-encoded u128).
        initial_supply: String,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a pool is created for a new pair.
    PoolCreated {
        /// Canonical pair key.
        pair: PairKey,
        /// Fee tier in basis points.
        fee_bps: u16,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a liquidity deposit.
    LiquidityAdded {
        /// Canonical pair key.
        pair: PairKey,
        /// Provider account.
        provider: String,
        /// Deposit of the pair's first token (string-encoded u128).
        amount_a: String,
        /// Deposit of the pair's second token (string-encoded u128).
        amount_b: String,
        /// Shares minted to the provider (string-encoded u128).
        shares_minted: String,
        /// Outstanding shares after the deposit (string-encoded u128).
        total_shares: String,
        /// Timestamp of the deposit.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a liquidity withdrawal.
    LiquidityRemoved {
        /// Canonical pair key.
        pair: PairKey,
        /// Provider account.
        provider: String,
        /// Payout of the pair's first token (string-encoded u128).
        amount_a: String,
        /// Payout of the pair's second token (string-encoded u128).
        amount_b: String,
        /// Shares burned (string-encoded u128).
        shares_burned: String,
        /// Outstanding shares after the withdrawal (string-encoded u128).
        total_shares: String,
        /// Timestamp of the withdrawal.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful swap.
    SwapExecuted {
        /// Canonical pair key.
        pair: PairKey,
        /// Server-assigned command ID for correlation.
        command_id: String,
        /// Trader account.
        trader: String,
        /// Input token address.
        token_in: String,
        /// Output token address.
        token_out: String,
        /// Gross input amount (string-encoded u128).
        amount_in: String,
        /// Output amount (string-encoded u128).
        amount_out: String,
        /// Fee retained by the pool (string-encoded u128).
        fee: String,
        /// Execution timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl DexEvent {
    /// Returns the pair this event concerns, or `None` for registry
    /// events that are not tied to a pool.
    #[must_use]
    pub const fn pair_key(&self) -> Option<PairKey> {
        match self {
            Self::TokenCreated { .. } => None,
            Self::PoolCreated { pair, .. }
            | Self::LiquidityAdded { pair, .. }
            | Self::LiquidityRemoved { pair, .. }
            | Self::SwapExecuted { pair, .. } => Some(*pair),
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::TokenCreated { .. } => "token_created",
            Self::PoolCreated { .. } => "pool_created",
            Self::LiquidityAdded { .. } => "liquidity_added",
            Self::LiquidityRemoved { .. } => "liquidity_removed",
            Self::SwapExecuted { .. } => "swap_executed",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Address;

    fn pair() -> PairKey {
        let Ok(pair) = PairKey::new(
            Address::from_bytes([1u8; 20]),
            Address::from_bytes([2u8; 20]),
        ) else {
            panic!("valid pair");
        };
        pair
    }

    #[test]
    fn token_created_has_no_pair() {
        let event = DexEvent::TokenCreated {
            token: "0xda".to_string(),
            symbol: "USDC".to_string(),
            creator: "0x01".to_string(),
            initial_supply: "1000000".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "token_created");
        assert!(event.pair_key().is_none());
    }

    #[test]
    fn swap_executed_serializes_with_tag() {
        let event = DexEvent::SwapExecuted {
            pair: pair(),
            command_id: "cmd-1".to_string(),
            trader: "0x11".to_string(),
            token_in: "0x01".to_string(),
            token_out: "0x02".to_string(),
            amount_in: "100".to_string(),
            amount_out: "90".to_string(),
            fee: "1".to_string(),
            timestamp: Utc::now(),
        };
        let Ok(json) = serde_json::to_string(&event) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"event_type\":\"swap_executed\""));
        assert!(json.contains("\"amount_out\":\"90\""));
        assert_eq!(event.pair_key(), Some(pair()));
    }

    #[test]
    fn pool_created_pair_accessor() {
        let event = DexEvent::PoolCreated {
            pair: pair(),
            fee_bps: 30,
            timestamp: Utc::now(),
        };
        assert_eq!(event.pair_key(), Some(pair()));
    }
}
