//! Token provenance record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Address;

/// Immutable record of a token created through the registry.
///
/// Written exactly once by `createToken` and never mutated or deleted;
/// the registry's ledger is append-only. Symbol collisions across
/// distinct tokens are permitted — only the address is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    /// Unique ledger address assigned at creation.
    pub address: Address,
    /// Human-readable name, non-empty.
    pub name: String,
    /// Ticker symbol, non-empty. Not deduplicated across tokens.
    pub symbol: String,
    /// Account the full initial supply was minted to.
    pub creator: Address,
    /// Total supply minted at creation, always positive.
    pub initial_supply: u128,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
