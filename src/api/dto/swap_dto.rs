//! Swap and quote DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::SwapQuote;
use crate::service::SwapOutcome;

/// Request body for `POST /pools/{token_a}/{token_b}/swap`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SwapRequest {
    /// Hex-encoded address of the input token. Must be one of the two
    /// path tokens; the other becomes the output token.
    pub token_in: String,
    /// Exact input amount, fee included (string-encoded u128).
    pub amount_in: String,
    /// Minimum acceptable output for slippage protection
    /// (string-encoded u128). Defaults to 0.
    #[serde(default)]
    pub min_amount_out: Option<String>,
    /// Hex-encoded trader address.
    pub trader: String,
}

/// Response body for `POST /pools/{token_a}/{token_b}/swap`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SwapResponse {
    /// Server-assigned correlation ID.
    pub swap_id: String,
    /// Canonical pair key.
    pub pair: String,
    /// Input token address.
    pub token_in: String,
    /// Output token address.
    pub token_out: String,
    /// Gross input amount (string-encoded).
    pub amount_in: String,
    /// Output amount transferred to the trader (string-encoded).
    pub amount_out: String,
    /// Fee retained by the pool (string-encoded).
    pub fee_charged: String,
    /// Reserve of the pair's first token after the trade (string-encoded).
    pub reserve_a: String,
    /// Reserve of the pair's second token after the trade (string-encoded).
    pub reserve_b: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

impl From<SwapOutcome> for SwapResponse {
    fn from(outcome: SwapOutcome) -> Self {
        Self {
            swap_id: outcome.command_id,
            pair: outcome.pair.to_string(),
            token_in: outcome.token_in.to_string(),
            token_out: outcome.token_out.to_string(),
            amount_in: outcome.amount_in.to_string(),
            amount_out: outcome.amount_out.to_string(),
            fee_charged: outcome.fee.to_string(),
            reserve_a: outcome.reserve_a.to_string(),
            reserve_b: outcome.reserve_b.to_string(),
            executed_at: Utc::now(),
        }
    }
}

/// Request body for `POST /pools/{token_a}/{token_b}/quote`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuoteRequest {
    /// Hex-encoded address of the input token.
    pub token_in: String,
    /// Input amount to price (string-encoded u128).
    pub amount_in: String,
}

/// Response body for `POST /pools/{token_a}/{token_b}/quote`.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    /// Input token address.
    pub token_in: String,
    /// Output token address.
    pub token_out: String,
    /// Input amount priced (string-encoded).
    pub amount_in: String,
    /// Output the pool would produce (string-encoded).
    pub amount_out: String,
    /// Fee the pool would retain (string-encoded).
    pub fee_charged: String,
    /// Quote timestamp.
    pub quoted_at: DateTime<Utc>,
}

impl From<SwapQuote> for QuoteResponse {
    fn from(quote: SwapQuote) -> Self {
        Self {
            token_in: quote.token_in.to_string(),
            token_out: quote.token_out.to_string(),
            amount_in: quote.amount_in.to_string(),
            amount_out: quote.amount_out.to_string(),
            fee_charged: quote.fee.to_string(),
            quoted_at: Utc::now(),
        }
    }
}
