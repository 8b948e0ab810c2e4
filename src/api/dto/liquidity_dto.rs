//! Liquidity operation DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::{AddLiquidityOutcome, RemoveLiquidityOutcome};

/// Request body for `POST /pools/{token_a}/{token_b}/liquidity/add`.
///
/// Amounts follow the path's token order, not the canonical pair order.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddLiquidityRequest {
    /// Deposit for the path's first token (string-encoded u128).
    pub amount_a: String,
    /// Deposit for the path's second token (string-encoded u128).
    pub amount_b: String,
    /// Hex-encoded provider address.
    pub provider: String,
}

/// Response body for `POST /pools/{token_a}/{token_b}/liquidity/add`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AddLiquidityResponse {
    /// Canonical pair key.
    pub pair: String,
    /// Deposit of the canonical first token (string-encoded).
    pub amount_a_deposited: String,
    /// Deposit of the canonical second token (string-encoded).
    pub amount_b_deposited: String,
    /// Shares minted (string-encoded).
    pub shares_minted: String,
    /// Outstanding shares after the deposit (string-encoded).
    pub total_shares: String,
    /// Reserve of the first token after the deposit (string-encoded).
    pub reserve_a: String,
    /// Reserve of the second token after the deposit (string-encoded).
    pub reserve_b: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

impl From<AddLiquidityOutcome> for AddLiquidityResponse {
    fn from(outcome: AddLiquidityOutcome) -> Self {
        Self {
            pair: outcome.pair.to_string(),
            amount_a_deposited: outcome.amount_a.to_string(),
            amount_b_deposited: outcome.amount_b.to_string(),
            shares_minted: outcome.shares_minted.to_string(),
            total_shares: outcome.total_shares.to_string(),
            reserve_a: outcome.reserve_a.to_string(),
            reserve_b: outcome.reserve_b.to_string(),
            executed_at: Utc::now(),
        }
    }
}

/// Request body for `POST /pools/{token_a}/{token_b}/liquidity/remove`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveLiquidityRequest {
    /// Shares to burn (string-encoded u128).
    pub shares: String,
    /// Hex-encoded provider address.
    pub provider: String,
}

/// Response body for `POST /pools/{token_a}/{token_b}/liquidity/remove`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveLiquidityResponse {
    /// Canonical pair key.
    pub pair: String,
    /// Payout of the canonical first token (string-encoded).
    pub amount_a_returned: String,
    /// Payout of the canonical second token (string-encoded).
    pub amount_b_returned: String,
    /// Shares burned (string-encoded).
    pub shares_burned: String,
    /// Outstanding shares after the withdrawal (string-encoded).
    pub total_shares: String,
    /// Reserve of the first token after the withdrawal (string-encoded).
    pub reserve_a: String,
    /// Reserve of the second token after the withdrawal (string-encoded).
    pub reserve_b: String,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
}

impl From<RemoveLiquidityOutcome> for RemoveLiquidityResponse {
    fn from(outcome: RemoveLiquidityOutcome) -> Self {
        Self {
            pair: outcome.pair.to_string(),
            amount_a_returned: outcome.amount_a.to_string(),
            amount_b_returned: outcome.amount_b.to_string(),
            shares_burned: outcome.shares_burned.to_string(),
            total_shares: outcome.total_shares.to_string(),
            reserve_a: outcome.reserve_a.to_string(),
            reserve_b: outcome.reserve_b.to_string(),
            executed_at: Utc::now(),
        }
    }
}
