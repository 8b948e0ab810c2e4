//! Pool DTOs for create, get, and list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::PoolSummary;

/// Request body for `POST /pools`.
///
/// Token order does not matter; the server canonicalizes the pair.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePoolRequest {
    /// Hex-encoded address of one token.
    pub token_a: String,
    /// Hex-encoded address of the other token.
    pub token_b: String,
}

/// Pool state as returned by pool endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PoolDto {
    /// Canonical pair key (`"0x<first>:0x<second>"`).
    pub pair: String,
    /// First token of the canonical pair.
    pub token_a: String,
    /// Second token of the canonical pair.
    pub token_b: String,
    /// Reserve of the first token (string-encoded u128).
    pub reserve_a: String,
    /// Reserve of the second token (string-encoded u128).
    pub reserve_b: String,
    /// Outstanding liquidity shares (string-encoded u128).
    pub total_shares: String,
    /// Fee tier in basis points.
    pub fee_bps: u16,
    /// Number of swaps executed.
    pub swap_count: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<PoolSummary> for PoolDto {
    fn from(summary: PoolSummary) -> Self {
        Self {
            pair: summary.pair.to_string(),
            token_a: summary.token_a.to_string(),
            token_b: summary.token_b.to_string(),
            reserve_a: summary.reserve_a.to_string(),
            reserve_b: summary.reserve_b.to_string(),
            total_shares: summary.total_shares.to_string(),
            fee_bps: summary.fee_bps,
            swap_count: summary.swap_count,
            created_at: summary.created_at,
        }
    }
}

/// Response body for `POST /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePoolResponse {
    /// The pool, freshly created or pre-existing.
    #[serde(flatten)]
    pub pool: PoolDto,
    /// `true` when this request created the pool.
    pub created: bool,
}

/// Paginated list response for `GET /pools`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoolListResponse {
    /// Pool summaries sorted by pair key.
    pub data: Vec<PoolDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
