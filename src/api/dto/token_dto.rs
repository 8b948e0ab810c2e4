//! Token registry DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::TokenRecord;

/// Request body for `POST /tokens`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTokenRequest {
    /// Human-readable token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Initial supply minted to the creator (string-encoded u128).
    pub initial_supply: String,
    /// Hex-encoded creator address.
    pub creator: String,
}

/// Token record as returned by every token endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenDto {
    /// Hex-encoded token address.
    pub address: String,
    /// Human-readable name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Hex-encoded creator address.
    pub creator: String,
    /// Initial supply (string-encoded u128).
    pub initial_supply: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<TokenRecord> for TokenDto {
    fn from(record: TokenRecord) -> Self {
        Self {
            address: record.address.to_string(),
            name: record.name,
            symbol: record.symbol,
            creator: record.creator.to_string(),
            initial_supply: record.initial_supply.to_string(),
            created_at: record.created_at,
        }
    }
}

/// Paginated list response for `GET /tokens` and
/// `GET /tokens/creator/{address}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenListResponse {
    /// Token records in creation order.
    pub data: Vec<TokenDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Response body for `GET /tokens/{token}/balance/{holder}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Hex-encoded token address.
    pub token: String,
    /// Hex-encoded holder address.
    pub holder: String,
    /// Current balance (string-encoded u128).
    pub balance: String,
}
