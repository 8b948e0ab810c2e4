//! Exchange error types with HTTP status code mapping.
//!
//! [`DexError`] is the central error type for the service. Every variant
//! maps to a numeric error code and a specific HTTP status, and every
//! error aborts the whole call: no operation commits partial state.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::bank::BankError;
use crate::domain::Address;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4003,
///     "message": "swap output 90 below caller minimum 95",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`DexError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Unified error enum for registry, pool engine, and service layers.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | Not Found       | 404 Not Found                |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
/// | 4000–4999 | Pool/Exchange   | 422 / 403 / 409              |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DexError {
    /// Malformed input: empty name/symbol, zero initial supply, and similar.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Request could not be parsed into domain values.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The two tokens of a pair are identical.
    #[error("invalid pair: a pool requires two distinct tokens")]
    InvalidPair,

    /// An amount that must be positive was zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// No token with the given address is registered.
    #[error("token not found: {0}")]
    TokenNotFound(Address),

    /// No pool exists for the given pair.
    #[error("pool not found for pair {0}")]
    PoolNotFound(String),

    /// A follow-on deposit deviates from the current reserve ratio
    /// beyond the configured tolerance.
    #[error("deposit ratio deviates from pool ratio beyond tolerance")]
    RatioMismatch,

    /// The pool has no reserves to trade against, or the trade would
    /// drain a reserve entirely.
    #[error("insufficient liquidity in pool")]
    InsufficientLiquidity,

    /// Computed swap output fell below the caller's floor.
    #[error("swap output {amount_out} below caller minimum {min_amount_out}")]
    SlippageExceeded {
        /// Output the pool would have produced.
        amount_out: u128,
        /// Caller-supplied minimum.
        min_amount_out: u128,
    },

    /// Provider attempted to burn more shares than they own.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An intermediate value exceeded the representable range. The call
    /// is rejected before any state is corrupted.
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    /// A token transfer on the underlying fungible-token ledger failed.
    #[error("transfer failed: {0}")]
    TransferFailed(#[from] BankError),

    /// A mutating call re-entered a pool that is mid-operation.
    #[error("reentrant call rejected: pool operation already in flight")]
    ReentrancyDetected,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DexError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidRequest(_) => 1002,
            Self::InvalidPair => 1003,
            Self::ZeroAmount => 1004,
            Self::TokenNotFound(_) => 2001,
            Self::PoolNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::RatioMismatch => 4001,
            Self::InsufficientLiquidity => 4002,
            Self::SlippageExceeded { .. } => 4003,
            Self::Unauthorized(_) => 4004,
            Self::ArithmeticOverflow(_) => 4005,
            Self::TransferFailed(_) => 4006,
            Self::ReentrancyDetected => 4007,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidRequest(_)
            | Self::InvalidPair
            | Self::ZeroAmount => StatusCode::BAD_REQUEST,
            Self::TokenNotFound(_) | Self::PoolNotFound(_) => StatusCode::NOT_FOUND,
            Self::RatioMismatch
            | Self::InsufficientLiquidity
            | Self::SlippageExceeded { .. }
            | Self::ArithmeticOverflow(_)
            | Self::TransferFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::ReentrancyDetected => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DexError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
