//! Swap and quote endpoint handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    QuoteRequest, QuoteResponse, SwapRequest, SwapResponse, parse_address, parse_amount,
};
use crate::app_state::AppState;
use crate::domain::Address;
use crate::error::{DexError, ErrorResponse};

/// `POST /pools/{token_a}/{token_b}/swap` — Execute a swap.
///
/// # Errors
///
/// Returns [`DexError`] on invalid parameters, a missing pool,
/// insufficient liquidity, or a violated slippage floor.
#[utoipa::path(
    post,
    path = "/api/v1/pools/{token_a}/{token_b}/swap",
    tag = "Swaps",
    summary = "Execute a swap",
    description = "Swaps an exact input amount of one pair token for the other. The fee is deducted from the input and retained by the pool; the whole call aborts if the priced output falls below `min_amount_out`.",
    params(
        ("token_a" = String, Path, description = "Hex-encoded address of one token"),
        ("token_b" = String, Path, description = "Hex-encoded address of the other token"),
    ),
    request_body = SwapRequest,
    responses(
        (status = 200, description = "Swap executed", body = SwapResponse),
        (status = 400, description = "Invalid swap parameters", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
        (status = 422, description = "Insufficient liquidity or slippage exceeded", body = ErrorResponse),
    )
)]
pub async fn execute_swap(
    State(state): State<AppState>,
    Path((token_a, token_b)): Path<(String, String)>,
    Json(req): Json<SwapRequest>,
) -> Result<impl IntoResponse, DexError> {
    let token_a = parse_address("token_a", &token_a)?;
    let token_b = parse_address("token_b", &token_b)?;
    let token_in = parse_address("token_in", &req.token_in)?;
    let token_out = resolve_token_out(token_a, token_b, token_in)?;

    let amount_in = parse_amount("amount_in", &req.amount_in)?;
    let min_amount_out = match &req.min_amount_out {
        Some(value) => parse_amount("min_amount_out", value)?,
        None => 0,
    };
    let trader = parse_address("trader", &req.trader)?;

    let outcome = state
        .dex_service
        .swap(token_in, token_out, amount_in, min_amount_out, trader)
        .await?;

    Ok(Json(SwapResponse::from(outcome)))
}

/// `POST /pools/{token_a}/{token_b}/quote` — Price a swap (read-only).
///
/// # Errors
///
/// Returns [`DexError`] on invalid parameters or a missing pool.
#[utoipa::path(
    post,
    path = "/api/v1/pools/{token_a}/{token_b}/quote",
    tag = "Swaps",
    summary = "Get swap quote",
    description = "Returns the output a swap would produce right now, without executing it. The pool state is not modified.",
    params(
        ("token_a" = String, Path, description = "Hex-encoded address of one token"),
        ("token_b" = String, Path, description = "Hex-encoded address of the other token"),
    ),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote computed", body = QuoteResponse),
        (status = 400, description = "Invalid swap parameters", body = ErrorResponse),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn quote_swap(
    State(state): State<AppState>,
    Path((token_a, token_b)): Path<(String, String)>,
    Json(req): Json<QuoteRequest>,
) -> Result<impl IntoResponse, DexError> {
    let token_a = parse_address("token_a", &token_a)?;
    let token_b = parse_address("token_b", &token_b)?;
    let token_in = parse_address("token_in", &req.token_in)?;
    let token_out = resolve_token_out(token_a, token_b, token_in)?;

    let amount_in = parse_amount("amount_in", &req.amount_in)?;

    let quote = state
        .dex_service
        .quote(token_in, token_out, amount_in)
        .await?;

    Ok(Json(QuoteResponse::from(quote)))
}

/// Swap routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools/{token_a}/{token_b}/swap", post(execute_swap))
        .route("/pools/{token_a}/{token_b}/quote", post(quote_swap))
}

/// Matches `token_in` against the path tokens and returns its counterpart.
fn resolve_token_out(
    token_a: Address,
    token_b: Address,
    token_in: Address,
) -> Result<Address, DexError> {
    if token_in == token_a {
        Ok(token_b)
    } else if token_in == token_b {
        Ok(token_a)
    } else {
        Err(DexError::InvalidRequest(format!(
            "token_in {token_in} is not one of the pair tokens"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn resolves_counterpart_in_both_directions() {
        assert_eq!(resolve_token_out(addr(1), addr(2), addr(1)), Ok(addr(2)));
        assert_eq!(resolve_token_out(addr(1), addr(2), addr(2)), Ok(addr(1)));
    }

    #[test]
    fn rejects_foreign_input_token() {
        assert!(resolve_token_out(addr(1), addr(2), addr(3)).is_err());
    }
}
