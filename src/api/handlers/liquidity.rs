//! Liquidity operation handlers: add, remove.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{
    AddLiquidityRequest, AddLiquidityResponse, RemoveLiquidityRequest, RemoveLiquidityResponse,
    parse_address, parse_amount,
};
use crate::app_state::AppState;
use crate::error::DexError;

/// `POST /pools/{token_a}/{token_b}/liquidity/add` — Deposit liquidity.
async fn add_liquidity(
    State(state): State<AppState>,
    Path((token_a, token_b)): Path<(String, String)>,
    Json(req): Json<AddLiquidityRequest>,
) -> Result<impl IntoResponse, DexError> {
    let token_a = parse_address("token_a", &token_a)?;
    let token_b = parse_address("token_b", &token_b)?;
    let amount_a = parse_amount("amount_a", &req.amount_a)?;
    let amount_b = parse_amount("amount_b", &req.amount_b)?;
    let provider = parse_address("provider", &req.provider)?;

    let outcome = state
        .dex_service
        .add_liquidity(token_a, amount_a, token_b, amount_b, provider)
        .await?;

    Ok(Json(AddLiquidityResponse::from(outcome)))
}

/// `POST /pools/{token_a}/{token_b}/liquidity/remove` — Withdraw liquidity.
async fn remove_liquidity(
    State(state): State<AppState>,
    Path((token_a, token_b)): Path<(String, String)>,
    Json(req): Json<RemoveLiquidityRequest>,
) -> Result<impl IntoResponse, DexError> {
    let token_a = parse_address("token_a", &token_a)?;
    let token_b = parse_address("token_b", &token_b)?;
    let shares = parse_amount("shares", &req.shares)?;
    let provider = parse_address("provider", &req.provider)?;

    let outcome = state
        .dex_service
        .remove_liquidity(token_a, token_b, shares, provider)
        .await?;

    Ok(Json(RemoveLiquidityResponse::from(outcome)))
}

/// Liquidity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pools/{token_a}/{token_b}/liquidity/add",
            post(add_liquidity),
        )
        .route(
            "/pools/{token_a}/{token_b}/liquidity/remove",
            post(remove_liquidity),
        )
}
