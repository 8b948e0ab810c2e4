//! Pool handlers: create, list, get.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreatePoolRequest, CreatePoolResponse, PaginationParams, PoolDto, PoolListResponse,
    parse_address,
};
use crate::app_state::AppState;
use crate::error::{DexError, ErrorResponse};

/// `POST /pools` — Create the pool for a token pair.
///
/// # Errors
///
/// Returns [`DexError::TokenNotFound`] for unregistered tokens or
/// [`DexError::InvalidPair`] for identical ones.
#[utoipa::path(
    post,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "Create a pool",
    description = "Creates the constant-product pool for a pair of registered tokens. Token order does not matter; at most one pool exists per pair and a repeated request returns the existing pool with `created: false`.",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created", body = CreatePoolResponse),
        (status = 200, description = "Pool already existed", body = CreatePoolResponse),
        (status = 400, description = "Invalid pair", body = ErrorResponse),
        (status = 404, description = "Token not registered", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    Json(req): Json<CreatePoolRequest>,
) -> Result<impl IntoResponse, DexError> {
    let token_a = parse_address("token_a", &req.token_a)?;
    let token_b = parse_address("token_b", &req.token_b)?;

    let (summary, created) = state.dex_service.create_pool(token_a, token_b).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let response = CreatePoolResponse {
        pool: PoolDto::from(summary),
        created,
    };
    Ok((status, Json(response)))
}

/// `GET /pools` — List all pools.
#[utoipa::path(
    get,
    path = "/api/v1/pools",
    tag = "Pools",
    summary = "List pools",
    description = "Returns a paginated list of all pools, sorted by canonical pair key.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated pool list", body = PoolListResponse),
    )
)]
pub async fn list_pools(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, DexError> {
    let params = params.clamped();
    let summaries = state.dex_service.list_pools().await;

    let total = u32::try_from(summaries.len()).unwrap_or(u32::MAX);
    let start = u64::from(params.page - 1) * u64::from(params.per_page);
    let data: Vec<PoolDto> = summaries
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(params.per_page as usize)
        .map(PoolDto::from)
        .collect();

    Ok(Json(PoolListResponse {
        data,
        pagination: params.meta(total),
    }))
}

/// `GET /pools/{token_a}/{token_b}` — Get one pool's state.
///
/// # Errors
///
/// Returns [`DexError::PoolNotFound`] if no pool exists for the pair.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{token_a}/{token_b}",
    tag = "Pools",
    summary = "Get pool state",
    description = "Returns reserves, shares, and metadata for the pool of the given pair. Tokens may be given in either order.",
    params(
        ("token_a" = String, Path, description = "Hex-encoded address of one token"),
        ("token_b" = String, Path, description = "Hex-encoded address of the other token"),
    ),
    responses(
        (status = 200, description = "Pool state", body = PoolDto),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path((token_a, token_b)): Path<(String, String)>,
) -> Result<impl IntoResponse, DexError> {
    let token_a = parse_address("token_a", &token_a)?;
    let token_b = parse_address("token_b", &token_b)?;

    let summary = state.dex_service.pool_detail(token_a, token_b).await?;
    Ok(Json(PoolDto::from(summary)))
}

/// Pool management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", post(create_pool).get(list_pools))
        .route("/pools/{token_a}/{token_b}", get(get_pool))
}
