//! Token registry handlers: create, list, filter by creator, balances.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BalanceResponse, CreateTokenRequest, PaginationParams, TokenDto, TokenListResponse,
    parse_address, parse_amount,
};
use crate::app_state::AppState;
use crate::domain::TokenRecord;
use crate::error::{DexError, ErrorResponse};

/// `POST /tokens` — Create a new token.
///
/// # Errors
///
/// Returns [`DexError::Validation`] on empty name/symbol or zero supply.
#[utoipa::path(
    post,
    path = "/api/v1/tokens",
    tag = "Tokens",
    summary = "Create a token",
    description = "Creates a token with the given name, symbol, and initial supply. The full supply is minted to the creator and the token is recorded in the instance-wide registry.",
    request_body = CreateTokenRequest,
    responses(
        (status = 201, description = "Token created", body = TokenDto),
        (status = 400, description = "Invalid token parameters", body = ErrorResponse),
    )
)]
pub async fn create_token(
    State(state): State<AppState>,
    Json(req): Json<CreateTokenRequest>,
) -> Result<impl IntoResponse, DexError> {
    let creator = parse_address("creator", &req.creator)?;
    let initial_supply = parse_amount("initial_supply", &req.initial_supply)?;

    let record = state
        .dex_service
        .create_token(&req.name, &req.symbol, initial_supply, creator)
        .await?;

    Ok((StatusCode::CREATED, Json(TokenDto::from(record))))
}

/// `GET /tokens` — List all tokens in creation order.
#[utoipa::path(
    get,
    path = "/api/v1/tokens",
    tag = "Tokens",
    summary = "List tokens",
    description = "Returns a paginated list of every token on the instance, in creation order.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated token list", body = TokenListResponse),
    )
)]
pub async fn list_tokens(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, DexError> {
    let records = state.dex_service.all_tokens().await;
    Ok(Json(paginate(records, &params)))
}

/// `GET /tokens/creator/{address}` — List tokens created by one account.
pub async fn tokens_by_creator(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, DexError> {
    let creator = parse_address("address", &address)?;
    let records = state.dex_service.user_tokens(creator).await;
    Ok(Json(paginate(records, &params)))
}

/// `GET /tokens/{token}/balance/{holder}` — Read a token balance.
pub async fn token_balance(
    State(state): State<AppState>,
    Path((token, holder)): Path<(String, String)>,
) -> Result<impl IntoResponse, DexError> {
    let token = parse_address("token", &token)?;
    let holder = parse_address("holder", &holder)?;

    let balance = state.dex_service.balance_of(token, holder).await?;
    Ok(Json(BalanceResponse {
        token: token.to_string(),
        holder: holder.to_string(),
        balance: balance.to_string(),
    }))
}

fn paginate(records: Vec<TokenRecord>, params: &PaginationParams) -> TokenListResponse {
    let params = params.clamped();
    let total = u32::try_from(records.len()).unwrap_or(u32::MAX);
    let start = u64::from(params.page - 1) * u64::from(params.per_page);

    let data: Vec<TokenDto> = records
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(params.per_page as usize)
        .map(TokenDto::from)
        .collect();

    TokenListResponse {
        data,
        pagination: params.meta(total),
    }
}

/// Token routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", post(create_token).get(list_tokens))
        .route("/tokens/creator/{address}", get(tokens_by_creator))
        .route("/tokens/{token}/balance/{holder}", get(token_balance))
}
