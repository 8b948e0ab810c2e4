//! System endpoints: health check and fee configuration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Fee configuration response.
#[derive(Debug, Serialize, ToSchema)]
struct FeeConfigResponse {
    swap_fee_bps: u16,
    ratio_tolerance_bps: u16,
}

/// `GET /config/fees` — Instance-wide fee parameters.
#[utoipa::path(
    get,
    path = "/config/fees",
    tag = "System",
    summary = "Fee configuration",
    description = "Returns the swap fee and the deposit ratio tolerance, both in basis points. These are fixed for the lifetime of the instance.",
    responses(
        (status = 200, description = "Fee parameters", body = FeeConfigResponse),
    )
)]
pub async fn fees_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(FeeConfigResponse {
            swap_fee_bps: state.dex_service.fee().get(),
            ratio_tolerance_bps: state.dex_service.ratio_tolerance_bps(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/fees", get(fees_handler))
}
