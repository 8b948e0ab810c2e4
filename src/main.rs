//! dex-ledger server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use dex_ledger::api;
use dex_ledger::app_state::AppState;
use dex_ledger::bank::MemoryBank;
use dex_ledger::config::DexConfig;
use dex_ledger::domain::{Address, EventBus, FeeBps, PoolRegistry, TokenRegistry};
use dex_ledger::service::DexService;
use dex_ledger::ws::handler::ws_handler;

/// Account the demo tokens are minted to when seeding is enabled.
const DEMO_OPERATOR: Address = Address::from_bytes([0x0A; 20]);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = DexConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting dex-ledger");

    let fee =
        FeeBps::new(config.swap_fee_bps).map_err(|e| anyhow::anyhow!("SWAP_FEE_BPS: {e}"))?;

    // Build domain layer
    let tokens = Arc::new(TokenRegistry::new());
    let pools = Arc::new(PoolRegistry::new());
    let bank = Arc::new(MemoryBank::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let dex_service = Arc::new(DexService::new(
        tokens,
        pools,
        bank,
        event_bus.clone(),
        fee,
        config.ratio_tolerance_bps,
    ));

    if config.seed_demo_tokens {
        seed_demo_tokens(&dex_service).await?;
    }

    // Build application state
    let app_state = AppState {
        dex_service,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Creates a small set of well-known tokens for local experimentation.
async fn seed_demo_tokens(service: &DexService) -> anyhow::Result<()> {
    let seeds: [(&str, &str, u128); 3] = [
        ("USD Coin", "USDC", 1_000_000),
        ("Wrapped Bitcoin", "WBTC", 21_000),
        ("Chainlink", "LINK", 1_000_000_000),
    ];
    for (name, symbol, supply) in seeds {
        let record = service
            .create_token(name, symbol, supply, DEMO_OPERATOR)
            .await
            .map_err(|e| anyhow::anyhow!("seeding {symbol}: {e}"))?;
        tracing::info!(token = %record.address, symbol, supply, "seeded demo token");
    }
    Ok(())
}
