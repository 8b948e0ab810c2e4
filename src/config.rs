//! Server configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

/// Top-level exchange configuration.
///
/// Loaded once at startup via [`DexConfig::from_env`]. The fee and
/// tolerance parameters are fixed for the lifetime of the instance;
/// every pool created afterwards inherits them.
#[derive(Debug, Clone)]
pub struct DexConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Swap fee in basis points, applied to the input side.
    pub swap_fee_bps: u16,

    /// Allowed deviation of a follow-on deposit from the reserve ratio,
    /// in basis points.
    pub ratio_tolerance_bps: u16,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Whether to create a set of demo tokens at startup.
    pub seed_demo_tokens: bool,
}

impl DexConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let swap_fee_bps = parse_env("SWAP_FEE_BPS", 30);
        let ratio_tolerance_bps = parse_env("RATIO_TOLERANCE_BPS", 100);
        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 10_000);
        let seed_demo_tokens = parse_env_bool("SEED_DEMO_TOKENS", false);

        Ok(Self {
            listen_addr,
            swap_fee_bps,
            ratio_tolerance_bps,
            event_bus_capacity,
            seed_demo_tokens,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some("true") | Some("TRUE") | Some("1") => true,
        Some("false") | Some("FALSE") | Some("0") => false,
        _ => default,
    }
}
