//! # dex-ledger
//!
//! REST API and WebSocket server for a token registry and
//! constant-product exchange.
//!
//! The instance owns everything: a registry of created tokens, an
//! in-memory fungible-token ledger, and at most one liquidity pool per
//! token pair. Pools price swaps with the `x · y = k` invariant, charge
//! a proportional input-side fee, and account provider ownership with
//! liquidity shares.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── DexService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── TokenRegistry / PoolRegistry (domain/)
//!     ├── LiquidityPool engine (domain/)
//!     │
//!     └── TokenBank ledger (bank/)
//! ```

pub mod api;
pub mod app_state;
pub mod bank;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
