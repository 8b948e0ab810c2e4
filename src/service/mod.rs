//! Service layer orchestrating registries, the token ledger, and events.

pub mod dex_service;

pub use dex_service::{AddLiquidityOutcome, DexService, RemoveLiquidityOutcome, SwapOutcome};
