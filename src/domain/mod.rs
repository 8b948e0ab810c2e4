//! Domain layer: core types, registries, pool engine, and event system.
//!
//! This module contains the exchange's domain model: ledger addresses
//! and amounts, the token registry, the constant-product pool engine
//! with its per-pair registry, and the event bus for broadcasting state
//! changes.

pub mod address;
pub mod amount;
pub mod dex_event;
pub mod event_bus;
pub mod fee;
pub mod pair;
pub mod pool;
pub mod pool_entry;
pub mod pool_registry;
pub mod token;
pub mod token_registry;

pub use address::Address;
pub use amount::{Amount, Rounding};
pub use dex_event::DexEvent;
pub use event_bus::EventBus;
pub use fee::{BPS_DENOMINATOR, FeeBps};
pub use pair::PairKey;
pub use pool::{AddQuote, LiquidityPool, RemoveQuote, SwapQuote};
pub use pool_entry::{PoolEntry, PoolSummary};
pub use pool_registry::PoolRegistry;
pub use token::TokenRecord;
pub use token_registry::TokenRegistry;
