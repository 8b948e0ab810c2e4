//! Concurrent pool storage with per-pool fine-grained locking.
//!
//! [`PoolRegistry`] stores all active pools in a `HashMap` keyed by the
//! canonical [`PairKey`], where each entry is individually protected by
//! a [`tokio::sync::RwLock`]. This allows concurrent reads on the same
//! pool and concurrent writes on different pools.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::pool_entry::{PoolEntry, PoolSummary};
use super::{Address, FeeBps, LiquidityPool, PairKey};
use crate::error::DexError;

/// Prefix byte for registry-derived pool vault addresses.
const VAULT_ADDR_PREFIX: u8 = 0xF0;

#[derive(Debug, Default)]
struct RegistryState {
    pools: HashMap<PairKey, Arc<RwLock<PoolEntry>>>,
    next_nonce: u64,
}

/// Central store for all active pools, at most one per pair.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<PoolEntry>>` for fine-grained per-pool locking.
///
/// # Concurrency
///
/// - Multiple tasks may read the same pool concurrently.
/// - Writes to different pools are concurrent.
/// - Writes to the same pool are serialized.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    inner: RwLock<RegistryState>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pool for `pair`, creating an empty one if absent.
    ///
    /// The boolean is `true` when this call created the pool. Creation
    /// is idempotent: a second call for the same pair returns the
    /// existing entry untouched.
    pub async fn get_or_create(
        &self,
        pair: PairKey,
        fee: FeeBps,
    ) -> (Arc<RwLock<PoolEntry>>, bool) {
        let mut state = self.inner.write().await;
        if let Some(existing) = state.pools.get(&pair) {
            return (Arc::clone(existing), false);
        }
        let vault = derive_vault(state.next_nonce);
        state.next_nonce += 1;
        let entry = Arc::new(RwLock::new(PoolEntry::new(
            LiquidityPool::new(pair, fee),
            vault,
        )));
        state.pools.insert(pair, Arc::clone(&entry));
        (entry, true)
    }

    /// Returns a shared reference to the pool entry behind a per-pool lock.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolNotFound`] if no pool exists for `pair`.
    pub async fn get(&self, pair: PairKey) -> Result<Arc<RwLock<PoolEntry>>, DexError> {
        let state = self.inner.read().await;
        state
            .pools
            .get(&pair)
            .cloned()
            .ok_or_else(|| DexError::PoolNotFound(pair.to_string()))
    }

    /// Returns summaries of all pools.
    ///
    /// Ordering is unspecified; callers sort if they need stable output.
    pub async fn list(&self) -> Vec<PoolSummary> {
        let state = self.inner.read().await;
        let mut summaries = Vec::with_capacity(state.pools.len());
        for entry_lock in state.pools.values() {
            let entry = entry_lock.read().await;
            summaries.push(PoolSummary::from(&*entry));
        }
        summaries
    }

    /// Returns the number of pools in the registry.
    pub async fn len(&self) -> usize {
        self.inner.read().await.pools.len()
    }

    /// Returns `true` if the registry contains no pools.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.pools.is_empty()
    }
}

/// Returns `true` for registry-derived pool vault addresses.
///
/// Vaults are internal accounts: reserves are only backed by tokens the
/// pool itself moved in, so a vault must never appear as the
/// counterparty of a user-facing operation.
#[must_use]
pub fn is_vault_address(address: Address) -> bool {
    address.as_bytes()[0] == VAULT_ADDR_PREFIX
}

/// Derives a vault address from the registry counter: a fixed prefix
/// byte followed by the counter in big-endian in the trailing bytes.
fn derive_vault(nonce: u64) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = VAULT_ADDR_PREFIX;
    let be = nonce.to_be_bytes();
    for (slot, byte) in bytes.iter_mut().skip(12).zip(be) {
        *slot = byte;
    }
    Address::from_bytes(bytes)
}
