//! Append-only token ledger with a per-creator index.
//!
//! [`TokenRegistry`] owns every [`TokenRecord`] on the instance. Records
//! are appended in creation order and never updated or removed; reads
//! return fresh snapshots, never live views.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::{Address, TokenRecord};
use crate::error::DexError;

/// Prefix byte for registry-derived token addresses.
const TOKEN_ADDR_PREFIX: u8 = 0xDA;

#[derive(Debug, Default)]
struct RegistryState {
    records: Vec<TokenRecord>,
    by_address: HashMap<Address, usize>,
    by_creator: HashMap<Address, Vec<usize>>,
    next_nonce: u64,
}

/// Deterministic token factory and provenance ledger.
///
/// Addresses are minted from a monotonic per-instance counter, so token
/// creation is deterministic and addresses never collide.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    inner: RwLock<RegistryState>,
}

impl TokenRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new token, minting its address and appending the record.
    ///
    /// The caller is responsible for crediting `initial_supply` to
    /// `creator` on the fungible-token ledger; the registry records
    /// provenance only.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Validation`] on an empty name, empty symbol,
    /// or zero supply.
    pub async fn create(
        &self,
        name: &str,
        symbol: &str,
        initial_supply: u128,
        creator: Address,
    ) -> Result<TokenRecord, DexError> {
        let name = name.trim();
        let symbol = symbol.trim();
        if name.is_empty() {
            return Err(DexError::Validation("token name must not be empty".to_string()));
        }
        if symbol.is_empty() {
            return Err(DexError::Validation(
                "token symbol must not be empty".to_string(),
            ));
        }
        if initial_supply == 0 {
            return Err(DexError::Validation(
                "initial supply must be greater than zero".to_string(),
            ));
        }

        let mut state = self.inner.write().await;
        let address = derive_address(state.next_nonce);
        state.next_nonce += 1;

        let record = TokenRecord {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            creator,
            initial_supply,
            created_at: Utc::now(),
        };

        let index = state.records.len();
        state.records.push(record.clone());
        state.by_address.insert(address, index);
        state.by_creator.entry(creator).or_default().push(index);

        Ok(record)
    }

    /// Returns a snapshot of all records in creation order.
    pub async fn all(&self) -> Vec<TokenRecord> {
        self.inner.read().await.records.clone()
    }

    /// Returns a snapshot of `creator`'s records, preserving creation order.
    pub async fn by_creator(&self, creator: Address) -> Vec<TokenRecord> {
        let state = self.inner.read().await;
        state
            .by_creator
            .get(&creator)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|&i| state.records.get(i).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Looks up a single record by address.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::TokenNotFound`] if no token has this address.
    pub async fn get(&self, address: Address) -> Result<TokenRecord, DexError> {
        let state = self.inner.read().await;
        state
            .by_address
            .get(&address)
            .and_then(|&i| state.records.get(i).cloned())
            .ok_or(DexError::TokenNotFound(address))
    }

    /// Returns `true` if a token with this address is registered.
    pub async fn contains(&self, address: Address) -> bool {
        self.inner.read().await.by_address.contains_key(&address)
    }

    /// Returns the number of registered tokens.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Returns `true` if no tokens have been created.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

/// Derives a token address from the registry counter: a fixed prefix
/// byte followed by the counter in big-endian in the trailing bytes.
fn derive_address(nonce: u64) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = TOKEN_ADDR_PREFIX;
    let be = nonce.to_be_bytes();
    for (slot, byte) in bytes.iter_mut().skip(12).zip(be) {
        *slot = byte;
    }
    Address::from_bytes(bytes)
}
