//! Exchange service: orchestrates token and pool operations and emits events.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::bank::TokenBank;
use crate::domain::pool::AddQuote;
use crate::domain::pool_entry::{PoolEntry, PoolSummary};
use crate::domain::pool_registry::is_vault_address;
use crate::domain::{
    Address, Amount, DexEvent, EventBus, FeeBps, PairKey, PoolRegistry, SwapQuote, TokenRecord,
    TokenRegistry,
};
use crate::error::DexError;

/// Result of a committed liquidity deposit, in canonical pair order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddLiquidityOutcome {
    /// Canonical pair key.
    pub pair: PairKey,
    /// Deposit of the pair's first token.
    pub amount_a: u128,
    /// Deposit of the pair's second token.
    pub amount_b: u128,
    /// Shares minted to the provider.
    pub shares_minted: u128,
    /// Outstanding shares after the deposit.
    pub total_shares: u128,
    /// Reserve of the first token after the deposit.
    pub reserve_a: u128,
    /// Reserve of the second token after the deposit.
    pub reserve_b: u128,
}

/// Result of a committed liquidity withdrawal, in canonical pair order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveLiquidityOutcome {
    /// Canonical pair key.
    pub pair: PairKey,
    /// Payout of the pair's first token.
    pub amount_a: u128,
    /// Payout of the pair's second token.
    pub amount_b: u128,
    /// Shares burned.
    pub shares_burned: u128,
    /// Outstanding shares after the withdrawal.
    pub total_shares: u128,
    /// Reserve of the first token after the withdrawal.
    pub reserve_a: u128,
    /// Reserve of the second token after the withdrawal.
    pub reserve_b: u128,
}

/// Result of a committed swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Server-assigned correlation ID.
    pub command_id: String,
    /// Canonical pair key.
    pub pair: PairKey,
    /// Input token.
    pub token_in: Address,
    /// Output token.
    pub token_out: Address,
    /// Gross input amount, fee included.
    pub amount_in: u128,
    /// Fee retained by the pool.
    pub fee: u128,
    /// Output amount transferred to the trader.
    pub amount_out: u128,
    /// Reserve of the pair's first token after the trade.
    pub reserve_a: u128,
    /// Reserve of the pair's second token after the trade.
    pub reserve_b: u128,
}

/// Orchestration layer for all exchange operations.
///
/// Stateless coordinator: owns references to the [`TokenRegistry`] and
/// [`PoolRegistry`] for state, the [`TokenBank`] for balance movements,
/// and the [`EventBus`] for event emission. Every mutation method
/// follows the pattern: acquire lock → quote → transfer → commit →
/// update metadata → emit events → return result. Bank calls are
/// synchronous, so no lock is ever held across an await point inside a
/// mutation.
#[derive(Debug, Clone)]
pub struct DexService {
    tokens: Arc<TokenRegistry>,
    pools: Arc<PoolRegistry>,
    bank: Arc<dyn TokenBank>,
    event_bus: EventBus,
    fee: FeeBps,
    ratio_tolerance_bps: u16,
}

impl DexService {
    /// Creates a new `DexService`.
    #[must_use]
    pub fn new(
        tokens: Arc<TokenRegistry>,
        pools: Arc<PoolRegistry>,
        bank: Arc<dyn TokenBank>,
        event_bus: EventBus,
        fee: FeeBps,
        ratio_tolerance_bps: u16,
    ) -> Self {
        Self {
            tokens,
            pools,
            bank,
            event_bus,
            fee,
            ratio_tolerance_bps,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the pool registry.
    #[must_use]
    pub fn pools(&self) -> &Arc<PoolRegistry> {
        &self.pools
    }

    /// Returns the instance-wide swap fee.
    #[must_use]
    pub const fn fee(&self) -> FeeBps {
        self.fee
    }

    /// Returns the ratio tolerance applied to follow-on deposits.
    #[must_use]
    pub const fn ratio_tolerance_bps(&self) -> u16 {
        self.ratio_tolerance_bps
    }

    /// Rejects registry-derived vault addresses as counterparties.
    ///
    /// Vault balances only move through pool operations; letting a vault
    /// act as creator, provider, or trader would desynchronize reserves
    /// from the tokens actually held.
    fn ensure_user_account(account: Address) -> Result<(), DexError> {
        if is_vault_address(account) {
            return Err(DexError::InvalidRequest(format!(
                "account {account} is a reserved pool vault"
            )));
        }
        Ok(())
    }

    // -- tokens -------------------------------------------------------------

    /// Creates a token and mints its full initial supply to `creator`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Validation`] for bad inputs,
    /// [`DexError::InvalidRequest`] for a vault creator, or
    /// [`DexError::TransferFailed`] if the mint is rejected.
    pub async fn create_token(
        &self,
        name: &str,
        symbol: &str,
        initial_supply: u128,
        creator: Address,
    ) -> Result<TokenRecord, DexError> {
        Self::ensure_user_account(creator)?;
        let record = self
            .tokens
            .create(name, symbol, initial_supply, creator)
            .await?;

        self.bank.register(record.address);
        self.bank.mint(record.address, creator, initial_supply)?;

        let _ = self.event_bus.publish(DexEvent::TokenCreated {
            token: record.address.to_string(),
            symbol: record.symbol.clone(),
            creator: creator.to_string(),
            initial_supply: initial_supply.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(token = %record.address, symbol = %record.symbol, "token created");
        Ok(record)
    }

    /// Returns all tokens in creation order.
    pub async fn all_tokens(&self) -> Vec<TokenRecord> {
        self.tokens.all().await
    }

    /// Returns the tokens created by `creator`, in creation order.
    pub async fn user_tokens(&self, creator: Address) -> Vec<TokenRecord> {
        self.tokens.by_creator(creator).await
    }

    /// Looks up a token record by address.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::TokenNotFound`] for an unknown address.
    pub async fn token(&self, address: Address) -> Result<TokenRecord, DexError> {
        self.tokens.get(address).await
    }

    /// Returns `holder`'s balance of a registered token.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::TokenNotFound`] for an unknown token.
    pub async fn balance_of(&self, token: Address, holder: Address) -> Result<u128, DexError> {
        if !self.tokens.contains(token).await {
            return Err(DexError::TokenNotFound(token));
        }
        Ok(self.bank.balance_of(token, holder))
    }

    // -- pools --------------------------------------------------------------

    /// Creates the pool for a pair, or returns the existing one.
    ///
    /// Idempotent: the boolean is `true` only when this call created the
    /// pool. Both tokens must already exist in the registry.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::TokenNotFound`] for an unregistered token or
    /// [`DexError::InvalidPair`] when both addresses are equal.
    pub async fn create_pool(
        &self,
        token_1: Address,
        token_2: Address,
    ) -> Result<(PoolSummary, bool), DexError> {
        for token in [token_1, token_2] {
            if !self.tokens.contains(token).await {
                return Err(DexError::TokenNotFound(token));
            }
        }
        let pair = PairKey::new(token_1, token_2)?;

        let (entry_lock, created) = self.pools.get_or_create(pair, self.fee).await;
        let summary = PoolSummary::from(&*entry_lock.read().await);

        if created {
            let _ = self.event_bus.publish(DexEvent::PoolCreated {
                pair,
                fee_bps: self.fee.get(),
                timestamp: Utc::now(),
            });
            tracing::info!(%pair, fee = %self.fee, "pool created");
        }
        Ok((summary, created))
    }

    /// Returns summaries of all pools, sorted by pair key for stable output.
    pub async fn list_pools(&self) -> Vec<PoolSummary> {
        let mut summaries = self.pools.list().await;
        summaries.sort_by_key(|s| s.pair.to_string());
        summaries
    }

    /// Returns the summary for one pool.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolNotFound`] if no pool exists for the pair
    /// or [`DexError::InvalidPair`] when both addresses are equal.
    pub async fn pool_detail(
        &self,
        token_1: Address,
        token_2: Address,
    ) -> Result<PoolSummary, DexError> {
        let pair = PairKey::new(token_1, token_2)?;
        let entry_lock = self.pools.get(pair).await?;
        let entry = entry_lock.read().await;
        Ok(PoolSummary::from(&*entry))
    }

    /// Returns `provider`'s share balance in a pool.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::PoolNotFound`] if no pool exists for the pair.
    pub async fn shares_of(
        &self,
        token_1: Address,
        token_2: Address,
        provider: Address,
    ) -> Result<u128, DexError> {
        let pair = PairKey::new(token_1, token_2)?;
        let entry_lock = self.pools.get(pair).await?;
        let entry = entry_lock.read().await;
        Ok(entry.pool.shares_of(provider))
    }

    // -- liquidity ----------------------------------------------------------

    /// Deposits liquidity into the pool for `(token_1, token_2)`.
    ///
    /// Amounts follow the caller's token order and are mapped onto the
    /// canonical pair internally. Tokens move from `provider` to the
    /// pool vault before the reserves are committed; if the second leg
    /// fails, the first is returned and the pool is untouched.
    ///
    /// # Errors
    ///
    /// Propagates quote errors ([`DexError::ZeroAmount`],
    /// [`DexError::RatioMismatch`], ...),
    /// [`DexError::InvalidRequest`] for a vault provider, and
    /// [`DexError::TransferFailed`] when the provider cannot cover a
    /// deposit leg.
    pub async fn add_liquidity(
        &self,
        token_1: Address,
        amount_1: u128,
        token_2: Address,
        amount_2: u128,
        provider: Address,
    ) -> Result<AddLiquidityOutcome, DexError> {
        Self::ensure_user_account(provider)?;
        let pair = PairKey::new(token_1, token_2)?;
        let (amount_a, amount_b) = if token_1 == pair.first() {
            (Amount::new(amount_1), Amount::new(amount_2))
        } else {
            (Amount::new(amount_2), Amount::new(amount_1))
        };

        let entry_lock = self.pools.get(pair).await?;
        let mut entry = entry_lock.write().await;
        if entry.in_flight {
            return Err(DexError::ReentrancyDetected);
        }
        entry.in_flight = true;
        let result = self.add_liquidity_inner(&mut entry, provider, amount_a, amount_b);
        entry.in_flight = false;

        let outcome = result?;
        entry.touch();
        drop(entry);

        let _ = self.event_bus.publish(DexEvent::LiquidityAdded {
            pair,
            provider: provider.to_string(),
            amount_a: outcome.amount_a.to_string(),
            amount_b: outcome.amount_b.to_string(),
            shares_minted: outcome.shares_minted.to_string(),
            total_shares: outcome.total_shares.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            %pair,
            %provider,
            shares = outcome.shares_minted,
            "liquidity added"
        );
        Ok(outcome)
    }

    fn add_liquidity_inner(
        &self,
        entry: &mut PoolEntry,
        provider: Address,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<AddLiquidityOutcome, DexError> {
        let quote = entry
            .pool
            .quote_add(amount_a, amount_b, self.ratio_tolerance_bps)?;
        let pair = entry.pair;
        let vault = entry.vault;

        self.bank
            .transfer(pair.first(), provider, vault, quote.amount_a.get())?;
        if let Err(err) = self
            .bank
            .transfer(pair.second(), provider, vault, quote.amount_b.get())
        {
            // Return the first leg so the provider is made whole.
            let _ = self
                .bank
                .transfer(pair.first(), vault, provider, quote.amount_a.get());
            return Err(err.into());
        }

        if let Err(err) = entry.pool.commit_add(provider, &quote) {
            let _ = self
                .bank
                .transfer(pair.first(), vault, provider, quote.amount_a.get());
            let _ = self
                .bank
                .transfer(pair.second(), vault, provider, quote.amount_b.get());
            return Err(err);
        }

        let (reserve_a, reserve_b) = entry.pool.reserves();
        Ok(AddLiquidityOutcome {
            pair,
            amount_a: quote.amount_a.get(),
            amount_b: quote.amount_b.get(),
            shares_minted: quote.shares_minted,
            total_shares: entry.pool.total_shares(),
            reserve_a: reserve_a.get(),
            reserve_b: reserve_b.get(),
        })
    }

    /// Burns `shares` and pays out the proportional reserves.
    ///
    /// Reserves and share balances are committed before the outbound
    /// transfers, so an observer never sees reserves the withdrawal has
    /// already claimed. If a payout leg fails, the burn is compensated
    /// and the provider keeps their shares.
    ///
    /// # Errors
    ///
    /// Propagates quote errors ([`DexError::ZeroAmount`],
    /// [`DexError::Unauthorized`], ...),
    /// [`DexError::InvalidRequest`] for a vault provider, and
    /// [`DexError::TransferFailed`] on a failed payout leg.
    pub async fn remove_liquidity(
        &self,
        token_1: Address,
        token_2: Address,
        shares: u128,
        provider: Address,
    ) -> Result<RemoveLiquidityOutcome, DexError> {
        Self::ensure_user_account(provider)?;
        let pair = PairKey::new(token_1, token_2)?;

        let entry_lock = self.pools.get(pair).await?;
        let mut entry = entry_lock.write().await;
        if entry.in_flight {
            return Err(DexError::ReentrancyDetected);
        }
        entry.in_flight = true;
        let result = self.remove_liquidity_inner(&mut entry, provider, shares);
        entry.in_flight = false;

        let outcome = result?;
        entry.touch();
        drop(entry);

        let _ = self.event_bus.publish(DexEvent::LiquidityRemoved {
            pair,
            provider: provider.to_string(),
            amount_a: outcome.amount_a.to_string(),
            amount_b: outcome.amount_b.to_string(),
            shares_burned: outcome.shares_burned.to_string(),
            total_shares: outcome.total_shares.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(%pair, %provider, shares, "liquidity removed");
        Ok(outcome)
    }

    fn remove_liquidity_inner(
        &self,
        entry: &mut PoolEntry,
        provider: Address,
        shares: u128,
    ) -> Result<RemoveLiquidityOutcome, DexError> {
        let quote = entry.pool.quote_remove(provider, shares)?;
        let pair = entry.pair;
        let vault = entry.vault;

        entry.pool.commit_remove(provider, &quote)?;

        // Mirror image of the committed burn: restoring is a plain
        // re-deposit of the same amounts and shares. The entry is held
        // under the caller's exclusive lock, so compensation is race-free.
        let restore = AddQuote {
            amount_a: quote.amount_a,
            amount_b: quote.amount_b,
            shares_minted: quote.shares,
        };

        if let Err(err) = self
            .bank
            .transfer(pair.first(), vault, provider, quote.amount_a.get())
        {
            let _ = entry.pool.commit_add(provider, &restore);
            return Err(err.into());
        }
        if let Err(err) = self
            .bank
            .transfer(pair.second(), vault, provider, quote.amount_b.get())
        {
            // Claw back the first leg before restoring the pool.
            let _ = self
                .bank
                .transfer(pair.first(), provider, vault, quote.amount_a.get());
            let _ = entry.pool.commit_add(provider, &restore);
            return Err(err.into());
        }

        let (reserve_a, reserve_b) = entry.pool.reserves();
        Ok(RemoveLiquidityOutcome {
            pair,
            amount_a: quote.amount_a.get(),
            amount_b: quote.amount_b.get(),
            shares_burned: quote.shares,
            total_shares: entry.pool.total_shares(),
            reserve_a: reserve_a.get(),
            reserve_b: reserve_b.get(),
        })
    }

    // -- swaps --------------------------------------------------------------

    /// Executes a swap of `amount_in` of `token_in` against the pool for
    /// `(token_in, token_out)`.
    ///
    /// The trade is priced first, then checked against
    /// `min_amount_out`, and only then are tokens moved: input leg,
    /// reserve commit, output leg, in that order.
    ///
    /// # Errors
    ///
    /// Propagates quote errors, [`DexError::SlippageExceeded`] when the
    /// priced output falls below `min_amount_out`,
    /// [`DexError::InvalidRequest`] for a vault trader, and
    /// [`DexError::TransferFailed`] when the trader cannot cover the
    /// input.
    pub async fn swap(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
        min_amount_out: u128,
        trader: Address,
    ) -> Result<SwapOutcome, DexError> {
        Self::ensure_user_account(trader)?;
        let pair = PairKey::new(token_in, token_out)?;

        let entry_lock = self.pools.get(pair).await?;
        let mut entry = entry_lock.write().await;
        if entry.in_flight {
            return Err(DexError::ReentrancyDetected);
        }
        entry.in_flight = true;
        let result =
            self.swap_inner(&mut entry, trader, token_in, Amount::new(amount_in), min_amount_out);
        entry.in_flight = false;

        let outcome = result?;
        entry.swap_count = entry.swap_count.saturating_add(1);
        entry.total_volume = entry.total_volume.saturating_add(outcome.amount_in);
        entry.touch();
        drop(entry);

        let _ = self.event_bus.publish(DexEvent::SwapExecuted {
            pair,
            command_id: outcome.command_id.clone(),
            trader: trader.to_string(),
            token_in: outcome.token_in.to_string(),
            token_out: outcome.token_out.to_string(),
            amount_in: outcome.amount_in.to_string(),
            amount_out: outcome.amount_out.to_string(),
            fee: outcome.fee.to_string(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            %pair,
            %trader,
            command_id = %outcome.command_id,
            amount_in = outcome.amount_in,
            amount_out = outcome.amount_out,
            "swap executed"
        );
        Ok(outcome)
    }

    fn swap_inner(
        &self,
        entry: &mut PoolEntry,
        trader: Address,
        token_in: Address,
        amount_in: Amount,
        min_amount_out: u128,
    ) -> Result<SwapOutcome, DexError> {
        let quote = entry.pool.quote_swap(token_in, amount_in)?;
        if quote.amount_out.get() < min_amount_out {
            return Err(DexError::SlippageExceeded {
                amount_out: quote.amount_out.get(),
                min_amount_out,
            });
        }

        let vault = entry.vault;
        self.bank
            .transfer(quote.token_in, trader, vault, quote.amount_in.get())?;
        entry.pool.commit_swap(&quote);
        self.bank
            .transfer(quote.token_out, vault, trader, quote.amount_out.get())?;

        Ok(SwapOutcome {
            command_id: Uuid::new_v4().to_string(),
            pair: entry.pair,
            token_in: quote.token_in,
            token_out: quote.token_out,
            amount_in: quote.amount_in.get(),
            fee: quote.fee.get(),
            amount_out: quote.amount_out.get(),
            reserve_a: quote.new_reserve_a.get(),
            reserve_b: quote.new_reserve_b.get(),
        })
    }

    /// Prices a swap without touching any state.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as the mutating swap, minus slippage
    /// and transfer failures.
    pub async fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: u128,
    ) -> Result<SwapQuote, DexError> {
        let pair = PairKey::new(token_in, token_out)?;
        let entry_lock = self.pools.get(pair).await?;
        let entry = entry_lock.read().await;
        entry.pool.quote_swap(token_in, Amount::new(amount_in))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::bank::{BankError, MemoryBank};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    /// Delegates to a [`MemoryBank`] but refuses to move one token once
    /// it is frozen, to exercise payout failure branches.
    #[derive(Debug, Default)]
    struct FrozenTokenBank {
        inner: MemoryBank,
        frozen: std::sync::RwLock<Option<Address>>,
    }

    impl FrozenTokenBank {
        fn freeze(&self, token: Address) {
            if let Ok(mut frozen) = self.frozen.write() {
                *frozen = Some(token);
            }
        }
    }

    impl TokenBank for FrozenTokenBank {
        fn register(&self, token: Address) {
            self.inner.register(token);
        }

        fn mint(&self, token: Address, to: Address, amount: u128) -> Result<(), BankError> {
            self.inner.mint(token, to, amount)
        }

        fn transfer(
            &self,
            token: Address,
            from: Address,
            to: Address,
            amount: u128,
        ) -> Result<(), BankError> {
            let frozen = self.frozen.read().ok().and_then(|f| *f);
            if frozen == Some(token) {
                return Err(BankError::LedgerUnavailable);
            }
            self.inner.transfer(token, from, to, amount)
        }

        fn balance_of(&self, token: Address, holder: Address) -> u128 {
            self.inner.balance_of(token, holder)
        }
    }

    fn make_service() -> DexService {
        DexService::new(
            Arc::new(TokenRegistry::new()),
            Arc::new(PoolRegistry::new()),
            Arc::new(MemoryBank::new()),
            EventBus::new(1000),
            FeeBps::DEFAULT,
            100,
        )
    }

    async fn seeded_pair(service: &DexService, supply: u128) -> (Address, Address) {
        let Ok(a) = service.create_token("Token A", "TKA", supply, addr(0x11)).await else {
            panic!("token creation failed");
        };
        let Ok(b) = service.create_token("Token B", "TKB", supply, addr(0x11)).await else {
            panic!("token creation failed");
        };
        let Ok(_) = service.create_pool(a.address, b.address).await else {
            panic!("pool creation failed");
        };
        (a.address, b.address)
    }

    #[tokio::test]
    async fn create_token_mints_supply_and_emits() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let Ok(record) = service
            .create_token("USD Coin", "USDC", 1_000_000, addr(0x11))
            .await
        else {
            panic!("token creation failed");
        };

        let Ok(balance) = service.balance_of(record.address, addr(0x11)).await else {
            panic!("expected Ok");
        };
        assert_eq!(balance, 1_000_000);

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "token_created");
    }

    #[tokio::test]
    async fn balance_of_unknown_token_fails() {
        let service = make_service();
        assert_eq!(
            service.balance_of(addr(9), addr(0x11)).await,
            Err(DexError::TokenNotFound(addr(9)))
        );
    }

    #[tokio::test]
    async fn create_pool_requires_registered_tokens() {
        let service = make_service();
        let Ok(record) = service.create_token("A", "A", 100, addr(0x11)).await else {
            panic!("token creation failed");
        };
        let result = service.create_pool(record.address, addr(9)).await;
        assert_eq!(result, Err(DexError::TokenNotFound(addr(9))));
    }

    #[tokio::test]
    async fn create_pool_is_idempotent() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;

        let Ok((_, created_again)) = service.create_pool(token_b, token_a).await else {
            panic!("expected Ok");
        };
        assert!(!created_again);
        assert_eq!(service.pools().len().await, 1);
    }

    #[tokio::test]
    async fn add_liquidity_moves_tokens_into_vault() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;

        let Ok(outcome) = service
            .add_liquidity(token_a, 100_000, token_b, 400_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };
        assert_eq!(outcome.shares_minted, 200_000); // isqrt(100_000 * 400_000)

        let Ok(left_a) = service.balance_of(token_a, addr(0x11)).await else {
            panic!("expected Ok");
        };
        assert_eq!(left_a, 900_000);

        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.reserve_a + detail.reserve_b, 500_000);
    }

    #[tokio::test]
    async fn add_liquidity_insufficient_balance_rolls_back() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000).await;

        // Second leg exceeds the creator's balance.
        let result = service
            .add_liquidity(token_a, 500, token_b, 5_000, addr(0x11))
            .await;
        assert!(matches!(result, Err(DexError::TransferFailed(_))));

        let (Ok(bal_a), Ok(bal_b)) = (
            service.balance_of(token_a, addr(0x11)).await,
            service.balance_of(token_b, addr(0x11)).await,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(bal_a, 1_000);
        assert_eq!(bal_b, 1_000);

        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.total_shares, 0);
    }

    #[tokio::test]
    async fn remove_liquidity_round_trip() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;

        let Ok(added) = service
            .add_liquidity(token_a, 100_000, token_b, 100_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };
        let Ok(removed) = service
            .remove_liquidity(token_a, token_b, added.shares_minted, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };
        assert_eq!(removed.amount_a, 100_000);
        assert_eq!(removed.amount_b, 100_000);
        assert_eq!(removed.total_shares, 0);

        let Ok(balance) = service.balance_of(token_a, addr(0x11)).await else {
            panic!("expected Ok");
        };
        assert_eq!(balance, 1_000_000);
    }

    #[tokio::test]
    async fn vault_is_rejected_as_counterparty() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;
        let Ok(_) = service
            .add_liquidity(token_a, 1_000, token_b, 1_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };

        let Ok(pair) = PairKey::new(token_a, token_b) else {
            panic!("valid pair");
        };
        let Ok(entry_lock) = service.pools().get(pair).await else {
            panic!("expected Ok");
        };
        let vault = entry_lock.read().await.vault;

        // A swap naming the vault as trader would bump reserves without
        // any tokens arriving (the ledger treats self-transfers as
        // validate-only no-ops), leaving reserves unbacked.
        let result = service.swap(token_a, token_b, 100, 0, vault).await;
        assert!(matches!(result, Err(DexError::InvalidRequest(_))));
        let result = service.add_liquidity(token_a, 100, token_b, 100, vault).await;
        assert!(matches!(result, Err(DexError::InvalidRequest(_))));
        let result = service.remove_liquidity(token_a, token_b, 1, vault).await;
        assert!(matches!(result, Err(DexError::InvalidRequest(_))));
        let result = service.create_token("Vault Coin", "VLT", 1, vault).await;
        assert!(matches!(result, Err(DexError::InvalidRequest(_))));

        // Reserves stayed fully backed by the vault's holdings.
        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.reserve_a, 1_000);
        assert_eq!(detail.swap_count, 0);
        assert_eq!(service.balance_of(token_a, vault).await, Ok(1_000));
        assert_eq!(service.balance_of(token_b, vault).await, Ok(1_000));
    }

    #[tokio::test]
    async fn remove_liquidity_failed_second_leg_restores_everything() {
        let bank = Arc::new(FrozenTokenBank::default());
        let service = DexService::new(
            Arc::new(TokenRegistry::new()),
            Arc::new(PoolRegistry::new()),
            Arc::clone(&bank) as Arc<dyn TokenBank>,
            EventBus::new(1000),
            FeeBps::DEFAULT,
            100,
        );
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;
        let Ok(added) = service
            .add_liquidity(token_a, 10_000, token_b, 10_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };

        let Ok(pair) = PairKey::new(token_a, token_b) else {
            panic!("valid pair");
        };
        bank.freeze(pair.second());

        let result = service
            .remove_liquidity(token_a, token_b, added.shares_minted, addr(0x11))
            .await;
        assert_eq!(
            result,
            Err(DexError::TransferFailed(BankError::LedgerUnavailable))
        );

        // Shares, reserves, and the already-paid first leg are all back.
        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.reserve_a, 10_000);
        assert_eq!(detail.reserve_b, 10_000);
        assert_eq!(detail.total_shares, 10_000);
        assert_eq!(
            service.shares_of(token_a, token_b, addr(0x11)).await,
            Ok(added.shares_minted)
        );
        let Ok(balance) = service.balance_of(pair.first(), addr(0x11)).await else {
            panic!("expected Ok");
        };
        assert_eq!(balance, 990_000);
    }

    #[tokio::test]
    async fn remove_liquidity_failed_first_leg_restores_pool() {
        let bank = Arc::new(FrozenTokenBank::default());
        let service = DexService::new(
            Arc::new(TokenRegistry::new()),
            Arc::new(PoolRegistry::new()),
            Arc::clone(&bank) as Arc<dyn TokenBank>,
            EventBus::new(1000),
            FeeBps::DEFAULT,
            100,
        );
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;
        let Ok(added) = service
            .add_liquidity(token_a, 10_000, token_b, 10_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };

        let Ok(pair) = PairKey::new(token_a, token_b) else {
            panic!("valid pair");
        };
        bank.freeze(pair.first());

        let result = service
            .remove_liquidity(token_a, token_b, added.shares_minted, addr(0x11))
            .await;
        assert!(matches!(result, Err(DexError::TransferFailed(_))));

        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.reserve_a, 10_000);
        assert_eq!(detail.reserve_b, 10_000);
        assert_eq!(detail.total_shares, 10_000);
    }

    #[tokio::test]
    async fn swap_moves_tokens_and_counts() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;
        let Ok(_) = service
            .add_liquidity(token_a, 1_000, token_b, 1_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };

        let trader = addr(0x22);
        let Ok(()) = service.bank.transfer(token_a, addr(0x11), trader, 100) else {
            panic!("funding transfer failed");
        };

        let Ok(outcome) = service.swap(token_a, token_b, 100, 80, trader).await else {
            panic!("expected Ok");
        };
        assert_eq!(outcome.amount_out, 90);
        assert_eq!(outcome.fee, 1);

        let (Ok(got), Ok(spent)) = (
            service.balance_of(token_b, trader).await,
            service.balance_of(token_a, trader).await,
        ) else {
            panic!("expected Ok");
        };
        assert_eq!(got, 90);
        assert_eq!(spent, 0);

        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.swap_count, 1);
    }

    #[tokio::test]
    async fn swap_respects_min_amount_out() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;
        let Ok(_) = service
            .add_liquidity(token_a, 1_000, token_b, 1_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };

        let result = service.swap(token_a, token_b, 100, 91, addr(0x11)).await;
        assert_eq!(
            result,
            Err(DexError::SlippageExceeded {
                amount_out: 90,
                min_amount_out: 91,
            })
        );

        // Nothing moved.
        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.swap_count, 0);
        assert_eq!(detail.reserve_a, 1_000);
    }

    #[tokio::test]
    async fn quote_does_not_mutate() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;
        let Ok(_) = service
            .add_liquidity(token_a, 1_000, token_b, 1_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };

        let Ok(quote) = service.quote(token_a, token_b, 100).await else {
            panic!("expected Ok");
        };
        assert_eq!(quote.amount_out.get(), 90);

        let Ok(detail) = service.pool_detail(token_a, token_b).await else {
            panic!("expected Ok");
        };
        assert_eq!(detail.reserve_a, 1_000);
        assert_eq!(detail.swap_count, 0);
    }

    #[tokio::test]
    async fn in_flight_pool_rejects_mutation() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;

        let Ok(pair) = PairKey::new(token_a, token_b) else {
            panic!("valid pair");
        };
        let Ok(entry_lock) = service.pools().get(pair).await else {
            panic!("expected Ok");
        };
        entry_lock.write().await.in_flight = true;

        let result = service
            .add_liquidity(token_a, 100, token_b, 100, addr(0x11))
            .await;
        assert_eq!(result, Err(DexError::ReentrancyDetected));
    }

    #[tokio::test]
    async fn mutations_emit_events() {
        let service = make_service();
        let (token_a, token_b) = seeded_pair(&service, 1_000_000).await;
        let mut rx = service.event_bus().subscribe();

        let Ok(_) = service
            .add_liquidity(token_a, 1_000, token_b, 1_000, addr(0x11))
            .await
        else {
            panic!("expected Ok");
        };
        let Ok(_) = service.swap(token_a, token_b, 100, 0, addr(0x11)).await else {
            panic!("expected Ok");
        };

        let (Ok(first), Ok(second)) = (rx.recv().await, rx.recv().await) else {
            panic!("expected two events");
        };
        assert_eq!(first.event_type_str(), "liquidity_added");
        assert_eq!(second.event_type_str(), "swap_executed");
    }
}
