//! Fungible-token ledger boundary.
//!
//! The exchange never holds balances itself: tokens live in an external
//! ledger reached through the [`TokenBank`] trait. Pool vaults and user
//! accounts are plain [`Address`]es on that ledger, and every deposit,
//! withdrawal, and swap moves value with `transfer` calls that either
//! fully succeed or leave both balances untouched.

pub mod memory;

use thiserror::Error;

use crate::domain::Address;

pub use memory::MemoryBank;

/// Errors surfaced by a [`TokenBank`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    /// The token has never been registered with the ledger.
    #[error("unknown token {0}")]
    UnknownToken(Address),

    /// The sender's balance cannot cover the transfer.
    #[error("insufficient balance of {token} for {holder}: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Token being moved.
        token: Address,
        /// Account being debited.
        holder: Address,
        /// Amount requested.
        requested: u128,
        /// Amount actually held.
        available: u128,
    },

    /// Crediting the recipient would overflow its balance.
    #[error("balance of {token} for {holder} would overflow")]
    BalanceOverflow {
        /// Token being moved.
        token: Address,
        /// Account being credited.
        holder: Address,
    },

    /// The ledger's internal state is no longer trustworthy.
    #[error("ledger unavailable")]
    LedgerUnavailable,
}

/// Ledger of fungible-token balances.
///
/// Implementations must be atomic per call: a failed `transfer` leaves
/// both accounts exactly as they were.
pub trait TokenBank: Send + Sync + std::fmt::Debug {
    /// Registers a token with the ledger so balances can be tracked.
    ///
    /// Registering an already-known token is a no-op.
    fn register(&self, token: Address);

    /// Credits `amount` of `token` to `to` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::UnknownToken`] for an unregistered token or
    /// [`BankError::BalanceOverflow`] if the credit would overflow.
    fn mint(&self, token: Address, to: Address, amount: u128) -> Result<(), BankError>;

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`BankError::UnknownToken`] for an unregistered token,
    /// [`BankError::InsufficientBalance`] if `from` cannot cover the
    /// amount, or [`BankError::BalanceOverflow`] if crediting `to` would
    /// overflow. On any error neither balance changes.
    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), BankError>;

    /// Returns `holder`'s balance of `token`, zero for unknown tokens
    /// or holders.
    fn balance_of(&self, token: Address, holder: Address) -> u128;
}
