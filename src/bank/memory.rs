//! In-memory [`TokenBank`] implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{BankError, TokenBank};
use crate::domain::Address;

/// Process-local balance ledger.
///
/// Balances are kept in a nested map behind a single `std::sync`
/// read-write lock. Bank calls are short and synchronous, so the lock
/// is never held across an await point.
#[derive(Debug, Default)]
pub struct MemoryBank {
    balances: RwLock<HashMap<Address, HashMap<Address, u128>>>,
}

impl MemoryBank {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> BankError {
        // A poisoned lock means a writer panicked mid-update; treat the
        // ledger as unusable rather than reading torn state.
        BankError::LedgerUnavailable
    }
}

impl TokenBank for MemoryBank {
    fn register(&self, token: Address) {
        if let Ok(mut balances) = self.balances.write() {
            balances.entry(token).or_default();
        }
    }

    fn mint(&self, token: Address, to: Address, amount: u128) -> Result<(), BankError> {
        let mut balances = self.balances.write().map_err(|_| Self::lock_poisoned())?;
        let holders = balances
            .get_mut(&token)
            .ok_or(BankError::UnknownToken(token))?;
        let balance = holders.entry(to).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(BankError::BalanceOverflow { token, holder: to })?;
        Ok(())
    }

    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), BankError> {
        let mut balances = self.balances.write().map_err(|_| Self::lock_poisoned())?;
        let holders = balances
            .get_mut(&token)
            .ok_or(BankError::UnknownToken(token))?;

        let available = holders.get(&from).copied().unwrap_or(0);
        let debited = available
            .checked_sub(amount)
            .ok_or(BankError::InsufficientBalance {
                token,
                holder: from,
                requested: amount,
                available,
            })?;
        // Self-transfers must not double-count: validate only.
        if from == to {
            return Ok(());
        }
        let credited = holders
            .get(&to)
            .copied()
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(BankError::BalanceOverflow { token, holder: to })?;

        holders.insert(from, debited);
        holders.insert(to, credited);
        Ok(())
    }

    fn balance_of(&self, token: Address, holder: Address) -> u128 {
        self.balances
            .read()
            .ok()
            .and_then(|balances| balances.get(&token).and_then(|h| h.get(&holder).copied()))
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    #[test]
    fn mint_and_read_balance() {
        let bank = MemoryBank::new();
        bank.register(addr(1));

        let Ok(()) = bank.mint(addr(1), addr(0x11), 1_000) else {
            panic!("expected Ok");
        };
        assert_eq!(bank.balance_of(addr(1), addr(0x11)), 1_000);
        assert_eq!(bank.balance_of(addr(1), addr(0x22)), 0);
    }

    #[test]
    fn mint_unknown_token_fails() {
        let bank = MemoryBank::new();
        assert_eq!(
            bank.mint(addr(1), addr(0x11), 1),
            Err(BankError::UnknownToken(addr(1)))
        );
    }

    #[test]
    fn transfer_moves_value() {
        let bank = MemoryBank::new();
        bank.register(addr(1));
        let Ok(()) = bank.mint(addr(1), addr(0x11), 1_000) else {
            panic!("expected Ok");
        };

        let Ok(()) = bank.transfer(addr(1), addr(0x11), addr(0x22), 300) else {
            panic!("expected Ok");
        };
        assert_eq!(bank.balance_of(addr(1), addr(0x11)), 700);
        assert_eq!(bank.balance_of(addr(1), addr(0x22)), 300);
    }

    #[test]
    fn transfer_beyond_balance_fails_atomically() {
        let bank = MemoryBank::new();
        bank.register(addr(1));
        let Ok(()) = bank.mint(addr(1), addr(0x11), 100) else {
            panic!("expected Ok");
        };

        let result = bank.transfer(addr(1), addr(0x11), addr(0x22), 101);
        assert_eq!(
            result,
            Err(BankError::InsufficientBalance {
                token: addr(1),
                holder: addr(0x11),
                requested: 101,
                available: 100,
            })
        );
        assert_eq!(bank.balance_of(addr(1), addr(0x11)), 100);
        assert_eq!(bank.balance_of(addr(1), addr(0x22)), 0);
    }

    #[test]
    fn self_transfer_preserves_balance() {
        let bank = MemoryBank::new();
        bank.register(addr(1));
        let Ok(()) = bank.mint(addr(1), addr(0x11), 500) else {
            panic!("expected Ok");
        };

        let Ok(()) = bank.transfer(addr(1), addr(0x11), addr(0x11), 200) else {
            panic!("expected Ok");
        };
        assert_eq!(bank.balance_of(addr(1), addr(0x11)), 500);
    }

    #[test]
    fn credit_overflow_rejected() {
        let bank = MemoryBank::new();
        bank.register(addr(1));
        let Ok(()) = bank.mint(addr(1), addr(0x11), u128::MAX) else {
            panic!("expected Ok");
        };
        let Ok(()) = bank.mint(addr(1), addr(0x22), 1) else {
            panic!("expected Ok");
        };

        let result = bank.transfer(addr(1), addr(0x22), addr(0x11), 1);
        assert_eq!(
            result,
            Err(BankError::BalanceOverflow {
                token: addr(1),
                holder: addr(0x11),
            })
        );
        assert_eq!(bank.balance_of(addr(1), addr(0x22)), 1);
    }

    #[test]
    fn register_is_idempotent() {
        let bank = MemoryBank::new();
        bank.register(addr(1));
        let Ok(()) = bank.mint(addr(1), addr(0x11), 42) else {
            panic!("expected Ok");
        };
        bank.register(addr(1));
        assert_eq!(bank.balance_of(addr(1), addr(0x11)), 42);
    }
}
