//! Wallets: a named, address-keyed balance.

use crate::crypto::{abbreviate, address_from_string, Address};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named balance holder.
///
/// Balances only move through [`Wallet::debit`] and [`Wallet::credit`], which
/// the ledger invokes while recording transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub name: String,
    pub address: Address,
    pub balance: i64,
}

impl Wallet {
    /// Create a wallet whose address is derived from `name`.
    pub fn new(name: impl Into<String>, initial_balance: i64) -> Self {
        let name = name.into();
        let address = address_from_string(&name);
        Wallet {
            name,
            address,
            balance: initial_balance,
        }
    }

    /// Rebuild a wallet from stored fields. The address is taken as-is.
    pub fn restore(name: impl Into<String>, address: impl Into<Address>, balance: i64) -> Self {
        Wallet {
            name: name.into(),
            address: address.into(),
            balance,
        }
    }

    pub fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Subtract `amount` if affordable. Returns false and leaves the balance
    /// untouched otherwise, including when the result would not fit in `i64`.
    pub fn debit(&mut self, amount: i64) -> bool {
        let before = self.balance;
        let next = if self.can_afford(amount) {
            before.checked_sub(amount)
        } else {
            None
        };
        if let Some(balance) = next {
            self.balance = balance;
        }
        tracing::debug!(
            wallet = %self.name,
            amount,
            before,
            after = self.balance,
            ok = next.is_some(),
            "debit"
        );
        next.is_some()
    }

    /// Add `amount`. Returns false and leaves the balance untouched if the
    /// result would not fit in `i64`.
    pub fn credit(&mut self, amount: i64) -> bool {
        let before = self.balance;
        let next = before.checked_add(amount);
        if let Some(balance) = next {
            self.balance = balance;
        }
        tracing::debug!(
            wallet = %self.name,
            amount,
            before,
            after = self.balance,
            ok = next.is_some(),
            "credit"
        );
        next.is_some()
    }

    /// True if crediting `amount` would keep the balance representable.
    pub fn can_receive(&self, amount: i64) -> bool {
        self.balance.checked_add(amount).is_some()
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Wallet(name={}, balance={}, address={}...)",
            self.name,
            self.balance,
            abbreviate(&self.address, 10)
        )
    }
}
