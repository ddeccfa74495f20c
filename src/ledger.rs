//! The wallet registry and the append-only transaction log.

use crate::crypto::Address;
use crate::transaction::{Party, Transaction};
use crate::wallet::Wallet;
use std::collections::HashMap;

/// What happened to balances when a transaction was recorded.
///
/// Recording never fails. Sides that do not resolve to a registered wallet
/// are skipped, which breaks balance conservation; this report is how a
/// caller can tell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub unresolved_sender: bool,
    pub unresolved_receiver: bool,
    /// The sender resolved but could not afford the amount; its balance was left as-is.
    pub debit_refused: bool,
    /// The receiver resolved but the credit would overflow its balance; left as-is.
    pub credit_refused: bool,
}

impl RecordOutcome {
    pub fn unresolved_count(&self) -> usize {
        self.unresolved_sender as usize + self.unresolved_receiver as usize
    }

    /// True if every non-SYSTEM side moved by exactly the amount.
    pub fn is_balanced(&self) -> bool {
        self.unresolved_count() == 0 && !self.debit_refused && !self.credit_refused
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    wallets: Vec<Wallet>,
    index: HashMap<Address, usize>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a wallet under its address, replacing any wallet already
    /// held there. A replaced wallet keeps its slot in iteration order.
    pub fn add_wallet(&mut self, wallet: Wallet) {
        match self.index.get(&wallet.address) {
            Some(&slot) => {
                tracing::debug!(address = %wallet.address, "replacing wallet at existing address");
                self.wallets[slot] = wallet;
            }
            None => {
                self.index.insert(wallet.address.clone(), self.wallets.len());
                self.wallets.push(wallet);
            }
        }
    }

    pub fn get_wallet_by_address(&self, address: &str) -> Option<&Wallet> {
        self.index.get(address).map(|&slot| &self.wallets[slot])
    }

    fn get_wallet_mut(&mut self, address: &str) -> Option<&mut Wallet> {
        let slot = *self.index.get(address)?;
        self.wallets.get_mut(slot)
    }

    /// Wallets in registration order.
    pub fn wallets(&self) -> impl Iterator<Item = &Wallet> {
        self.wallets.iter()
    }

    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    /// Recorded transactions in recording order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Sum of all wallet balances, widened so it cannot overflow.
    pub fn total_balance(&self) -> i128 {
        self.wallets.iter().map(|w| i128::from(w.balance)).sum()
    }

    /// Append `tx` to the log and apply it to balances.
    ///
    /// Approval is not re-checked. A non-SYSTEM sender is debited and a
    /// non-SYSTEM receiver credited when their addresses resolve; a side
    /// that does not resolve is skipped.
    pub fn record_transaction(&mut self, tx: Transaction) -> RecordOutcome {
        tracing::debug!(%tx, "recording transaction");
        let mut outcome = RecordOutcome::default();
        let amount = tx.amount();

        if let Party::Wallet(address) = tx.sender() {
            match self.get_wallet_mut(address) {
                Some(wallet) => outcome.debit_refused = !wallet.debit(amount),
                None => outcome.unresolved_sender = true,
            }
        }

        if let Party::Wallet(address) = tx.receiver() {
            match self.get_wallet_mut(address) {
                Some(wallet) => outcome.credit_refused = !wallet.credit(amount),
                None => outcome.unresolved_receiver = true,
            }
        }

        if outcome.unresolved_count() > 0 {
            tracing::warn!(
                signature = tx.signature(),
                unresolved_sender = outcome.unresolved_sender,
                unresolved_receiver = outcome.unresolved_receiver,
                "recorded transaction with unresolved parties; balance mutation skipped"
            );
        }
        if outcome.debit_refused {
            tracing::warn!(
                signature = tx.signature(),
                sender = %tx.sender(),
                amount,
                "sender could not afford recorded transaction; debit refused"
            );
        }
        if outcome.credit_refused {
            tracing::warn!(
                signature = tx.signature(),
                receiver = %tx.receiver(),
                amount,
                "receiver balance would overflow; credit refused"
            );
        }

        self.transactions.push(tx);
        outcome
    }

    /// Append `tx` to the log without touching any balance. Used when
    /// balances were restored verbatim and the log is being rebuilt.
    pub fn replay_transaction(&mut self, tx: Transaction) {
        tracing::debug!(%tx, "replaying transaction into log");
        self.transactions.push(tx);
    }
}
