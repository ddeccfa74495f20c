//! The top-level owner of one ledger and one chain.
//!
//! A [`Session`] runs the only write path the ledger has: approve a
//! transaction, record it, stage it and seal it into its own block. It also
//! holds the caller-side conveniences of the simulation (wallets looked up
//! by name, balance adjustments against SYSTEM) and the snapshot/replay
//! logic used by persistence.
//!
//! Approval and recording are separate steps and are not atomic. Every
//! mutating method takes `&mut self`, so a session shared between threads
//! must be wrapped in a lock that covers the whole call.

use crate::blockchain::Blockchain;
use crate::crypto::{Fingerprint, SYSTEM_ADDRESS};
use crate::error::ChainError;
use crate::ledger::{Ledger, RecordOutcome};
use crate::persistence::{Persistence, StateSnapshot, TransactionRecord, WalletRecord};
use crate::transaction::{Party, Transaction};
use crate::wallet::Wallet;
use serde::Deserialize;

/// How a reload treats the balances stored next to the transaction log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMode {
    /// Keep stored balances; replay the log into the ledger and chain only.
    #[default]
    Restore,
    /// Record every stored transaction again on top of the stored balances.
    Reapply,
}

/// Result of one approve/record/stage/seal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Index of the block holding the transaction.
    pub height: usize,
    pub block_hash: Fingerprint,
    pub signature: Fingerprint,
    pub outcome: RecordOutcome,
}

/// Counts from rebuilding a session out of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub wallets: usize,
    pub replayed: usize,
    pub skipped: usize,
    /// Reapplied transactions whose balance effects were only partly applied.
    pub unbalanced: usize,
}

impl ReplayReport {
    /// True if every stored transaction came back with its full effect.
    pub fn is_clean(&self) -> bool {
        self.skipped == 0 && self.unbalanced == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    ledger: Ledger,
    chain: Blockchain,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn chain(&self) -> &Blockchain {
        &self.chain
    }

    /// Register a new wallet. A wallet with the same name replaces the old one.
    pub fn create_wallet(&mut self, name: &str, initial_balance: i64) -> Result<&Wallet, ChainError> {
        if name.trim().is_empty() {
            return Err(ChainError::WalletError("Wallet name is required".to_string()));
        }

        let wallet = Wallet::new(name, initial_balance);
        let address = wallet.address.clone();
        tracing::info!(name, initial_balance, address = %address, "wallet created");
        self.ledger.add_wallet(wallet);

        self.ledger
            .get_wallet_by_address(&address)
            .ok_or(ChainError::WalletNotFound(address))
    }

    /// Look a wallet up by name. Names are not keys: if several registered
    /// wallets share one, the last in registration order is returned.
    pub fn wallet_by_name(&self, name: &str) -> Option<&Wallet> {
        self.ledger.wallets().filter(|w| w.name == name).last()
    }

    /// Approve, record, stage and seal `tx` into a block of its own. A
    /// transaction whose credit would overflow the receiver is refused before
    /// anything is recorded.
    pub fn submit(&mut self, tx: Transaction) -> Result<Commit, ChainError> {
        tx.check_funds(&self.ledger)?;
        tx.check_credit(&self.ledger)?;

        let signature = tx.signature().to_string();
        let outcome = self.ledger.record_transaction(tx.clone());
        self.chain.add_transaction(tx);

        let height = self.chain.height();
        let block_hash = self.chain.seal_block().hash().to_string();

        Ok(Commit {
            height,
            block_hash,
            signature,
            outcome,
        })
    }

    /// Move `amount` between two wallets named by the caller.
    pub fn transfer(&mut self, sender: &str, receiver: &str, amount: i64) -> Result<Commit, ChainError> {
        let from = self
            .wallet_by_name(sender)
            .ok_or_else(|| ChainError::WalletNotFound(sender.to_string()))?;
        let to = self
            .wallet_by_name(receiver)
            .ok_or_else(|| ChainError::WalletNotFound(receiver.to_string()))?;

        let tx = Transaction::new(Some(from), Some(to), amount);
        tx.validate_amount()?;
        self.submit(tx)
    }

    /// Deposit from SYSTEM for a positive `delta`, withdraw to SYSTEM for a
    /// negative one.
    pub fn adjust_balance(&mut self, name: &str, delta: i64) -> Result<Commit, ChainError> {
        if delta == 0 {
            return Err(ChainError::InvalidTransaction(
                "Amount must be non-zero".to_string(),
            ));
        }

        let wallet = self
            .wallet_by_name(name)
            .ok_or_else(|| ChainError::WalletNotFound(name.to_string()))?;

        let tx = if delta > 0 {
            Transaction::new(None, Some(wallet), delta)
        } else {
            let amount = delta.checked_neg().ok_or_else(|| {
                ChainError::InvalidTransaction(format!("Amount {} is out of range", delta))
            })?;
            Transaction::new(Some(wallet), None, amount)
        };
        self.submit(tx)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            wallets: self.ledger.wallets().map(WalletRecord::from).collect(),
            transactions: self
                .ledger
                .transactions()
                .iter()
                .map(TransactionRecord::from)
                .collect(),
        }
    }

    /// Rebuild a session from a snapshot.
    ///
    /// Wallets come back verbatim. Each stored transaction has its parties
    /// resolved by exact address; a record where neither side resolves is
    /// skipped, and an unresolved side of a kept record becomes SYSTEM. Every
    /// kept transaction is sealed into a block of its own, so the grouping at
    /// save time is not preserved.
    pub fn from_snapshot(snapshot: &StateSnapshot, mode: ReplayMode) -> (Self, ReplayReport) {
        let mut session = Session::new();
        let mut report = ReplayReport::default();

        for record in &snapshot.wallets {
            session
                .ledger
                .add_wallet(Wallet::restore(&record.name, &record.address, record.balance));
        }
        report.wallets = session.ledger.wallet_count();

        for record in &snapshot.transactions {
            let sender = session.resolve(&record.sender);
            let receiver = session.resolve(&record.receiver);
            if sender.is_system() && receiver.is_system() {
                tracing::warn!(
                    signature = %record.signature,
                    "skipping stored transaction: neither party resolves"
                );
                report.skipped += 1;
                continue;
            }

            let tx = Transaction::restore(
                sender,
                receiver,
                record.amount,
                record.timestamp,
                record.signature.clone(),
            );
            match mode {
                ReplayMode::Restore => session.ledger.replay_transaction(tx.clone()),
                ReplayMode::Reapply => {
                    if !session.ledger.record_transaction(tx.clone()).is_balanced() {
                        report.unbalanced += 1;
                    }
                }
            }
            session.chain.add_transaction(tx);
            session.chain.seal_block();
            report.replayed += 1;
        }

        tracing::info!(
            wallets = report.wallets,
            replayed = report.replayed,
            skipped = report.skipped,
            unbalanced = report.unbalanced,
            ?mode,
            "session restored"
        );
        (session, report)
    }

    /// Map a stored party string to a registered wallet, or SYSTEM.
    fn resolve(&self, stored: &str) -> Party {
        if stored == SYSTEM_ADDRESS {
            return Party::System;
        }
        match self.ledger.get_wallet_by_address(stored) {
            Some(wallet) => Party::Wallet(wallet.address.clone()),
            None => Party::System,
        }
    }

    pub fn save(&self, persistence: &dyn Persistence) -> Result<(), ChainError> {
        persistence.save_state(&self.snapshot())
    }

    /// Load a saved session together with its replay report. `Ok(None)`
    /// means nothing was saved yet.
    pub fn load(
        persistence: &dyn Persistence,
        mode: ReplayMode,
    ) -> Result<Option<(Self, ReplayReport)>, ChainError> {
        Ok(persistence
            .load_state()?
            .map(|snapshot| Session::from_snapshot(&snapshot, mode)))
    }
}
