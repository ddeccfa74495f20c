use crate::crypto::{abbreviate, fingerprint, format_timestamp, now_timestamp, Fingerprint, GENESIS_HASH};
use crate::error::ChainError;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::validate_chain;

/// An immutable, timestamped bundle of transactions linked to its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    transactions: Vec<Transaction>,
    timestamp: f64,
    previous_hash: Fingerprint,
    hash: Fingerprint,
}

impl Block {
    /// Seal `transactions` now, on top of `previous_hash`.
    pub fn new(transactions: Vec<Transaction>, previous_hash: impl Into<Fingerprint>) -> Self {
        Self::with_timestamp(transactions, now_timestamp(), previous_hash)
    }

    pub fn with_timestamp(
        transactions: Vec<Transaction>,
        timestamp: f64,
        previous_hash: impl Into<Fingerprint>,
    ) -> Self {
        let previous_hash = previous_hash.into();
        let hash = Block::calculate_hash(&transactions, timestamp, &previous_hash);
        Block {
            transactions,
            timestamp,
            previous_hash,
            hash,
        }
    }

    /// Fingerprint over the concatenated transaction signatures, the
    /// timestamp and the previous hash. Zero transactions is fine.
    pub fn calculate_hash(transactions: &[Transaction], timestamp: f64, previous_hash: &str) -> Fingerprint {
        let mut data: String = transactions.iter().map(|tx| tx.signature()).collect();
        data.push_str(&format_timestamp(timestamp));
        data.push_str(previous_hash);
        fingerprint(&data)
    }

    pub fn compute_hash(&self) -> Fingerprint {
        Block::calculate_hash(&self.transactions, self.timestamp, &self.previous_hash)
    }

    pub fn verify_hash(&self) -> bool {
        self.compute_hash() == self.hash
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_hash == GENESIS_HASH
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Block(hash={}..., prev={}..., tx_count={}, time={:.2})",
            abbreviate(&self.hash, 10),
            abbreviate(&self.previous_hash, 10),
            self.transactions.len(),
            self.timestamp
        )
    }
}

/// The block sequence plus the staging area of transactions awaiting a seal.
#[derive(Debug, Clone, Default)]
pub struct Blockchain {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Blockchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a transaction for the next block.
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.pending.push(tx);
    }

    /// Seal every pending transaction, in staging order, into a new block on
    /// top of the current tip, and clear the staging area.
    pub fn seal_block(&mut self) -> &Block {
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(transactions, self.latest_hash());
        tracing::debug!(
            height = self.blocks.len(),
            hash = block.hash(),
            tx_count = block.transactions().len(),
            "sealed block"
        );

        let height = self.blocks.len();
        self.blocks.push(block);
        &self.blocks[height]
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Hash of the last block, or the genesis sentinel on an empty chain.
    pub fn latest_hash(&self) -> &str {
        self.blocks.last().map_or(GENESIS_HASH, |b| b.hash())
    }

    /// Number of sealed blocks.
    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    /// Every sealed transaction, in block order.
    pub fn committed_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.blocks.iter().flat_map(|b| b.transactions().iter())
    }

    /// Check every stored block hash and the previous-hash linkage.
    pub fn validate(&self) -> Result<(), ChainError> {
        validate_chain(&self.blocks)
    }
}
