//! State persistence for BlockSim
//!
//! The saved state is a single JSON document holding the wallet set and the
//! recorded transaction log. Block boundaries are not stored; a reload
//! replays the log one transaction per block.

use crate::error::ChainError;
use crate::transaction::Transaction;
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const BACKUP_SUFFIX: &str = ".backup";
const TEMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub name: String,
    pub balance: i64,
    pub address: String,
}

impl From<&Wallet> for WalletRecord {
    fn from(wallet: &Wallet) -> Self {
        WalletRecord {
            name: wallet.name.clone(),
            balance: wallet.balance,
            address: wallet.address.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Wallet address or `"SYSTEM"`.
    pub sender: String,
    /// Wallet address or `"SYSTEM"`.
    pub receiver: String,
    pub amount: i64,
    pub timestamp: f64,
    pub signature: String,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        TransactionRecord {
            sender: tx.sender().to_string(),
            receiver: tx.receiver().to_string(),
            amount: tx.amount(),
            timestamp: tx.timestamp(),
            signature: tx.signature().to_string(),
        }
    }
}

/// Everything a session needs to be rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub wallets: Vec<WalletRecord>,
    pub transactions: Vec<TransactionRecord>,
}

impl StateSnapshot {
    pub fn to_json(&self) -> Result<String, ChainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ChainError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Abstraction for persistence backends.
///
/// `load_state` returns `Ok(None)` when nothing has been saved yet.
pub trait Persistence: Send + Sync {
    fn save_state(&self, snapshot: &StateSnapshot) -> Result<(), ChainError>;
    fn load_state(&self) -> Result<Option<StateSnapshot>, ChainError>;
}

/// A pretty-printed JSON state file, written atomically.
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
    backup: bool,
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStateFile {
            path: path.into(),
            backup: true,
        }
    }

    /// Keep a copy of the previous file at `<path>.backup` on every save.
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, BACKUP_SUFFIX)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

impl Persistence for JsonStateFile {
    fn save_state(&self, snapshot: &StateSnapshot) -> Result<(), ChainError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    ChainError::IoError(format!("Failed to create state dir {:?}: {}", parent, e))
                })?;
            }
        }

        if self.backup && self.path.exists() {
            fs::copy(&self.path, self.backup_path())
                .map_err(|e| ChainError::IoError(format!("Failed to create backup: {}", e)))?;
        }

        let json = snapshot.to_json()?;

        let temp_path = with_suffix(&self.path, TEMP_SUFFIX);
        let mut file = File::create(&temp_path)
            .map_err(|e| ChainError::IoError(format!("Failed to create temp file: {}", e)))?;
        file.write_all(json.as_bytes())
            .map_err(|e| ChainError::IoError(format!("Failed to write state: {}", e)))?;
        file.sync_all()
            .map_err(|e| ChainError::IoError(format!("Failed to sync file: {}", e)))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .map_err(|e| ChainError::IoError(format!("Failed to finalize write: {}", e)))?;

        tracing::info!(
            path = %self.path.display(),
            wallets = snapshot.wallets.len(),
            transactions = snapshot.transactions.len(),
            "state saved"
        );
        Ok(())
    }

    fn load_state(&self) -> Result<Option<StateSnapshot>, ChainError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no saved state found");
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| ChainError::IoError(format!("Failed to read state: {}", e)))?;
        let snapshot = StateSnapshot::from_json(&contents)?;

        tracing::info!(
            path = %self.path.display(),
            wallets = snapshot.wallets.len(),
            transactions = snapshot.transactions.len(),
            "state loaded"
        );
        Ok(Some(snapshot))
    }
}

/// Simple in-memory persistence implementation useful for tests and ephemeral runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    pub slot: Arc<Mutex<Option<StateSnapshot>>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for InMemoryPersistence {
    fn save_state(&self, snapshot: &StateSnapshot) -> Result<(), ChainError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ChainError::IoError("Mutex poisoned".to_string()))?;
        *slot = Some(snapshot.clone());
        Ok(())
    }

    fn load_state(&self) -> Result<Option<StateSnapshot>, ChainError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| ChainError::IoError("Mutex poisoned".to_string()))?;
        Ok(slot.clone())
    }
}
