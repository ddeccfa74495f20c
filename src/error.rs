//! Error types for BlockSim

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Insufficient funds: {address} holds {balance}, needs {amount}")]
    InsufficientFunds {
        address: String,
        balance: i64,
        amount: i64,
    },
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),
    #[error("Wallet error: {0}")]
    WalletError(String),
    #[error("Invalid block: {0}")]
    InvalidBlock(String),
    #[error("Invalid block linkage at height {height}")]
    InvalidBlockLinkage { height: usize },
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::SerializationError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
