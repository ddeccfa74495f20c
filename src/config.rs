//! Configuration management for BlockSim

use crate::error::ChainError;
use crate::session::ReplayMode;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default = "default_backup")]
    pub backup: bool,
    /// How a reload treats stored balances: `"restore"` or `"reapply"`.
    #[serde(default)]
    pub replay: ReplayMode,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            backup: default_backup(),
            replay: ReplayMode::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    /// Balance given to wallets created without an explicit amount.
    #[serde(default)]
    pub default_initial_balance: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_state_file() -> String {
    "blockchain_state.json".to_string()
}

fn default_backup() -> bool {
    true
}

fn default_filter() -> String {
    "info".to_string()
}

/// Per-user config location, used when the working directory has none.
pub fn get_user_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".blocksim")
        .join(CONFIG_FILE)
}

/// Load `config.toml` from the working directory, then from the user config
/// location, falling back to defaults when neither exists.
pub fn load_config() -> Result<Config, ChainError> {
    let local = Path::new(CONFIG_FILE);
    if local.exists() {
        return load_config_from(local);
    }
    let user = get_user_config_path();
    if user.exists() {
        return load_config_from(&user);
    }
    let config = Config::default();
    validate(&config)?;
    Ok(config)
}

pub fn load_config_from(path: &Path) -> Result<Config, ChainError> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| ChainError::ConfigError(format!("Failed to read {}: {}", path.display(), e)))?;
    let config = parse_config(&config_str)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(config_str: &str) -> Result<Config, ChainError> {
    let config: Config =
        toml::from_str(config_str).map_err(|e| ChainError::ConfigError(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ChainError> {
    if config.storage.state_file.trim().is_empty() {
        return Err(ChainError::ConfigError(
            "storage.state_file must be set in config.toml".to_string(),
        ));
    }
    Ok(())
}
