//! Covenant configuration file handling
//!
//! Provides default configuration generation and loading for the wallet CLI.
//! Configuration files are TOML and stored adjacent to the wallet state file.
//!
//! ## Initial Policy vs Live Policy
//!
//! The `[wallet]` section only seeds a NEW wallet (`covenant init`). Once the
//! state file exists, owners, quorum and the daily limit change only through
//! quorum-gated commands; editing this file afterwards has no effect.

use covenant::wallet::WalletError;
use covenant::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Covenant CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Initial wallet policy
    pub wallet: PolicyConfig,

    /// State file location
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Initial owners, quorum and daily limit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Owner labels or 64-character hex ids
    pub owners: Vec<String>,

    /// Confirmations required for deferred actions
    pub required: usize,

    /// Per-day allowance for single-owner plain transfers (TOML integers are 64-bit)
    #[serde(default)]
    pub daily_limit: u64,
}

/// Where the CBOR wallet snapshot lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    pub path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl WalletConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: WalletConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Owner identities, resolving labels through `AccountId::from_label`
    pub fn owner_ids(&self) -> Vec<AccountId> {
        self.wallet
            .owners
            .iter()
            .map(|o| AccountId::parse_or_label(o))
            .collect()
    }

    /// Report the problems that would make wallet creation fail
    pub fn validate(&self) -> Result<(), WalletError> {
        let owners = self.owner_ids();
        if owners.is_empty() {
            return Err(WalletError::InvalidConfig(
                "[wallet] owners must not be empty".to_string(),
            ));
        }
        let unique: HashSet<_> = owners.iter().collect();
        if unique.len() != owners.len() {
            return Err(WalletError::InvalidConfig(
                "[wallet] owners contains duplicates".to_string(),
            ));
        }
        if self.wallet.required == 0 || self.wallet.required > owners.len() {
            return Err(WalletError::InvalidConfig(format!(
                "[wallet] required must be between 1 and {}",
                owners.len()
            )));
        }
        Ok(())
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(state_path: &Path) -> String {
        format!(
            r#"# Covenant Wallet Configuration
#
# The [wallet] section seeds a NEW wallet only. After `covenant init`,
# owners, quorum and the daily limit change only through quorum-gated
# commands (add-owner, change-requirement, set-daily-limit, ...).

[wallet]
# Owner labels (hashed to ids) or 64-character hex ids
owners = ["alice", "bob", "carol"]

# Distinct owner confirmations required for deferred actions
required = 2

# Plain transfers up to this total per day need only one owner
daily_limit = 100

[state]
# CBOR snapshot of owners, votes and queued actions
path = "{state_path}"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"
"#,
            state_path = state_path.display()
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(
        config_path: &Path,
        state_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml(state_path);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path
///
/// - Data dir: ~/.local/share/covenant/
/// - Config: ~/.local/share/covenant/config.toml
pub fn default_config_path() -> PathBuf {
    default_data_dir().join("config.toml")
}

/// Get the default state file path
pub fn default_state_path() -> PathBuf {
    default_data_dir().join("wallet.cbor")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("covenant")
}
