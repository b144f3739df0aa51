//! Treasury deployment configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use coffer_types::params::MIN_VOTE_DURATION_SECS;
use coffer_types::{Address, GovernanceParams, TokenMetadata};
use coffer_utils::LogFormat;

use crate::TreasuryError;

/// Configuration for deploying and operating a treasury.
///
/// Can be loaded from a TOML file via [`TreasuryConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Governance values are read once
/// at deployment and frozen into the treasury state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreasuryConfig {
    /// Share token name.
    #[serde(default = "default_token_name")]
    pub token_name: String,

    /// Share token symbol.
    #[serde(default = "default_token_symbol")]
    pub token_symbol: String,

    /// The identity allowed to open withdrawal requests (the deployer).
    #[serde(default)]
    pub owner: Option<Address>,

    /// The treasury's own account, which holds escrowed voting shares.
    #[serde(default = "default_treasury_address")]
    pub treasury_address: Address,

    /// Requests must run strictly longer than this.
    #[serde(default = "default_min_duration_secs")]
    pub min_duration_secs: u64,

    /// Participation quorum over total supply in basis points (0 = off).
    #[serde(default)]
    pub quorum_bps: u32,

    /// Where the operator tool keeps the treasury snapshot.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_token_name() -> String {
    TokenMetadata::default().name
}

fn default_token_symbol() -> String {
    TokenMetadata::default().symbol
}

fn default_treasury_address() -> Address {
    Address::new("treasury")
}

fn default_min_duration_secs() -> u64 {
    MIN_VOTE_DURATION_SECS
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./coffer_state.bin")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl TreasuryConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, TreasuryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TreasuryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, TreasuryError> {
        let config: Self = toml::from_str(s).map_err(|e| TreasuryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, TreasuryError> {
        toml::to_string_pretty(self).map_err(|e| TreasuryError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), TreasuryError> {
        if !self.governance_params().is_valid() {
            return Err(TreasuryError::Config(format!(
                "quorum_bps {} exceeds 10000",
                self.quorum_bps
            )));
        }
        if self.owner.as_ref() == Some(&self.treasury_address) {
            return Err(TreasuryError::Config(
                "owner cannot be the treasury's own address".to_string(),
            ));
        }
        Ok(())
    }

    pub fn governance_params(&self) -> GovernanceParams {
        GovernanceParams {
            min_duration_secs: self.min_duration_secs,
            quorum_bps: self.quorum_bps,
        }
    }

    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata::new(self.token_name.clone(), self.token_symbol.clone())
    }
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            token_name: default_token_name(),
            token_symbol: default_token_symbol(),
            owner: None,
            treasury_address: default_treasury_address(),
            min_duration_secs: default_min_duration_secs(),
            quorum_bps: 0,
            state_path: default_state_path(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
