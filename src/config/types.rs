//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::account_validity::{self, AccountValidityConfig, ResolvedModule};

/// Configuration errors.
///
/// All of these are fatal at startup; none can occur at request time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("server.name is required")]
    MissingServerName,
    #[error("'period' is required when account validity is enabled")]
    MissingValidityPeriod,
    #[error("'server.public_baseurl' is required to send renewal emails")]
    MissingPublicBaseurl,
    #[error("unknown account validity module: {0}")]
    UnknownModule(String),
    #[error("invalid config for account validity module {module}: {message}")]
    InvalidModuleConfig { module: String, message: String },
}

/// Subsystem configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server identity.
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Account validity policy. A table configures the deprecated
    /// single-policy form; a list configures the module chain.
    pub account_validity: Option<AccountValidityConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.name.is_empty() {
            return Err(ConfigError::MissingServerName);
        }
        // Resolution performs the account_validity validation; running it
        // here makes a malformed section fail before the service is ready.
        self.resolved_account_validity()?;
        Ok(())
    }

    /// Normalize the account validity section into an ordered module list.
    pub fn resolved_account_validity(&self) -> Result<Vec<ResolvedModule>, ConfigError> {
        account_validity::resolve(
            self.account_validity.as_ref(),
            self.server.public_baseurl.as_deref(),
        )
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name (e.g., "hearth.example.org").
    pub name: String,
    /// Public base URL clients reach this server on. Required whenever the
    /// legacy account validity form implies renewal emails.
    #[serde(default)]
    pub public_baseurl: Option<String>,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path, or ":memory:".
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "hearth.db".to_string()
}
