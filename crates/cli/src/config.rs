//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! Everything [`StoreConfig`] reads, plus:
//! - `SENTRY_DSN` - Sentry error tracking DSN (tracking disabled when unset)
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use luxemarket_store::{ConfigError, StoreConfig};

/// Configuration for the `lm-cli` binary.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Snapshot location and display currency
    pub store: StoreConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// `.env` is loaded by [`StoreConfig::from_env`] before the Sentry
    /// variables are read.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a store variable has an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            store: StoreConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

/// Get an optional, non-empty environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
