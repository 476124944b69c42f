//! Shopping state configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LUXEMARKET_SNAPSHOT_DIR` - Directory holding snapshots (default: `.luxemarket`)
//! - `LUXEMARKET_SNAPSHOT_KEY` - Snapshot name (default: `luxemarket-store`)
//! - `LUXEMARKET_CURRENCY` - ISO 4217 code prices are shown in (default: `EUR`)

use std::path::PathBuf;

use luxemarket_core::CurrencyCode;
use thiserror::Error;

use crate::snapshot::{DEFAULT_SNAPSHOT_KEY, FileStore};

const DEFAULT_SNAPSHOT_DIR: &str = ".luxemarket";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the shopping state is persisted and how prices are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory for the file-backed snapshot store
    pub snapshot_dir: PathBuf,
    /// Name of the snapshot holding cart and favorites
    pub snapshot_key: String,
    /// Currency used when formatting totals
    pub currency: CurrencyCode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from(DEFAULT_SNAPSHOT_DIR),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            currency: CurrencyCode::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let snapshot_dir = PathBuf::from(get_or_default(
            &lookup,
            "LUXEMARKET_SNAPSHOT_DIR",
            DEFAULT_SNAPSHOT_DIR,
        ));

        let snapshot_key = get_or_default(&lookup, "LUXEMARKET_SNAPSHOT_KEY", DEFAULT_SNAPSHOT_KEY);
        validate_snapshot_key(&snapshot_key)?;

        let currency = get_or_default(&lookup, "LUXEMARKET_CURRENCY", "EUR")
            .parse::<CurrencyCode>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LUXEMARKET_CURRENCY".to_string(), e.to_string())
            })?;

        Ok(Self {
            snapshot_dir,
            snapshot_key,
            currency,
        })
    }

    /// File-backed snapshot store rooted at [`snapshot_dir`](Self::snapshot_dir).
    #[must_use]
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.snapshot_dir)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value. Empty values count as unset.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Snapshot keys become file names, so keep them to a safe alphabet.
fn validate_snapshot_key(key: &str) -> Result<(), ConfigError> {
    let valid = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !key.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "LUXEMARKET_SNAPSHOT_KEY".to_string(),
            format!("'{key}' must use only letters, digits, '-', '_' or '.'"),
        ))
    }
}
