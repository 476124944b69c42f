//! Unified error type for the shopping state crate.
//!
//! Container operations never fail; errors only come from the edges:
//! configuration, snapshot storage and parsing of catalog filter inputs.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::snapshot::PersistenceError;

/// Errors surfaced at the edges of the shopping state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot storage failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// A catalog filter input was not recognised.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
