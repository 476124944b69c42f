//! Command implementations.
//!
//! Each command works on a [`luxemarket_store::ShopState`] handed in by
//! `main`, so the same code runs against the file-backed store in production
//! and an in-memory store in tests.

pub mod cart;
pub mod catalog;
pub mod favorites;

use std::path::PathBuf;

use luxemarket_store::StoreError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Shopping state or filter input error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Price argument is not a non-negative decimal.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Listings file could not be read.
    #[error("Failed to read listings from {path}: {source}")]
    ListingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listings file is not a JSON array of products.
    #[error("Malformed listings file: {0}")]
    ListingsParse(#[from] serde_json::Error),

    /// No listing with the requested product ID.
    #[error("Product not found in listings: {0}")]
    ProductNotFound(String),

    /// The change was applied but could not be saved.
    #[error("Shopping state was not saved: {0}")]
    NotPersisted(String),
}
