//! Catalog commands over a JSON export of the `products` table.
//!
//! # Usage
//!
//! ```bash
//! lm-cli catalog search --listings products.json --query shirt --price under-50 --sort price-asc
//! lm-cli catalog add-to-cart --listings products.json p1
//! ```

use std::fs;
use std::path::Path;

use luxemarket_core::{CurrencyCode, Price, ProductId};
use luxemarket_store::{
    AddOutcome, CartCandidate, CatalogQuery, ProductListing, ShopState, SnapshotStore,
    filter_products,
};

use super::CommandError;

/// Read listings from a JSON array file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a listing array.
pub fn load_listings(path: &Path) -> Result<Vec<ProductListing>, CommandError> {
    let raw = fs::read_to_string(path).map_err(|source| CommandError::ListingsRead {
        path: path.to_path_buf(),
        source,
    })?;
    let listings: Vec<ProductListing> = serde_json::from_str(&raw)?;
    tracing::debug!(count = listings.len(), path = %path.display(), "loaded listings");
    Ok(listings)
}

/// One-line description of a listing for terminal output.
#[must_use]
pub fn describe(listing: &ProductListing, currency: CurrencyCode) -> String {
    let mut line = format!(
        "{} | {} | {}",
        listing.id,
        listing.name,
        Price::new(listing.price, currency)
    );
    if let Some(percent) = listing.discount_percent() {
        line.push_str(&format!(" (-{percent}%)"));
    }
    if listing.in_stock() {
        line.push_str(&format!(" | {} in stock", listing.stock));
    } else {
        line.push_str(" | out of stock");
    }
    line
}

/// Filter and sort listings, returning their descriptions.
#[must_use]
pub fn search(
    listings: &[ProductListing],
    query: &CatalogQuery,
    currency: CurrencyCode,
) -> Vec<String> {
    filter_products(listings, query)
        .map(|listing| describe(listing, currency))
        .collect()
}

/// Add one unit of a listed product to the cart.
///
/// # Errors
///
/// Returns `CommandError::ProductNotFound` if no listing has this ID.
pub fn add_to_cart<S: SnapshotStore>(
    state: &mut ShopState<S>,
    listings: &[ProductListing],
    product_id: &ProductId,
) -> Result<AddOutcome, CommandError> {
    let listing = listings
        .iter()
        .find(|listing| &listing.id == product_id)
        .ok_or_else(|| CommandError::ProductNotFound(product_id.to_string()))?;
    Ok(state.add_to_cart(CartCandidate::from_listing(listing)))
}
