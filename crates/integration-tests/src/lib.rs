//! Integration tests for Luxemarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p luxemarket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Merge, clamp and total rules of the cart
//! - `snapshot_roundtrip` - Persisting and rehydrating the shopping state
//! - `catalog_pipeline` - Listing filter/sort behaviour on a catalog fixture
//!
//! This library only holds shared fixtures.

use chrono::{TimeZone, Utc};
use luxemarket_core::{CategoryId, ProductId};
use luxemarket_store::{CartCandidate, ProductListing};
use rust_decimal::Decimal;

/// A cart candidate priced in cents.
#[must_use]
pub fn candidate(product_id: &str, cents: i64, stock_limit: u32) -> CartCandidate {
    CartCandidate {
        product_id: ProductId::new(product_id),
        name: format!("Product {product_id}"),
        unit_price: Decimal::new(cents, 2),
        image_ref: format!("/images/{product_id}.jpg"),
        stock_limit,
    }
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    name: &str,
    description: &str,
    cents: i64,
    category: &str,
    rating: f32,
    active: bool,
    day: u32,
) -> ProductListing {
    ProductListing {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::new(cents, 2),
        original_price: None,
        image_ref: format!("/images/{id}.jpg"),
        stock: 5,
        rating,
        review_count: 10,
        category_id: CategoryId::new(category),
        featured: false,
        active,
        created_at: Utc
            .with_ymd_and_hms(2024, 5, day, 9, 0, 0)
            .single()
            .unwrap_or_default(),
    }
}

/// Five listings exercising search, category, price and tie handling.
///
/// | id | name | price | category | active | note |
/// |----|------|-------|----------|--------|------|
/// | `p1` | Cotton Shirt | 29.90 | tops | yes | |
/// | `p2` | Silk shirt | 45.00 | tops | yes | |
/// | `p3` | Shirt dress | 120.00 | dresses | yes | over the bracket |
/// | `p4` | Denim jacket | 29.90 | outerwear | yes | "shirt" in description, ties `p1` |
/// | `p5` | Linen Shirt | 19.00 | tops | no | inactive |
#[must_use]
pub fn catalog_fixture() -> Vec<ProductListing> {
    vec![
        listing("p1", "Cotton Shirt", "Everyday basic", 2990, "tops", 4.1, true, 1),
        listing("p2", "Silk shirt", "Evening wear", 4500, "tops", 4.8, true, 3),
        listing("p3", "Shirt dress", "Summer dress", 12_000, "dresses", 4.5, true, 2),
        listing("p4", "Denim jacket", "Wear it over a SHIRT", 2990, "outerwear", 3.9, true, 5),
        listing("p5", "Linen Shirt", "Out of range", 1900, "tops", 5.0, false, 4),
    ]
}
