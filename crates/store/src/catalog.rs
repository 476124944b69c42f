//! Catalog filtering and sorting.
//!
//! Listings come from the catalog collaborator and are never mutated here.
//! [`filter_products`] is a pure function: the same listings and query always
//! yield the same sequence.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use luxemarket_core::{CategoryId, ProductId};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A product as shown on catalog screens.
///
/// Field names on the wire follow the hosted `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    #[serde(rename = "image_url", default)]
    pub image_ref: String,
    pub stock: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(rename = "reviews_count", default)]
    pub review_count: u32,
    pub category_id: CategoryId,
    #[serde(rename = "is_featured", default)]
    pub featured: bool,
    #[serde(rename = "is_active", default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

impl ProductListing {
    /// Whether at least one unit can be added to the cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Whole-percent markdown from the original price, if discounted.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        if original <= self.price || original <= Decimal::ZERO {
            return None;
        }
        let percent = (original - self.price) / original * Decimal::ONE_HUNDRED;
        percent
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .filter(|&p| p > 0)
    }
}

/// A product category as shown on catalog screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "image_url", default)]
    pub image_ref: Option<String>,
}

/// Errors parsing catalog filter inputs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("unknown price bracket: {0}")]
    UnknownPriceBracket(String),
}

/// Category restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    fn matches(&self, category_id: &CategoryId) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => id == category_id,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => Self::All,
            id => Self::Only(CategoryId::new(id)),
        })
    }
}

/// Price range restriction. Bounds are in the catalog currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceBracket {
    #[default]
    All,
    /// Strictly below 50.
    Under50,
    /// 50 to 100 inclusive.
    From50To100,
    /// 100 to 200 inclusive.
    From100To200,
    /// Strictly above 200.
    Over200,
}

impl PriceBracket {
    #[must_use]
    pub fn contains(self, price: Decimal) -> bool {
        let fifty = Decimal::from(50);
        let hundred = Decimal::ONE_HUNDRED;
        let two_hundred = Decimal::from(200);
        match self {
            Self::All => true,
            Self::Under50 => price < fifty,
            Self::From50To100 => price >= fifty && price <= hundred,
            Self::From100To200 => price >= hundred && price <= two_hundred,
            Self::Over200 => price > two_hundred,
        }
    }
}

impl FromStr for PriceBracket {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "under-50" => Ok(Self::Under50),
            "50-100" => Ok(Self::From50To100),
            "100-200" => Ok(Self::From100To200),
            "over-200" => Ok(Self::Over200),
            other => Err(CatalogError::UnknownPriceBracket(other.to_owned())),
        }
    }
}

/// Listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Name, case-insensitive ascending.
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    /// Highest rated first.
    Rating,
    /// Most recently created first.
    Newest,
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "name" => Ok(Self::Name),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "rating" => Ok(Self::Rating),
            "newest" => Ok(Self::Newest),
            other => Err(CatalogError::UnknownSortKey(other.to_owned())),
        }
    }
}

/// Everything the product listing screen filters and sorts by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub price: PriceBracket,
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Parse the raw values of the listing screen's controls.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for an unknown price bracket or sort key.
    pub fn parse(
        search: &str,
        category: &str,
        price: &str,
        sort: &str,
    ) -> Result<Self, CatalogError> {
        let Ok(category) = category.parse::<CategoryFilter>();
        Ok(Self {
            search: search.to_owned(),
            category,
            price: price.parse()?,
            sort: sort.parse()?,
        })
    }
}

fn matches_search(listing: &ProductListing, needle: &str) -> bool {
    needle.is_empty()
        || listing.name.to_lowercase().contains(needle)
        || listing.description.to_lowercase().contains(needle)
}

/// Filter and sort active listings.
///
/// A listing matches when its name or description contains the search text
/// (case-insensitive), its category passes the category filter and its price
/// falls in the bracket. The sort is stable: ties keep their input order.
pub fn filter_products<'a>(
    listings: &'a [ProductListing],
    query: &CatalogQuery,
) -> impl Iterator<Item = &'a ProductListing> + use<'a> {
    let needle = query.search.to_lowercase();
    let mut matched: Vec<&ProductListing> = listings
        .iter()
        .filter(|listing| listing.active)
        .filter(|listing| matches_search(listing, &needle))
        .filter(|listing| query.category.matches(&listing.category_id))
        .filter(|listing| query.price.contains(listing.price))
        .collect();

    match query.sort {
        SortKey::Name => matched.sort_by_cached_key(|listing| listing.name.to_lowercase()),
        SortKey::PriceAsc => matched.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => matched.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => matched.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    matched.into_iter()
}

/// Active featured listings, in input order, at most `limit` of them.
pub fn featured_products(
    listings: &[ProductListing],
    limit: usize,
) -> impl Iterator<Item = &ProductListing> {
    listings
        .iter()
        .filter(|listing| listing.active && listing.featured)
        .take(limit)
}

/// Number of active listings per category.
#[must_use]
pub fn count_by_category(listings: &[ProductListing]) -> HashMap<&CategoryId, usize> {
    let mut counts = HashMap::new();
    for listing in listings.iter().filter(|listing| listing.active) {
        *counts.entry(&listing.category_id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn listing(id: &str, name: &str, cents: i64, category: &str) -> ProductListing {
        ProductListing {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(cents, 2),
            original_price: None,
            image_ref: String::new(),
            stock: 10,
            rating: 4.0,
            review_count: 0,
            category_id: CategoryId::new(category),
            featured: false,
            active: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ids<'a>(iter: impl Iterator<Item = &'a ProductListing>) -> Vec<&'a str> {
        iter.map(|listing| listing.id.as_str()).collect()
    }

    #[test]
    fn test_parse_query() {
        let query = CatalogQuery::parse("shirt", "all", "under-50", "price-asc").unwrap();
        assert_eq!(query.category, CategoryFilter::All);
        assert_eq!(query.price, PriceBracket::Under50);
        assert_eq!(query.sort, SortKey::PriceAsc);

        let query = CatalogQuery::parse("", "c-1", "all", "newest").unwrap();
        assert_eq!(query.category, CategoryFilter::Only(CategoryId::new("c-1")));
    }

    #[test]
    fn test_parse_unknown_values() {
        assert_eq!(
            "cheapest".parse::<SortKey>(),
            Err(CatalogError::UnknownSortKey("cheapest".to_string()))
        );
        assert!(matches!(
            "free".parse::<PriceBracket>(),
            Err(CatalogError::UnknownPriceBracket(_))
        ));
    }

    #[test]
    fn test_price_bracket_bounds() {
        let d = Decimal::from;
        assert!(PriceBracket::Under50.contains(Decimal::new(4999, 2)));
        assert!(!PriceBracket::Under50.contains(d(50)));
        assert!(PriceBracket::From50To100.contains(d(50)));
        assert!(PriceBracket::From50To100.contains(d(100)));
        assert!(PriceBracket::From100To200.contains(d(100)));
        assert!(PriceBracket::From100To200.contains(d(200)));
        assert!(!PriceBracket::Over200.contains(d(200)));
        assert!(PriceBracket::Over200.contains(Decimal::new(20001, 2)));
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_description() {
        let mut described = listing("b", "Tote", 3000, "bags");
        described.description = "Fits a rolled SHIRT".to_string();
        let listings = vec![listing("a", "Linen Shirt", 4000, "tops"), described];

        let query = CatalogQuery {
            search: "shirt".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(filter_products(&listings, &query)), ["a", "b"]);
    }

    #[test]
    fn test_search_text_is_matched_verbatim() {
        let listings = vec![listing("a", "Linen Shirt", 4000, "tops")];
        let padded = CatalogQuery {
            search: " shirt ".to_string(),
            ..CatalogQuery::default()
        };
        assert!(ids(filter_products(&listings, &padded)).is_empty());

        let inner = CatalogQuery {
            search: "n sh".to_string(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(filter_products(&listings, &inner)), ["a"]);
    }

    #[test]
    fn test_inactive_listings_are_excluded() {
        let mut hidden = listing("a", "Hidden", 1000, "c");
        hidden.active = false;
        let listings = vec![hidden, listing("b", "Shown", 1000, "c")];

        assert_eq!(
            ids(filter_products(&listings, &CatalogQuery::default())),
            ["b"]
        );
    }

    #[test]
    fn test_category_filter() {
        let listings = vec![
            listing("a", "A", 1000, "shoes"),
            listing("b", "B", 1000, "bags"),
        ];
        let query = CatalogQuery {
            category: CategoryFilter::Only(CategoryId::new("bags")),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(filter_products(&listings, &query)), ["b"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let listings = vec![
            listing("1", "bracelet", 1000, "c"),
            listing("2", "Anklet", 1000, "c"),
            listing("3", "Chain", 1000, "c"),
        ];
        assert_eq!(
            ids(filter_products(&listings, &CatalogQuery::default())),
            ["2", "1", "3"]
        );
    }

    #[test]
    fn test_price_sorts_are_stable() {
        let listings = vec![
            listing("x", "X", 2000, "c"),
            listing("y", "Y", 1000, "c"),
            listing("z", "Z", 2000, "c"),
        ];
        let asc = CatalogQuery {
            sort: SortKey::PriceAsc,
            ..CatalogQuery::default()
        };
        let desc = CatalogQuery {
            sort: SortKey::PriceDesc,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(filter_products(&listings, &asc)), ["y", "x", "z"]);
        assert_eq!(ids(filter_products(&listings, &desc)), ["x", "z", "y"]);
    }

    #[test]
    fn test_sort_by_rating_and_newest() {
        let mut old = listing("old", "Old", 1000, "c");
        old.rating = 4.8;
        let mut new = listing("new", "New", 1000, "c");
        new.rating = 3.9;
        new.created_at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let listings = vec![old, new];

        let by_rating = CatalogQuery {
            sort: SortKey::Rating,
            ..CatalogQuery::default()
        };
        let by_newest = CatalogQuery {
            sort: SortKey::Newest,
            ..CatalogQuery::default()
        };
        assert_eq!(ids(filter_products(&listings, &by_rating)), ["old", "new"]);
        assert_eq!(ids(filter_products(&listings, &by_newest)), ["new", "old"]);
    }

    #[test]
    fn test_filter_is_restartable() {
        let listings = vec![listing("a", "A", 1000, "c"), listing("b", "B", 500, "c")];
        let query = CatalogQuery {
            sort: SortKey::PriceAsc,
            ..CatalogQuery::default()
        };
        let first = ids(filter_products(&listings, &query));
        let second = ids(filter_products(&listings, &query));
        assert_eq!(first, second);
    }

    #[test]
    fn test_discount_percent() {
        let mut item = listing("a", "A", 7500, "c");
        assert_eq!(item.discount_percent(), None);

        item.original_price = Some(Decimal::from(100));
        assert_eq!(item.discount_percent(), Some(25));

        item.original_price = Some(Decimal::new(7500, 2));
        assert_eq!(item.discount_percent(), None);
    }

    #[test]
    fn test_featured_and_counts() {
        let mut featured = listing("a", "A", 1000, "shoes");
        featured.featured = true;
        let mut inactive = listing("b", "B", 1000, "shoes");
        inactive.featured = true;
        inactive.active = false;
        let listings = vec![featured, inactive, listing("c", "C", 1000, "bags")];

        assert_eq!(ids(featured_products(&listings, 4)), ["a"]);

        let counts = count_by_category(&listings);
        assert_eq!(counts.get(&CategoryId::new("shoes")), Some(&1));
        assert_eq!(counts.get(&CategoryId::new("bags")), Some(&1));
    }

    #[test]
    fn test_listing_deserializes_from_table_row() {
        let row = r#"{
            "id": "p1", "name": "Silk scarf", "description": "Hand rolled",
            "price": 89.9, "original_price": null, "image_url": "/s.jpg",
            "stock": 4, "rating": 4.5, "reviews_count": 12, "category_id": "acc",
            "is_featured": true, "is_active": true, "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let listing: ProductListing = serde_json::from_str(row).unwrap();
        assert_eq!(listing.price, Decimal::new(899, 1));
        assert_eq!(listing.review_count, 12);
        assert!(listing.featured);
    }

    #[test]
    fn test_category_deserializes_from_table_row() {
        let row = r#"{"id":"acc","name":"Accessoires","description":null,"image_url":"/acc.jpg"}"#;
        let category: Category = serde_json::from_str(row).unwrap();
        assert_eq!(category.id, CategoryId::new("acc"));
        assert_eq!(category.description, None);
        assert_eq!(category.image_ref.as_deref(), Some("/acc.jpg"));

        let bare: Category = serde_json::from_str(r#"{"id":"tops","name":"Hauts"}"#).unwrap();
        assert!(bare.image_ref.is_none());
    }
}
