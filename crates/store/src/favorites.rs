//! Favorite products.

use std::collections::BTreeSet;

use luxemarket_core::ProductId;
use serde::{Deserialize, Serialize};

/// Set of product IDs the shopper bookmarked.
///
/// Order is not significant; the set is kept sorted so snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: BTreeSet<ProductId>,
}

impl FavoriteSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: BTreeSet::new(),
        }
    }

    /// Add a product. Returns `false` if it was already a favorite.
    pub fn insert(&mut self, product_id: ProductId) -> bool {
        self.ids.insert(product_id)
    }

    /// Remove a product. Returns `false` if it was not a favorite.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        self.ids.remove(product_id)
    }

    /// Flip membership and return the new state.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.ids.remove(&product_id) {
            false
        } else {
            self.ids.insert(product_id);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.ids.contains(product_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }
}

impl FromIterator<ProductId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
