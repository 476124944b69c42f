//! Favorites commands.

use luxemarket_store::{ShopState, SnapshotStore};

/// Favorite product IDs, sorted.
#[must_use]
pub fn list<S: SnapshotStore>(state: &ShopState<S>) -> Vec<String> {
    state
        .favorites()
        .iter()
        .map(ToString::to_string)
        .collect()
}
