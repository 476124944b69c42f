//! Luxemarket shopping state.
//!
//! The client-side state behind the storefront screens: cart lines with their
//! merge and stock-clamping rules, the favorites set, the signed-in user, and
//! the catalog filter/sort pipeline.
//!
//! # Architecture
//!
//! - [`ShopState`] is an explicit state object owned by the composition root.
//!   Presentation code receives it (or a cloned [`ShopHandle`]) rather than
//!   reaching for a global.
//! - Persistence is an explicit [`SnapshotStore`] that the state writes to
//!   after every cart or favorites mutation. Writes are best-effort.
//! - Money is exact: prices and totals are `rust_decimal::Decimal`, rounded
//!   only when formatted through [`luxemarket_core::Price`].
//!
//! # Modules
//!
//! - [`cart`] - Cart lines, merge and clamp rules, totals
//! - [`favorites`] - Favorite product set
//! - [`session`] - Signed-in user identity
//! - [`snapshot`] - Snapshot document and storage backends
//! - [`state`] - The container tying it together
//! - [`catalog`] - Listing filter/sort pipeline
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod session;
pub mod snapshot;
pub mod state;

pub use cart::{AddOutcome, Cart, CartCandidate, CartLine};
pub use catalog::{
    CatalogError, CatalogQuery, Category, CategoryFilter, PriceBracket, ProductListing, SortKey,
    count_by_category, featured_products, filter_products,
};
pub use config::{ConfigError, StoreConfig};
pub use error::{Result, StoreError};
pub use favorites::FavoriteSet;
pub use session::SessionUser;
pub use snapshot::{
    DEFAULT_SNAPSHOT_KEY, FileStore, MemoryStore, PersistenceError, Snapshot, SnapshotStore,
};
pub use state::{ShopHandle, ShopState};
