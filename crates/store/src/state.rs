//! The shopping state container.
//!
//! [`ShopState`] is the single source of truth for the cart, the favorites
//! and the signed-in user. It is owned by the composition root and passed to
//! whatever needs it; [`ShopHandle`] shares it between readers on one thread.
//!
//! Every cart or favorites mutation writes a [`Snapshot`] through the
//! configured [`SnapshotStore`]. Persistence is best-effort: failures are
//! logged and kept for inspection but never undo or block the mutation.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use luxemarket_core::{CurrencyCode, Price, ProductId};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::cart::{AddOutcome, Cart, CartCandidate, CartLine};
use crate::favorites::FavoriteSet;
use crate::session::SessionUser;
use crate::snapshot::{PersistenceError, Snapshot, SnapshotStore};

/// Cart, favorites and current user, persisted through `S`.
#[derive(Debug)]
pub struct ShopState<S> {
    cart: Cart,
    favorites: FavoriteSet,
    user: Option<SessionUser>,
    store: S,
    key: String,
    last_persist_error: Option<PersistenceError>,
}

impl<S: SnapshotStore> ShopState<S> {
    /// Create an empty state that will persist under `key`.
    ///
    /// Nothing is written until the first mutation.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            cart: Cart::new(),
            favorites: FavoriteSet::new(),
            user: None,
            store,
            key: key.into(),
            last_persist_error: None,
        }
    }

    /// Rehydrate cart and favorites from the snapshot stored under `key`.
    ///
    /// A missing snapshot gives an empty state. An unreadable one is logged
    /// and also gives an empty state; the error is kept in
    /// [`last_persist_error`](Self::last_persist_error).
    #[instrument(skip(store, key), fields(key = tracing::field::Empty))]
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let mut state = Self::new(store, key);
        tracing::Span::current().record("key", state.key.as_str());

        match state.store.load(&state.key) {
            Ok(Some(snapshot)) => {
                tracing::debug!(
                    lines = snapshot.cart_items.len(),
                    favorites = snapshot.favorites.len(),
                    "restored shopping state"
                );
                state.cart = snapshot.cart_items;
                state.favorites = snapshot.favorites;
            }
            Ok(None) => tracing::debug!("no stored shopping state"),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable shopping state");
                state.last_persist_error = Some(e);
            }
        }
        state
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a product, merging into an existing line.
    pub fn add_to_cart(&mut self, candidate: CartCandidate) -> AddOutcome {
        let product_id = candidate.product_id.clone();
        let outcome = self.cart.add(candidate);
        tracing::debug!(%product_id, ?outcome, "add to cart");
        if outcome.changed() {
            self.persist();
        }
        outcome
    }

    /// Remove a product's line, if any.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        if self.cart.remove(product_id) {
            tracing::debug!(%product_id, "removed from cart");
            self.persist();
        }
    }

    /// Set a product's quantity; zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if let Some(applied) = self.cart.update_quantity(product_id, quantity) {
            tracing::debug!(%product_id, requested = quantity, applied, "cart quantity updated");
            self.persist();
        }
    }

    /// Empty the cart, e.g. once checkout completes.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        tracing::debug!("cart cleared");
        self.persist();
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Exact sum of `unit_price * quantity`.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.cart.total_price()
    }

    /// [`total_price`](Self::total_price) tagged with a currency for display.
    #[must_use]
    pub fn total_price_in(&self, currency: CurrencyCode) -> Price {
        Price::new(self.total_price(), currency)
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.cart.line(product_id)
    }

    /// Whether the cart's "+" control should be enabled for a product.
    #[must_use]
    pub fn can_increment(&self, product_id: &ProductId) -> bool {
        self.cart.can_increment(product_id)
    }

    // =========================================================================
    // Favorites
    // =========================================================================

    pub fn add_to_favorites(&mut self, product_id: ProductId) {
        if self.favorites.insert(product_id) {
            self.persist();
        }
    }

    pub fn remove_from_favorites(&mut self, product_id: &ProductId) {
        if self.favorites.remove(product_id) {
            self.persist();
        }
    }

    /// Flip a product's favorite state and return the new state.
    pub fn toggle_favorite(&mut self, product_id: ProductId) -> bool {
        let now_favorite = self.favorites.toggle(product_id);
        self.persist();
        now_favorite
    }

    #[must_use]
    pub fn is_favorite(&self, product_id: &ProductId) -> bool {
        self.favorites.contains(product_id)
    }

    #[must_use]
    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Replace the current identity. Never persisted.
    pub fn set_user(&mut self, user: Option<SessionUser>) {
        tracing::debug!(
            user_id = user.as_ref().map(|u| u.user_id.as_str()),
            "session user changed"
        );
        self.user = user;
    }

    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(SessionUser::is_admin)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// The persisted part of the state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            cart_items: self.cart.clone(),
            favorites: self.favorites.clone(),
        }
    }

    /// Most recent load or save failure, cleared by the next successful save.
    #[must_use]
    pub const fn last_persist_error(&self) -> Option<&PersistenceError> {
        self.last_persist_error.as_ref()
    }

    /// Take the pending load or save failure, leaving none behind.
    pub const fn take_persist_error(&mut self) -> Option<PersistenceError> {
        self.last_persist_error.take()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Consume the state and hand back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        match self.store.save(&self.key, &snapshot) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to persist shopping state");
                self.last_persist_error = Some(e);
            }
        }
    }
}

/// Shared, single-threaded handle to a [`ShopState`].
///
/// Cloning is cheap; every clone sees the same state. Borrow rules are those
/// of [`RefCell`]: do not call [`update`](Self::update) from inside
/// [`read`](Self::read) or another `update`.
#[derive(Debug)]
pub struct ShopHandle<S> {
    inner: Rc<RefCell<ShopState<S>>>,
}

impl<S> Clone for ShopHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: SnapshotStore> ShopHandle<S> {
    #[must_use]
    pub fn new(state: ShopState<S>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    /// Borrow the state for reading.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, ShopState<S>> {
        self.inner.borrow()
    }

    /// Run a read-only closure against the state.
    pub fn read<R>(&self, f: impl FnOnce(&ShopState<S>) -> R) -> R {
        f(&self.inner.borrow())
    }

    /// Run a mutating closure against the state.
    pub fn update<R>(&self, f: impl FnOnce(&mut ShopState<S>) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }
}
