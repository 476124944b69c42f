//! Cart lines and the merge/clamp rules applied to them.
//!
//! A cart holds at most one line per product. Every line satisfies
//! `1 <= quantity <= stock_limit`; operations that would break this clamp or
//! drop the line instead of failing.

use luxemarket_core::{LineId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::ProductListing;

/// One product's quantity entry in the cart.
///
/// Field names on the wire match the storefront's local-storage document
/// (`id`, `product_id`, `price`, `image_url`, `stock`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identifier (`cart-<product id>`).
    #[serde(rename = "id")]
    pub line_id: LineId,
    /// Product this line is for. Unique within a cart.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    /// Product image reference.
    #[serde(rename = "image_url")]
    pub image_ref: String,
    quantity: u32,
    /// Stock available when the product was added. Not re-validated later.
    #[serde(rename = "stock")]
    pub stock_limit: u32,
}

impl CartLine {
    /// Quantity of this line, always in `1..=stock_limit`.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price * quantity`, exact.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Whether one more unit fits under the stock limit.
    #[must_use]
    pub const fn can_increment(&self) -> bool {
        self.quantity < self.stock_limit
    }
}

/// What the shopper picked when pressing "add to cart".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartCandidate {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub image_ref: String,
    pub stock_limit: u32,
}

impl CartCandidate {
    /// Build a candidate from a catalog listing.
    ///
    /// Only the id, name, price, image and stock of the listing are read.
    #[must_use]
    pub fn from_listing(listing: &ProductListing) -> Self {
        Self {
            product_id: listing.id.clone(),
            name: listing.name.clone(),
            unit_price: listing.price,
            image_ref: listing.image_ref.clone(),
            stock_limit: listing.stock,
        }
    }

    fn into_line(self) -> CartLine {
        CartLine {
            line_id: LineId::for_product(&self.product_id),
            product_id: self.product_id,
            name: self.name,
            unit_price: self.unit_price,
            image_ref: self.image_ref,
            quantity: 1,
            stock_limit: self.stock_limit,
        }
    }
}

/// Result of [`Cart::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was created with quantity 1.
    Inserted,
    /// An existing line grew by one.
    Incremented,
    /// An existing line was already at its stock limit; nothing changed.
    AtStockLimit,
    /// The candidate has no stock; nothing was inserted.
    OutOfStock,
}

impl AddOutcome {
    /// Whether the cart changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Inserted | Self::Incremented)
    }
}

/// Ordered collection of cart lines, one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from previously stored lines.
    ///
    /// Quantities are clamped to their stock limit, lines that end up empty
    /// are dropped and only the first line for a product is kept.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in lines {
            line.quantity = line.quantity.min(line.stock_limit);
            if line.quantity == 0 {
                tracing::debug!(product_id = %line.product_id, "dropping empty cart line");
                continue;
            }
            if cart.position(&line.product_id).is_some() {
                tracing::debug!(product_id = %line.product_id, "dropping duplicate cart line");
                continue;
            }
            cart.lines.push(line);
        }
        cart
    }

    /// Add one unit of a product.
    ///
    /// An existing line grows by one, capped at its stock limit. Otherwise a
    /// new line is appended with quantity 1, unless the product has no stock.
    pub fn add(&mut self, candidate: CartCandidate) -> AddOutcome {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == candidate.product_id)
        {
            if !line.can_increment() {
                return AddOutcome::AtStockLimit;
            }
            line.quantity += 1;
            return AddOutcome::Incremented;
        }

        if candidate.stock_limit == 0 {
            return AddOutcome::OutOfStock;
        }
        self.lines.push(candidate.into_line());
        AddOutcome::Inserted
    }

    /// Remove a product's line. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        self.lines.len() != before
    }

    /// Set a product's quantity.
    ///
    /// Zero or negative removes the line; anything else is clamped to
    /// `1..=stock_limit`. Unknown products are ignored. Returns the new
    /// quantity (`Some(0)` when the line was removed, `None` when the product
    /// was not in the cart).
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) -> Option<u32> {
        if quantity <= 0 {
            return self.remove(product_id).then_some(0);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)?;
        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        line.quantity = requested.clamp(1, line.stock_limit.max(1));
        Some(line.quantity)
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `unit_price * quantity` over all lines, exact.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if present.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Whether another unit of this product can be added.
    #[must_use]
    pub fn can_increment(&self, product_id: &ProductId) -> bool {
        self.line(product_id).is_some_and(CartLine::can_increment)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| &line.product_id == product_id)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn candidate(id: &str, cents: i64, stock: u32) -> CartCandidate {
        CartCandidate {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Decimal::new(cents, 2),
            image_ref: format!("/img/{id}.jpg"),
            stock_limit: stock,
        }
    }

    #[test]
    fn test_add_inserts_with_quantity_one() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(candidate("a", 1000, 5)), AddOutcome::Inserted);

        let line = cart.line(&ProductId::new("a")).unwrap();
        assert_eq!(line.quantity(), 1);
        assert_eq!(line.line_id.as_str(), "cart-a");
    }

    #[test]
    fn test_add_merges_and_caps_at_stock() {
        let mut cart = Cart::new();
        cart.add(candidate("a", 1000, 2));
        assert_eq!(cart.add(candidate("a", 1000, 2)), AddOutcome::Incremented);
        assert_eq!(cart.add(candidate("a", 1000, 2)), AddOutcome::AtStockLimit);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&ProductId::new("a")).unwrap().quantity(), 2);
    }

    #[test]
    fn test_merge_uses_stored_stock_limit() {
        let mut cart = Cart::new();
        cart.add(candidate("a", 1000, 1));
        // Later listing claims more stock; the line keeps the limit it was added with.
        assert_eq!(cart.add(candidate("a", 1000, 10)), AddOutcome::AtStockLimit);
    }

    #[test]
    fn test_add_out_of_stock_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(candidate("a", 1000, 0)), AddOutcome::OutOfStock);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(candidate("a", 1000, 3));
        assert!(cart.remove(&ProductId::new("a")));
        assert!(!cart.remove(&ProductId::new("a")));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_non_positive_removes() {
        let mut cart = Cart::new();
        cart.add(candidate("a", 1000, 3));
        cart.add(candidate("b", 1000, 3));

        assert_eq!(cart.update_quantity(&ProductId::new("a"), 0), Some(0));
        assert_eq!(cart.update_quantity(&ProductId::new("b"), -5), Some(0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_to_stock() {
        let mut cart = Cart::new();
        cart.add(candidate("a", 1000, 4));
        assert_eq!(cart.update_quantity(&ProductId::new("a"), 99), Some(4));
        assert_eq!(cart.update_quantity(&ProductId::new("a"), 2), Some(2));
        assert_eq!(cart.update_quantity(&ProductId::new("a"), i64::MAX), Some(4));
    }

    #[test]
    fn test_update_quantity_unknown_product() {
        let mut cart = Cart::new();
        assert_eq!(cart.update_quantity(&ProductId::new("x"), 3), None);
        assert_eq!(cart.update_quantity(&ProductId::new("x"), 0), None);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);

        cart.add(candidate("a", 1000, 5));
        cart.add(candidate("a", 1000, 5));
        cart.add(candidate("b", 550, 5));

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), Decimal::new(2550, 2));
    }

    #[test]
    fn test_total_price_has_no_float_drift() {
        let mut cart = Cart::new();
        cart.add(candidate("a", 10, 10));
        cart.add(candidate("b", 20, 10));
        assert_eq!(cart.total_price(), Decimal::new(3, 1));
    }

    #[test]
    fn test_can_increment() {
        let mut cart = Cart::new();
        cart.add(candidate("a", 1000, 2));
        assert!(cart.can_increment(&ProductId::new("a")));
        cart.add(candidate("a", 1000, 2));
        assert!(!cart.can_increment(&ProductId::new("a")));
        assert!(!cart.can_increment(&ProductId::new("missing")));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(candidate("c", 100, 5));
        cart.add(candidate("a", 100, 5));
        cart.add(candidate("b", 100, 5));
        cart.add(candidate("c", 100, 5));

        let order: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn test_deserialize_normalizes_lines() {
        let json = r#"[
            {"id":"cart-a","product_id":"a","name":"A","price":"10.00","image_url":"","quantity":9,"stock":3},
            {"id":"cart-a","product_id":"a","name":"A","price":"10.00","image_url":"","quantity":1,"stock":3},
            {"id":"cart-b","product_id":"b","name":"B","price":"1.00","image_url":"","quantity":2,"stock":0}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(&ProductId::new("a")).unwrap().quantity(), 3);
    }
}
