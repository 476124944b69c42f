//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! lm-cli cart add --product-id p1 --name "Silk scarf" --price 49.90 --stock 5
//! lm-cli cart set-quantity p1 3
//! lm-cli cart remove p1
//! lm-cli cart show
//! lm-cli cart clear
//! ```

use std::str::FromStr;

use luxemarket_core::{CurrencyCode, Price};
use luxemarket_store::{ShopState, SnapshotStore};
use rust_decimal::Decimal;

use super::CommandError;

/// Parse a unit price argument.
///
/// # Errors
///
/// Returns `CommandError::InvalidPrice` for non-decimal or negative input.
pub fn parse_price(raw: &str) -> Result<Decimal, CommandError> {
    let price =
        Decimal::from_str(raw.trim()).map_err(|_| CommandError::InvalidPrice(raw.to_owned()))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CommandError::InvalidPrice(raw.to_owned()));
    }
    Ok(price)
}

/// Human-readable lines describing the cart, last line being the total.
#[must_use]
pub fn summary<S: SnapshotStore>(state: &ShopState<S>, currency: CurrencyCode) -> Vec<String> {
    let mut lines: Vec<String> = state
        .lines()
        .iter()
        .map(|line| {
            let unit = Price::new(line.unit_price, currency);
            let total = Price::new(line.line_total(), currency);
            format!(
                "{} x{} @ {unit} = {total} (stock {})",
                line.name,
                line.quantity(),
                line.stock_limit
            )
        })
        .collect();

    lines.push(format!(
        "{} item(s), total {}",
        state.total_items(),
        state.total_price_in(currency)
    ));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxemarket_core::ProductId;
    use luxemarket_store::{CartCandidate, MemoryStore};

    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("49.90").unwrap(), Decimal::new(4990, 2));
        assert_eq!(parse_price("0").unwrap(), Decimal::ZERO);
        assert!(matches!(parse_price("-1"), Err(CommandError::InvalidPrice(_))));
        assert!(matches!(parse_price("abc"), Err(CommandError::InvalidPrice(_))));
    }

    #[test]
    fn test_summary() {
        let mut state = ShopState::new(MemoryStore::new(), "k");
        let candidate = CartCandidate {
            product_id: ProductId::new("a"),
            name: "Scarf".to_string(),
            unit_price: Decimal::new(1000, 2),
            image_ref: String::new(),
            stock_limit: 5,
        };
        state.add_to_cart(candidate.clone());
        state.add_to_cart(candidate);

        let lines = summary(&state, CurrencyCode::EUR);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Scarf x2 @ 10.00 € = 20.00 € (stock 5)");
        assert_eq!(lines[1], "2 item(s), total 20.00 €");
    }
}
