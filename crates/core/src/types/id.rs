//! Newtype IDs for type-safe entity references.
//!
//! The hosted data service hands out opaque string identifiers (UUIDs in
//! practice, but the storefront never relies on that). Use the `define_id!`
//! macro to wrap them so IDs from different tables cannot be mixed up.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Accessors: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use luxemarket_core::define_id;
/// define_id!(ProductId);
/// define_id!(CategoryId);
///
/// let product = ProductId::new("p-1");
/// let category = CategoryId::new("p-1");
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = category;
/// assert_eq!(product.as_str(), category.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the owned identifier.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(CategoryId);
define_id!(LineId);

impl LineId {
    /// Line ID used for a product's cart entry (`cart-<product id>`).
    ///
    /// A cart holds at most one line per product, so the product ID alone
    /// makes the line ID unique within the cart.
    #[must_use]
    pub fn for_product(product_id: &ProductId) -> Self {
        Self(format!("cart-{product_id}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_id() {
        let id = ProductId::new("3f2a");
        assert_eq!(id.to_string(), "3f2a");
    }

    #[test]
    fn test_serde_transparent() {
        let id = CategoryId::from("shoes");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"shoes\"");

        let parsed: CategoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_line_id_for_product() {
        let line = LineId::for_product(&ProductId::new("abc"));
        assert_eq!(line.as_str(), "cart-abc");
    }

    #[test]
    fn test_ordering_follows_string() {
        assert!(ProductId::new("a") < ProductId::new("b"));
    }
}
