//! Durable snapshot of the cart and favorites.
//!
//! The snapshot is a flat JSON document stored under a name:
//!
//! ```json
//! { "cartItems": [ { "id": "cart-p1", "product_id": "p1", ... } ], "favorites": ["p2"] }
//! ```
//!
//! Documents the web storefront wrote through its versioned persist wrapper
//! (`{"state": {...}, "version": 0}`) are read as well. Both keys are
//! required; anything else is a malformed snapshot.
//!
//! The signed-in user is not part of it.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::cart::Cart;
use crate::favorites::FavoriteSet;

/// Default snapshot name.
pub const DEFAULT_SNAPSHOT_KEY: &str = "luxemarket-store";

/// Persisted part of the shopping state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cart_items: Cart,
    pub favorites: FavoriteSet,
}

/// Accepted on-disk layouts.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Flat(Snapshot),
    Versioned { state: Snapshot },
}

impl Snapshot {
    /// Serialize to the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Serialize`] if encoding fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(PersistenceError::Serialize)
    }

    /// Parse the stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Deserialize`] if the document is malformed.
    pub fn from_json(raw: &str) -> Result<Self, PersistenceError> {
        match serde_json::from_str(raw).map_err(PersistenceError::Deserialize)? {
            StoredDocument::Flat(snapshot) | StoredDocument::Versioned { state: snapshot } => {
                Ok(snapshot)
            }
        }
    }
}

/// Snapshot storage errors.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("stored snapshot is malformed: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Named key-value storage for snapshots.
pub trait SnapshotStore {
    /// Load a snapshot. `Ok(None)` when nothing is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read or the document is malformed.
    fn load(&self, key: &str) -> Result<Option<Snapshot>, PersistenceError>;

    /// Store a snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn save(&mut self, key: &str, snapshot: &Snapshot) -> Result<(), PersistenceError>;

    /// Delete a stored snapshot. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-memory store holding raw JSON per key, like browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored document for a key.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store a raw document, bypassing serialization.
    pub fn insert_raw(&mut self, key: impl Into<String>, raw: impl Into<String>) {
        self.entries.insert(key.into(), raw.into());
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Snapshot>, PersistenceError> {
        self.entries
            .get(key)
            .map(|raw| Snapshot::from_json(raw))
            .transpose()
    }

    fn save(&mut self, key: &str, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let raw = snapshot.to_json()?;
        self.entries.insert(key.to_owned(), raw);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per snapshot.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a snapshot key.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SnapshotStore for FileStore {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    fn load(&self, key: &str) -> Result<Option<Snapshot>, PersistenceError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Snapshot::from_json(&raw).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    #[instrument(skip(self, snapshot), fields(dir = %self.dir.display()))]
    fn save(&mut self, key: &str, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let raw = snapshot.to_json()?;
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, raw).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use luxemarket_core::ProductId;
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::CartCandidate;

    fn sample() -> Snapshot {
        let mut cart = Cart::new();
        let candidate = CartCandidate {
            product_id: ProductId::new("a"),
            name: "Silk scarf".to_string(),
            unit_price: Decimal::new(4990, 2),
            image_ref: "/img/a.jpg".to_string(),
            stock_limit: 5,
        };
        for _ in 0..3 {
            cart.add(candidate.clone());
        }
        Snapshot {
            cart_items: cart,
            favorites: [ProductId::new("b")].into_iter().collect(),
        }
    }

    #[test]
    fn test_document_layout() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

        assert_eq!(value["favorites"], serde_json::json!(["b"]));
        let line = &value["cartItems"][0];
        assert_eq!(line["id"], "cart-a");
        assert_eq!(line["product_id"], "a");
        assert_eq!(line["price"], "49.90");
        assert_eq!(line["quantity"], 3);
        assert_eq!(line["stock"], 5);
        assert!(value.get("user").is_none());
    }

    #[test]
    fn test_reads_versioned_wrapper() {
        let raw = r#"{"state":{"cartItems":[{"id":"cart-a","product_id":"a","name":"Silk scarf",
            "price":49.9,"image_url":"/img/a.jpg","quantity":3,"stock":5}],
            "favorites":["b"]},"version":0}"#;

        assert_eq!(Snapshot::from_json(raw).unwrap(), sample());
    }

    #[test]
    fn test_rejects_documents_of_another_shape() {
        let documents = [
            "{}",
            r#"{"cartItems":[]}"#,
            r#"{"items":[],"favs":["b"]}"#,
            r#"{"state":{}}"#,
        ];
        for raw in documents {
            assert!(
                matches!(Snapshot::from_json(raw), Err(PersistenceError::Deserialize(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            Snapshot::from_json("{not json"),
            Err(PersistenceError::Deserialize(_))
        ));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.load(DEFAULT_SNAPSHOT_KEY).unwrap().is_none());

        store.save(DEFAULT_SNAPSHOT_KEY, &sample()).unwrap();
        assert_eq!(store.load(DEFAULT_SNAPSHOT_KEY).unwrap(), Some(sample()));

        store.remove(DEFAULT_SNAPSHOT_KEY).unwrap();
        assert!(store.raw(DEFAULT_SNAPSHOT_KEY).is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert!(store.load("cart").unwrap().is_none());
        store.save("cart", &sample()).unwrap();
        assert!(store.path_for("cart").exists());
        assert_eq!(store.load("cart").unwrap(), Some(sample()));

        store.remove("cart").unwrap();
        store.remove("cart").unwrap();
        assert!(store.load("cart").unwrap().is_none());
    }

    #[test]
    fn test_file_store_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.path_for("cart"), "42").unwrap();

        assert!(matches!(
            store.load("cart"),
            Err(PersistenceError::Deserialize(_))
        ));
    }
}
