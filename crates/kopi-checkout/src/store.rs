//! # Cart Persistence
//!
//! The cart survives an app restart: the session reads it once at `init()`
//! and writes it after every mutation.
//!
//! ```text
//! CartSession ──save(cart)──► CartStore ──┬── MemoryCartStore (tests, kiosks)
//!             ◄──load()─────             └── JsonFileCartStore (cart.json)
//! ```
//!
//! Writes are last-write-wins; there is only ever one session per store.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use kopi_core::cart::Cart;
use tracing::debug;

use crate::error::StoreError;

/// Durable storage for a single cart.
pub trait CartStore: Send + Sync {
    /// Returns the persisted cart, or `None` if nothing was saved.
    fn load(&self) -> Result<Option<Cart>, StoreError>;

    /// Replaces the persisted cart.
    fn save(&self, cart: &Cart) -> Result<(), StoreError>;

    /// Removes the persisted cart. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    cart: Mutex<Option<Cart>>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `cart`, as if saved by an earlier session.
    pub fn with_cart(cart: Cart) -> Self {
        MemoryCartStore {
            cart: Mutex::new(Some(cart)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Cart>> {
        self.cart.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self) -> Result<Option<Cart>, StoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        *self.slot() = Some(cart.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}

// =============================================================================
// JSON File Store
// =============================================================================

/// Stores the cart as JSON in a single file.
///
/// Saves go through a sibling `.tmp` file and a rename, so a crash mid-write
/// leaves the previous cart intact.
#[derive(Debug, Clone)]
pub struct JsonFileCartStore {
    path: PathBuf,
}

impl JsonFileCartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileCartStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartStore for JsonFileCartStore {
    fn load(&self) -> Result<Option<Cart>, StoreError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No persisted cart");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let cart = serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Some(cart))
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(cart).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kopi_core::cart::LineSpec;
    use kopi_core::{Channel, Money};

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_line(LineSpec::simple("teh", "Teh Tarik", Money::from_units(12000), Channel::Retail));
        cart
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCartStore::new();
        assert!(store.load().unwrap().is_none());

        let cart = sample_cart();
        store.save(&cart).unwrap();
        assert_eq!(store.load().unwrap(), Some(cart));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCartStore::new(dir.path().join("nested").join("cart.json"));
        assert!(store.load().unwrap().is_none());

        let cart = sample_cart();
        store.save(&cart).unwrap();
        assert_eq!(store.load().unwrap(), Some(cart));
        assert!(!store.temp_path().exists());

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_reports_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileCartStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_file_store_rejects_out_of_range_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCartStore::new(dir.path().join("cart.json"));
        store.save(&sample_cart()).unwrap();

        for (field, value) in [
            ("quantity", serde_json::json!(-3)),
            ("quantity", serde_json::json!(1_000_000)),
            ("unitPrice", serde_json::json!(-12000)),
        ] {
            let mut stored: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&store.path).unwrap()).unwrap();
            stored["lines"][0][field] = value;
            std::fs::write(&store.path, stored.to_string()).unwrap();

            assert!(matches!(store.load(), Err(StoreError::Corrupt(_))), "{field} accepted");
            store.save(&sample_cart()).unwrap();
        }
    }
}
