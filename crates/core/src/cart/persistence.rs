//! Cart persistence bridge.
//!
//! Keeps the item list durable across restarts. Persistence is a
//! convenience: nothing here ever returns an error to the cart. Unreadable
//! records load as an empty cart and failed writes are logged and dropped.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::LineItem;
use crate::storage::KeyValueStore;

/// Storage key of the persisted cart.
pub const CART_KEY: &str = "cart";

/// Load and save the cart's item list.
pub trait CartPersistence {
    /// The last saved items, or an empty list if nothing usable is stored.
    fn load(&self) -> Vec<LineItem>;

    /// Replace the stored items. Best effort.
    fn save(&self, items: &[LineItem]);
}

impl<T: CartPersistence + ?Sized> CartPersistence for &T {
    fn load(&self) -> Vec<LineItem> {
        (**self).load()
    }

    fn save(&self, items: &[LineItem]) {
        (**self).save(items);
    }
}

/// [`CartPersistence`] over any [`KeyValueStore`], storing the items as a
/// JSON array under a single key.
#[derive(Debug)]
pub struct KeyValueCartPersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValueCartPersistence<S> {
    /// Persist under [`CART_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, CART_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> CartPersistence for KeyValueCartPersistence<S> {
    fn load(&self) -> Vec<LineItem> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read saved cart");
                return Vec::new();
            }
        };

        match decode_items(&raw) {
            Ok(items) => {
                debug!(key = %self.key, count = items.len(), "Loaded saved cart");
                items
            }
            Err(reason) => {
                warn!(key = %self.key, error = %reason, "Discarding unreadable saved cart");
                Vec::new()
            }
        }
    }

    fn save(&self, items: &[LineItem]) {
        let encoded = match serde_json::to_string(items) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to serialize cart");
                return;
            }
        };

        if let Err(e) = self.store.set(&self.key, &encoded) {
            warn!(key = %self.key, error = %e, "Failed to save cart");
        }
    }
}

/// Parse a stored record, rejecting anything that breaks the cart's
/// invariants.
fn decode_items(raw: &str) -> Result<Vec<LineItem>, String> {
    let items: Vec<LineItem> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut seen = HashSet::with_capacity(items.len());
    if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.id)) {
        return Err(format!("duplicate product id {}", duplicate.id));
    }

    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use crate::types::{Price, ProductId, Quantity};

    fn item(id: i64, price: u64, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            name: format!("product {id}"),
            unit_price: Price::from_toman(price),
            image_url: None,
            quantity: Quantity::try_from(quantity).unwrap(),
        }
    }

    /// A store whose writes always fail, like a full browser quota.
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_roundtrip_preserves_order_and_fields() {
        let persistence = KeyValueCartPersistence::new(MemoryStore::new());
        let mut with_image = item(9, 120, 4);
        with_image.image_url = Some("/static/9.jpg".to_string());
        let items = vec![item(3, 300, 1), with_image, item(1, 1000, 2)];

        persistence.save(&items);
        assert_eq!(persistence.load(), items);
    }

    #[test]
    fn test_roundtrip_keeps_prices_exact() {
        let persistence = KeyValueCartPersistence::new(MemoryStore::new());
        let prices = [
            "1234.123456789012345678".parse().unwrap(),
            rust_decimal::Decimal::from(9_007_199_254_740_993_u64),
            rust_decimal::Decimal::MAX,
        ];
        let items: Vec<LineItem> = prices
            .into_iter()
            .zip(1..)
            .map(|(amount, id)| LineItem {
                unit_price: Price::new(amount).unwrap(),
                ..item(id, 0, 1)
            })
            .collect();

        persistence.save(&items);
        let loaded = persistence.load();
        assert_eq!(loaded.len(), 3);
        for (saved, loaded) in items.iter().zip(&loaded) {
            assert_eq!(
                loaded.unit_price.amount().to_string(),
                saved.unit_price.amount().to_string()
            );
        }
    }

    #[test]
    fn test_missing_record_loads_empty() {
        let persistence = KeyValueCartPersistence::new(MemoryStore::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_truncated_json_loads_empty() {
        let store = MemoryStore::with_entry(CART_KEY, r#"[{"id":1,"name":"A","pri"#);
        let persistence = KeyValueCartPersistence::new(store);
        assert!(persistence.load().is_empty());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_wrong_shape_loads_empty() {
        for raw in [
            r#"{"id":1}"#,
            r#"[{"id":1,"name":"A","price":10,"quantity":0}]"#,
            r#"[{"id":1,"name":"A","price":-10,"quantity":1}]"#,
            r#"[{"id":1,"name":"A","price":10,"quantity":1},{"id":1,"name":"B","price":5,"quantity":1}]"#,
        ] {
            let persistence = KeyValueCartPersistence::new(MemoryStore::with_entry(CART_KEY, raw));
            assert!(persistence.load().is_empty(), "record: {raw}");
        }
    }

    #[test]
    fn test_record_format() {
        let store = MemoryStore::new();
        let persistence = KeyValueCartPersistence::new(&store);
        let mut first = item(1, 1000, 2);
        first.image_url = Some("a.jpg".to_string());
        persistence.save(&[first, item(2, 500, 1)]);

        let raw = store.get(CART_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["name"], "product 1");
        assert_eq!(value[0]["price"].as_f64(), Some(1000.0));
        assert_eq!(value[0]["image_url"], "a.jpg");
        assert_eq!(value[0]["quantity"], 2);
        assert!(value[1].get("image_url").is_none());
    }

    #[test]
    fn test_accepts_record_without_image_url() {
        let raw = r#"[{"id":7,"name":"Tea","price":250,"quantity":3}]"#;
        let persistence = KeyValueCartPersistence::new(MemoryStore::with_entry(CART_KEY, raw));
        let items = persistence.load();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity.get(), 3);
        assert_eq!(items[0].image_url, None);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let persistence = KeyValueCartPersistence::new(FullStore);
        persistence.save(&[item(1, 10, 1)]);
        assert!(persistence.load().is_empty());
    }
}
