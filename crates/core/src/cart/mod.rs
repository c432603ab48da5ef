//! Shopping cart store.
//!
//! [`CartStore`] is the only mutator of [`CartState`]. It owns a
//! [`CartPersistence`] and writes the full item list through to it after
//! every change to the items. Drawer visibility is never persisted.
//!
//! # Invariants
//!
//! - every line item has `quantity >= 1`
//! - no two line items share a product id
//! - `subtotal()` is `Σ unit_price × quantity` over the current items
//!
//! # Example
//!
//! ```rust
//! use ishop_core::cart::{CartStore, KeyValueCartPersistence, NewLineItem};
//! use ishop_core::{MemoryStore, Price, ProductId};
//!
//! let mut cart = CartStore::load(KeyValueCartPersistence::new(MemoryStore::new()));
//! let tea = NewLineItem::new(ProductId::new(1), "Tea", Price::from_toman(1000));
//!
//! cart.add_item(tea.clone());
//! cart.add_item(tea);
//!
//! assert_eq!(cart.len(), 1);
//! assert_eq!(cart.total_item_count(), 2);
//! assert_eq!(cart.subtotal(), Price::from_toman(2000));
//! ```

mod item;
mod order;
mod persistence;

pub use item::{LineItem, NewLineItem};
pub use order::{OrderLine, OrderRequest};
pub use persistence::{CART_KEY, CartPersistence, KeyValueCartPersistence};

use tracing::debug;

use crate::types::{Price, ProductId, Quantity};

/// Drawer visibility plus the ordered line items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    is_open: bool,
    items: Vec<LineItem>,
}

impl CartState {
    /// Whether the cart drawer is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }
}

/// The cart, bound to the persistence it writes through to.
#[derive(Debug)]
pub struct CartStore<P: CartPersistence> {
    state: CartState,
    persistence: P,
}

impl<P: CartPersistence> CartStore<P> {
    /// Create a store rehydrated from `persistence`, with the drawer closed.
    pub fn load(persistence: P) -> Self {
        let items = persistence.load();
        Self {
            state: CartState {
                is_open: false,
                items,
            },
            persistence,
        }
    }

    /// Show the drawer.
    pub const fn open(&mut self) {
        self.state.is_open = true;
    }

    /// Hide the drawer.
    pub const fn close(&mut self) {
        self.state.is_open = false;
    }

    /// Add one unit of a product, merging into an existing line if the
    /// product is already in the cart. Returns the line's new quantity.
    pub fn add_item(&mut self, item: NewLineItem) -> Quantity {
        let id = item.id;
        let quantity = if let Some(existing) = self.find_mut(item.id) {
            existing.quantity = existing.quantity.incremented();
            existing.quantity
        } else {
            self.state.items.push(item.into_line_item(Quantity::ONE));
            Quantity::ONE
        };

        debug!(product_id = %id, quantity = %quantity, "Added to cart");
        self.persist();
        quantity
    }

    /// Remove the line for `id`, returning it. Removing a product that is
    /// not in the cart does nothing.
    pub fn remove_item(&mut self, id: ProductId) -> Option<LineItem> {
        let index = self.state.items.iter().position(|item| item.id == id)?;
        let removed = self.state.items.remove(index);
        debug!(product_id = %id, "Removed from cart");
        self.persist();
        Some(removed)
    }

    /// Set the quantity of the line for `id`, clamped to at least one.
    ///
    /// Returns the applied quantity, or `None` (and changes nothing) if the
    /// product is not in the cart. Setting zero never removes the line.
    pub fn set_quantity(&mut self, id: ProductId, requested: i64) -> Option<Quantity> {
        let quantity = Quantity::clamped(requested);
        let line = self.find_mut(id)?;
        line.quantity = quantity;
        debug!(product_id = %id, quantity = %quantity, "Set cart quantity");
        self.persist();
        Some(quantity)
    }

    /// Remove every line item. Drawer visibility is unaffected.
    pub fn clear(&mut self) {
        self.state.items.clear();
        debug!("Cleared cart");
        self.persist();
    }

    /// Sum of `unit_price × quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.state
            .items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Body for `POST /orders` describing the current cart.
    #[must_use]
    pub fn order_request(&self) -> OrderRequest {
        OrderRequest {
            items: self.state.items.iter().map(OrderLine::from).collect(),
            total: self.subtotal(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.state.items.iter().find(|item| item.id == id)
    }

    /// Whether the drawer is visible.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// The persistence this store writes through to.
    pub const fn persistence(&self) -> &P {
        &self.persistence
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.state.items.iter_mut().find(|item| item.id == id)
    }

    fn persist(&self) {
        self.persistence.save(&self.state.items);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    /// Records every save so tests can check write-through behavior.
    #[derive(Default)]
    struct RecordingPersistence {
        initial: Vec<LineItem>,
        saves: Cell<usize>,
        last: RefCell<Option<Vec<LineItem>>>,
    }

    impl CartPersistence for RecordingPersistence {
        fn load(&self) -> Vec<LineItem> {
            self.initial.clone()
        }

        fn save(&self, items: &[LineItem]) {
            self.saves.set(self.saves.get() + 1);
            *self.last.borrow_mut() = Some(items.to_vec());
        }
    }

    fn product(id: i64, price: u64) -> NewLineItem {
        NewLineItem::new(ProductId::new(id), format!("product {id}"), Price::from_toman(price))
    }

    fn empty_cart() -> CartStore<RecordingPersistence> {
        CartStore::load(RecordingPersistence::default())
    }

    #[test]
    fn test_starts_closed_and_empty() {
        let cart = empty_cart();
        assert!(!cart.is_open());
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
        assert_eq!(cart.total_item_count(), 0);
    }

    #[test]
    fn test_add_same_product_twice_merges() {
        let mut cart = empty_cart();
        cart.add_item(product(1, 1000));
        let quantity = cart.add_item(product(1, 1000));

        assert_eq!(quantity.get(), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity.get(), 2);
        assert_eq!(cart.subtotal(), Price::from_toman(2000));
    }

    #[test]
    fn test_repeated_adds_count_every_call() {
        let mut cart = empty_cart();
        for n in 1..=25_u64 {
            cart.add_item(product(4, 10));
            cart.add_item(product(5, 20));
            assert_eq!(cart.total_item_count(), n * 2);
        }
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(4)).unwrap().quantity.get(), 25);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = empty_cart();
        cart.add_item(product(3, 1));
        cart.add_item(product(1, 1));
        cart.add_item(product(2, 1));
        cart.add_item(product(1, 1));

        let ids: Vec<i64> = cart.items().iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_set_quantity_zero_clamps_to_one() {
        let mut cart = empty_cart();
        cart.add_item(product(2, 500));

        assert_eq!(cart.set_quantity(ProductId::new(2), 0).unwrap().get(), 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.subtotal(), Price::from_toman(500));

        assert_eq!(cart.set_quantity(ProductId::new(2), -7).unwrap().get(), 1);
        assert_eq!(cart.set_quantity(ProductId::new(2), 6).unwrap().get(), 6);
        assert_eq!(cart.subtotal(), Price::from_toman(3000));
    }

    #[test]
    fn test_set_quantity_missing_id_is_noop() {
        let mut cart = empty_cart();
        cart.add_item(product(1, 100));
        let before = cart.state().clone();
        let saves = cart.persistence().saves.get();

        assert_eq!(cart.set_quantity(ProductId::new(99), 5), None);
        assert_eq!(cart.state(), &before);
        assert_eq!(cart.persistence().saves.get(), saves);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut cart = empty_cart();
        cart.add_item(product(3, 300));

        assert!(cart.remove_item(ProductId::new(3)).is_some());
        assert!(cart.remove_item(ProductId::new(3)).is_none());
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_clear_keeps_drawer_state() {
        let mut cart = empty_cart();
        cart.open();
        cart.add_item(product(1, 1));
        cart.add_item(product(2, 1));
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.is_open());
    }

    #[test]
    fn test_open_close_do_not_persist() {
        let mut cart = empty_cart();
        cart.open();
        assert!(cart.is_open());
        cart.close();
        assert!(!cart.is_open());
        assert_eq!(cart.persistence().saves.get(), 0);
    }

    #[test]
    fn test_every_item_mutation_writes_through() {
        let mut cart = empty_cart();
        cart.add_item(product(1, 10));
        cart.add_item(product(2, 20));
        cart.set_quantity(ProductId::new(2), 3);
        cart.remove_item(ProductId::new(1));
        assert_eq!(cart.persistence().saves.get(), 4);

        let saved = cart.persistence().last.borrow().clone().unwrap();
        assert_eq!(saved, cart.items());

        cart.clear();
        assert_eq!(cart.persistence().saves.get(), 5);
        assert!(cart.persistence().last.borrow().as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_subtotal_tracks_mutations() {
        let mut cart = empty_cart();
        cart.add_item(product(1, 1000));
        let after_first = cart.subtotal();
        cart.add_item(product(2, 250));
        assert!(cart.subtotal() > after_first);

        cart.set_quantity(ProductId::new(2), 4);
        assert_eq!(cart.subtotal(), Price::from_toman(2000));

        cart.remove_item(ProductId::new(1));
        assert_eq!(cart.subtotal(), Price::from_toman(1000));
    }

    #[test]
    fn test_rehydrates_from_persistence() {
        let store = MemoryStore::new();
        {
            let mut cart = CartStore::load(KeyValueCartPersistence::new(&store));
            cart.add_item(product(1, 1000).with_image("/img/1.jpg"));
            cart.add_item(product(1, 1000));
            cart.add_item(product(2, 50));
            cart.open();
        }

        let cart = CartStore::load(KeyValueCartPersistence::new(&store));
        assert!(!cart.is_open());
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.subtotal(), Price::from_toman(2050));
        assert_eq!(
            cart.get(ProductId::new(1)).unwrap().image_url.as_deref(),
            Some("/img/1.jpg")
        );
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let store = MemoryStore::with_entry(CART_KEY, "[{\"id\":");
        let mut cart = CartStore::load(KeyValueCartPersistence::new(&store));
        assert!(cart.is_empty());

        cart.add_item(product(8, 80));
        let raw = store.get(CART_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
    }

    #[test]
    fn test_order_request() {
        let mut cart = empty_cart();
        cart.add_item(product(1, 1000));
        cart.add_item(product(1, 1000));
        cart.add_item(product(2, 500));

        let request = cart.order_request();
        assert_eq!(request.total, Price::from_toman(2500));
        assert_eq!(request.items.len(), 2);
        assert_eq!(request.items[0].product_id, ProductId::new(1));
        assert_eq!(request.items[0].quantity.get(), 2);
        assert_eq!(request.items[1].price, Price::from_toman(500));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["product_id"], 1);
        assert_eq!(json["total"].as_f64(), Some(2500.0));
    }
}
