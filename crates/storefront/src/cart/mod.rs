//! Quote cart state.
//!
//! A [`CartStore`] owns one visitor's ordered line items and the drawer flag.
//! Every completed mutation is written through to a durable slot before the
//! call returns, then announced to the store's observers. The slot is
//! best-effort: a failed write is logged and flagged, the in-memory cart keeps
//! the change and stays usable.
//!
//! Stores are built by their owner and passed around explicitly; the server
//! keeps one per visitor in a [`CartRegistry`].

mod registry;
pub mod storage;

use std::collections::HashSet;
use std::fmt;

use galeria_core::{CartLineItem, LineItemId, Product};

pub use registry::{CartHandle, CartRegistry};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};

/// Slot name of a standalone cart.
pub const CART_SLOT: &str = "galeria_cart";

/// A completed cart mutation, as delivered to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Added(LineItemId),
    Removed(LineItemId),
    Cleared,
}

/// Drawer visibility. Presentational only, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

/// Callback run synchronously after each completed mutation, with the event and
/// the cart's items after the change.
pub type CartObserver = Box<dyn Fn(&CartEvent, &[CartLineItem]) + Send + Sync>;

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One cart, mirrored to a storage slot.
pub struct CartStore<S> {
    storage: S,
    slot: String,
    items: Vec<CartLineItem>,
    drawer: DrawerState,
    observers: Vec<(SubscriptionId, CartObserver)>,
    next_subscription: u64,
    persistence_degraded: bool,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart persisted under `slot`.
    ///
    /// An empty slot, an unreadable backend or a payload that does not parse
    /// all yield an empty cart; the last two are logged. Lines repeating an
    /// earlier line's id are dropped.
    pub fn hydrate(storage: S, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let items = match storage.read(&slot) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<CartLineItem>>(&payload) {
                Ok(items) => dedup_snapshot(&slot, items),
                Err(e) => {
                    tracing::warn!(slot = %slot, error = %e, "Discarding unparseable cart snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(slot = %slot, error = %e, "Failed to read cart snapshot");
                Vec::new()
            }
        };

        tracing::debug!(slot = %slot, items = items.len(), "Cart hydrated");

        Self {
            storage,
            slot,
            items,
            drawer: DrawerState::Closed,
            observers: Vec::new(),
            next_subscription: 0,
            persistence_degraded: false,
        }
    }

    /// Add `product` in `size` to the end of the cart.
    ///
    /// Returns `false` and leaves the cart untouched when that product and size
    /// are already in it.
    pub fn add_item(&mut self, product: &Product, size: &str) -> bool {
        let item = CartLineItem::snapshot(product, size);
        if self.contains(&item.id) {
            return false;
        }

        let id = item.id.clone();
        self.items.push(item);
        self.commit(&CartEvent::Added(id));
        true
    }

    /// Remove the line with `id`. Returns whether a line was removed; the cart
    /// is persisted and observers notified either way.
    pub fn remove_item(&mut self, id: &LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        let removed = self.items.len() != before;
        self.commit(&CartEvent::Removed(id.clone()));
        removed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit(&CartEvent::Cleared);
    }

    /// Number of lines, for the header badge.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &LineItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    pub fn open_drawer(&mut self) {
        self.drawer = DrawerState::Open;
    }

    pub fn close_drawer(&mut self) {
        self.drawer = DrawerState::Closed;
    }

    #[must_use]
    pub const fn drawer(&self) -> DrawerState {
        self.drawer
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.drawer == DrawerState::Open
    }

    /// Slot this cart is mirrored to.
    #[must_use]
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Whether the most recent write to the slot failed.
    #[must_use]
    pub const fn is_persistence_degraded(&self) -> bool {
        self.persistence_degraded
    }

    /// Register an observer for completed mutations.
    pub fn subscribe(&mut self, observer: CartObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Drop a registered observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    fn commit(&mut self, event: &CartEvent) {
        self.persist();
        for (_, observer) in &self.observers {
            observer(event, &self.items);
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.items)
            .map_err(|e| StorageError::Unavailable(e.to_string()))
            .and_then(|payload| self.storage.write(&self.slot, &payload));

        match result {
            Ok(()) => self.persistence_degraded = false,
            Err(e) => {
                tracing::warn!(slot = %self.slot, error = %e, "Failed to persist cart, keeping in-memory state");
                self.persistence_degraded = true;
            }
        }
    }
}

/// Keep the first line for each id.
fn dedup_snapshot(slot: &str, items: Vec<CartLineItem>) -> Vec<CartLineItem> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(item.id.clone()) {
            kept.push(item);
        } else {
            tracing::warn!(slot = %slot, item = %item.id, "Dropping duplicate line from cart snapshot");
        }
    }
    kept
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("slot", &self.slot)
            .field("items", &self.items)
            .field("drawer", &self.drawer)
            .field("observers", &self.observers.len())
            .field("persistence_degraded", &self.persistence_degraded)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use galeria_core::{Category, ProductDraft, ProductId};
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product::from_draft(
            ProductId::new(id),
            ProductDraft::new(name, Category::Navios),
            Utc::now(),
        )
    }

    fn names(store: &CartStore<MemoryStorage>) -> Vec<&str> {
        store.items().iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn test_add_item_appends_and_persists() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);

        assert!(cart.add_item(&product("p1", "Galeão Santa Maria"), "60x40cm"));
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.items()[0].id.as_str(), "p1_60x40cm");

        let raw = storage.raw(CART_SLOT).unwrap();
        let persisted: Vec<CartLineItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, cart.items());
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);
        let p = product("p1", "Galeão Santa Maria");

        assert!(cart.add_item(&p, "60x40cm"));
        let snapshot = storage.raw(CART_SLOT);

        assert!(!cart.add_item(&p, "60x40cm"));
        assert_eq!(cart.count(), 1);
        assert_eq!(storage.raw(CART_SLOT), snapshot);

        // Same product, other size is a separate line
        assert!(cart.add_item(&p, "100x80cm"));
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_order_preserved_across_removal() {
        let mut cart = CartStore::hydrate(MemoryStorage::new(), CART_SLOT);
        cart.add_item(&product("a", "A"), "60x40cm");
        cart.add_item(&product("b", "B"), "60x40cm");
        cart.add_item(&product("c", "C"), "60x40cm");
        assert_eq!(names(&cart), ["A", "B", "C"]);

        assert!(cart.remove_item(&LineItemId::new("b_60x40cm")));
        assert_eq!(names(&cart), ["A", "C"]);

        cart.add_item(&product("d", "D"), "60x40cm");
        assert_eq!(names(&cart), ["A", "C", "D"]);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);
        cart.add_item(&product("a", "A"), "60x40cm");

        assert!(!cart.remove_item(&LineItemId::new("zzz_60x40cm")));
        assert_eq!(cart.count(), 1);
        assert!(storage.raw(CART_SLOT).is_some());
    }

    #[test]
    fn test_clear_empty_and_non_empty() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);

        cart.clear();
        assert!(cart.items().is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(storage.raw(CART_SLOT).as_deref(), Some("[]"));

        cart.add_item(&product("a", "A"), "60x40cm");
        cart.add_item(&product("b", "B"), "100x80cm");
        cart.clear();
        assert!(cart.items().is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(storage.raw(CART_SLOT).as_deref(), Some("[]"));
    }

    #[test]
    fn test_round_trip_through_storage() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);
        let mut priced = product("b", "Mapa do Porto");
        priced.price = Some(Decimal::new(4505, 1));

        cart.add_item(&product("a", "Galeão Santa Maria"), "60x40cm");
        cart.add_item(&priced, "100x80cm");
        cart.add_item(&product("c", "Catedral"), "30x20cm");
        let original = cart.items().to_vec();
        drop(cart);

        let reloaded = CartStore::hydrate(storage, CART_SLOT);
        assert_eq!(reloaded.items(), original.as_slice());
        assert!(!reloaded.is_open());
    }

    #[test]
    fn test_hydrate_discards_corrupted_snapshot() {
        for payload in ["not json", "{\"id\":1}", "[{\"name\":\"missing fields\"}]", ""] {
            let storage = MemoryStorage::new();
            storage.seed(CART_SLOT, payload);

            let cart = CartStore::hydrate(storage, CART_SLOT);
            assert!(cart.items().is_empty(), "payload {payload:?}");
        }
    }

    #[test]
    fn test_hydrate_drops_repeated_lines() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);
        cart.add_item(&product("a", "A"), "60x40cm");
        cart.add_item(&product("b", "B"), "60x40cm");
        let mut items = cart.items().to_vec();
        let mut repeated = items[0].clone();
        repeated.name = "A again".to_string();
        items.push(repeated);
        storage.seed(CART_SLOT, &serde_json::to_string(&items).unwrap());

        let mut reloaded = CartStore::hydrate(storage, CART_SLOT);
        assert_eq!(names(&reloaded), ["A", "B"]);

        assert!(reloaded.remove_item(&LineItemId::new("a_60x40cm")));
        assert_eq!(names(&reloaded), ["B"]);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_state() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);
        storage.set_fail_writes(true);

        assert!(cart.add_item(&product("a", "A"), "60x40cm"));
        assert_eq!(cart.count(), 1);
        assert!(cart.is_persistence_degraded());
        assert!(storage.raw(CART_SLOT).is_none());

        storage.set_fail_writes(false);
        cart.add_item(&product("b", "B"), "60x40cm");
        assert!(!cart.is_persistence_degraded());
        assert!(storage.raw(CART_SLOT).unwrap().contains("b_60x40cm"));
    }

    #[test]
    fn test_observers_see_completed_mutations() {
        let seen: Arc<Mutex<Vec<(CartEvent, usize)>>> = Arc::default();
        let mut cart = CartStore::hydrate(MemoryStorage::new(), CART_SLOT);

        let sink = Arc::clone(&seen);
        let subscription = cart.subscribe(Box::new(move |event, items| {
            sink.lock().unwrap().push((event.clone(), items.len()));
        }));

        let p = product("a", "A");
        cart.add_item(&p, "60x40cm");
        cart.add_item(&p, "60x40cm");
        cart.open_drawer();
        cart.remove_item(&LineItemId::new("a_60x40cm"));
        cart.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (CartEvent::Added(LineItemId::new("a_60x40cm")), 1),
                (CartEvent::Removed(LineItemId::new("a_60x40cm")), 0),
                (CartEvent::Cleared, 0),
            ]
        );

        assert!(cart.unsubscribe(subscription));
        assert!(!cart.unsubscribe(subscription));
        cart.add_item(&p, "60x40cm");
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_drawer_toggles_without_persisting() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::hydrate(storage.clone(), CART_SLOT);
        assert_eq!(cart.drawer(), DrawerState::Closed);

        cart.open_drawer();
        cart.open_drawer();
        assert!(cart.is_open());

        cart.close_drawer();
        assert_eq!(cart.drawer(), DrawerState::Closed);
        assert!(storage.raw(CART_SLOT).is_none());
    }
}
