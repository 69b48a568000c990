//! Per-visitor cart stores.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use moka::sync::Cache;

use super::{CART_SLOT, CartEvent, CartStorage, CartStore};
use crate::error::add_breadcrumb;

/// Shared handle to one live cart.
pub type CartHandle<S> = Arc<Mutex<CartStore<S>>>;

/// Owns the live cart of every active visitor, keyed by cart key.
///
/// A cart is hydrated from its slot on first access. Carts idle for longer
/// than the configured time-to-idle are dropped from memory and hydrated again
/// on the next request; their slot keeps the contents in between.
pub struct CartRegistry<S> {
    storage: S,
    stores: Cache<String, CartHandle<S>>,
}

impl<S> CartRegistry<S>
where
    S: CartStorage + Clone + 'static,
{
    /// Create a registry writing through `storage`.
    #[must_use]
    pub fn new(storage: S, time_to_idle: Duration) -> Self {
        Self {
            storage,
            stores: Cache::builder().time_to_idle(time_to_idle).build(),
        }
    }

    /// Slot holding the cart for `key`.
    #[must_use]
    pub fn slot_for(key: &str) -> String {
        format!("{CART_SLOT}-{key}")
    }

    /// The live cart for `key`, hydrating it if it is not in memory.
    ///
    /// Concurrent first requests for the same key share one hydration.
    pub fn cart(&self, key: &str) -> CartHandle<S> {
        self.stores.get_with(key.to_string(), || self.open(key))
    }

    /// Run `f` with exclusive access to the cart for `key`.
    pub fn with_cart<R>(&self, key: &str, f: impl FnOnce(&mut CartStore<S>) -> R) -> R {
        let handle = self.cart(key);
        let mut store = handle.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// Drop the in-memory copy of `key`'s cart. Its slot is left as is.
    pub fn evict(&self, key: &str) {
        self.stores.invalidate(key);
    }

    /// Number of carts currently held in memory.
    #[must_use]
    pub fn live_carts(&self) -> u64 {
        self.stores.run_pending_tasks();
        self.stores.entry_count()
    }

    fn open(&self, key: &str) -> CartHandle<S> {
        let mut store = CartStore::hydrate(self.storage.clone(), Self::slot_for(key));

        let cart_key = key.to_string();
        store.subscribe(Box::new(move |event, items| {
            let count = items.len().to_string();
            match event {
                CartEvent::Added(id) => {
                    tracing::debug!(cart = %cart_key, item = %id, count = items.len(), "Cart item added");
                    add_breadcrumb(
                        "cart",
                        "Added to cart",
                        Some(&[("item", id.as_str()), ("count", count.as_str())]),
                    );
                }
                CartEvent::Removed(id) => {
                    tracing::debug!(cart = %cart_key, item = %id, count = items.len(), "Cart item removed");
                    add_breadcrumb(
                        "cart",
                        "Removed from cart",
                        Some(&[("item", id.as_str()), ("count", count.as_str())]),
                    );
                }
                CartEvent::Cleared => {
                    tracing::debug!(cart = %cart_key, "Cart cleared");
                    add_breadcrumb("cart", "Cleared cart", None);
                }
            }
        }));

        Arc::new(Mutex::new(store))
    }
}

impl<S> std::fmt::Debug for CartRegistry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartRegistry")
            .field("live_carts", &self.stores.entry_count())
            .finish_non_exhaustive()
    }
}
