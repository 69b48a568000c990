//! Saved cart commands.
//!
//! Carts are read straight from their slot files under `<data dir>/carts`, so
//! these commands work whether or not the storefront is running. A cart
//! cleared here while the visitor's copy is live in the server is written
//! back by the server on the visitor's next change.
//!
//! # Usage
//!
//! ```bash
//! galeria-cli cart show <cart key> --data-dir /var/lib/galeria
//! galeria-cli cart link <cart key>
//! galeria-cli cart clear <cart key>
//! ```
//!
//! # Environment Variables
//!
//! - `GALERIA_DATA_DIR` - Data directory (default: data)
//! - `WHATSAPP_*` - Checkout link settings, as for the storefront

use std::path::Path;

use galeria_core::CartLineItem;
use galeria_storefront::cart::{CartRegistry, CartStorage, CartStore, FileStorage, StorageError};
use galeria_storefront::checkout::CheckoutComposer;
use galeria_storefront::config::{CheckoutConfig, ConfigError};
use galeria_storefront::state::cart_dir;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// No slot exists for the key.
    #[error("No saved cart for key {0}")]
    NotFound(String),

    /// The cart has no items.
    #[error("Cart {0} is empty")]
    Empty(String),

    /// The slot could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Checkout settings are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Print the items in a saved cart.
///
/// # Errors
///
/// Returns an error if there is no cart for `key`.
pub fn show(data_dir: &Path, key: &str) -> Result<(), CartCommandError> {
    let store = open_saved_cart(data_dir, key)?;

    info!(slot = %store.slot(), items = store.count(), "Cart loaded");
    for line in describe_items(store.items()) {
        println!("{line}");
    }

    Ok(())
}

/// Print the WhatsApp quote link for a saved cart.
///
/// # Errors
///
/// Returns an error if there is no cart for `key`, it is empty, or the
/// `WHATSAPP_*` settings are invalid.
pub fn link(data_dir: &Path, key: &str) -> Result<(), CartCommandError> {
    let config = CheckoutConfig::from_lookup(|name| std::env::var(name).ok())?;
    let store = open_saved_cart(data_dir, key)?;

    let url = CheckoutComposer::new(&config)
        .compose_handoff(store.items())
        .ok_or_else(|| CartCommandError::Empty(key.to_string()))?;
    println!("{url}");

    Ok(())
}

/// Empty a saved cart.
///
/// # Errors
///
/// Returns an error if there is no cart for `key` or the emptied cart cannot
/// be written back.
pub fn clear(data_dir: &Path, key: &str) -> Result<(), CartCommandError> {
    let storage = FileStorage::new(cart_dir(data_dir));
    let slot = CartRegistry::<FileStorage>::slot_for(key);
    let mut store = open_saved_cart(data_dir, key)?;

    let removed = store.count();
    store.clear();
    if store.is_persistence_degraded() {
        // Surface the write error the store only logged
        storage.write(&slot, "[]")?;
    }

    info!(slot = %slot, removed, "Cart cleared");
    Ok(())
}

/// Hydrate the cart saved under `key`, failing if it was never written.
fn open_saved_cart(data_dir: &Path, key: &str) -> Result<CartStore<FileStorage>, CartCommandError> {
    let storage = FileStorage::new(cart_dir(data_dir));
    let slot = CartRegistry::<FileStorage>::slot_for(key);

    if storage.read(&slot)?.is_none() {
        return Err(CartCommandError::NotFound(key.to_string()));
    }

    Ok(CartStore::hydrate(storage, slot))
}

/// Numbered lines for display, in cart order.
fn describe_items(items: &[CartLineItem]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let price = item
                .display_price()
                .map_or_else(|| "sob consulta".to_string(), |price| price.display());
            format!("{}. {} ({})  {price}  [{}]", index + 1, item.name, item.size, item.id)
        })
        .collect()
}
