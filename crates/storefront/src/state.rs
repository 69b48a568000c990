//! Application state shared across handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cart::{CartRegistry, FileStorage};
use crate::catalog::ProductCatalog;
use crate::checkout::CheckoutComposer;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and is the single owner of the
/// catalog and of every visitor's cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: ProductCatalog,
    carts: CartRegistry<FileStorage>,
    checkout: CheckoutComposer,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Cart slots live in `<data dir>/carts`.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: ProductCatalog) -> Self {
        let carts = CartRegistry::new(
            FileStorage::new(cart_dir(&config.data_dir)),
            config.cart_idle,
        );
        let checkout = CheckoutComposer::new(&config.checkout);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
                checkout,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the visitors' carts.
    #[must_use]
    pub fn carts(&self) -> &CartRegistry<FileStorage> {
        &self.inner.carts
    }

    /// Get a reference to the checkout link composer.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutComposer {
        &self.inner.checkout
    }
}

/// Directory holding cart slot files under `data_dir`.
#[must_use]
pub fn cart_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("carts")
}
