//! Product catalog.
//!
//! The catalog is a small list of gallery works kept in memory and mirrored to
//! a JSON file. Reads never touch the disk. Writes are serialized, build the
//! new list, write it to the file and only then replace the in-memory list, so
//! a failed write leaves both as they were.

mod filter;

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use chrono::Utc;
use galeria_core::{Product, ProductDraft, ProductId, ProductValidationError};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

pub use filter::GalleryFilter;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Invalid product: {0}")]
    Invalid(#[from] ProductValidationError),

    #[error("Catalog file error: {0}")]
    Io(#[from] io::Error),

    #[error("Catalog file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    /// Whether the failure is on the server side (file I/O or format).
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Parse(_))
    }
}

/// In-memory product list mirrored to a JSON file.
#[derive(Debug)]
pub struct ProductCatalog {
    path: Option<PathBuf>,
    products: RwLock<Vec<Product>>,
    write_lock: Mutex<()>,
}

impl ProductCatalog {
    /// Load the catalog stored at `path`. A missing file is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    #[instrument]
    pub async fn open(path: &Path) -> Result<Self, CatalogError> {
        let products = match tokio::fs::read_to_string(path).await {
            Ok(raw) => serde_json::from_str::<Vec<Product>>(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No catalog file yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        for issue in validate_catalog(&products) {
            tracing::warn!(%issue, "Catalog issue");
        }
        tracing::info!(products = products.len(), "Catalog loaded");

        Ok(Self {
            path: Some(path.to_path_buf()),
            products: RwLock::new(products),
            write_lock: Mutex::new(()),
        })
    }

    /// A catalog that is never written to disk.
    #[must_use]
    pub fn in_memory(products: Vec<Product>) -> Self {
        Self {
            path: None,
            products: RwLock::new(products),
            write_lock: Mutex::new(()),
        }
    }

    /// All products, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Product> {
        let mut products = self.snapshot();
        products.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        products
    }

    /// Products passing `filter`, newest first.
    #[must_use]
    pub fn search(&self, filter: &GalleryFilter) -> Vec<Product> {
        let products = self.list();
        filter.apply(&products).into_iter().cloned().collect()
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` for an unknown id.
    pub fn get(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.read()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Add a product built from `draft`, with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the draft is invalid or the file write fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        draft.validate()?;
        let product = Product::from_draft(
            ProductId::new(Uuid::new_v4().simple().to_string()),
            draft,
            Utc::now(),
        );

        let _guard = self.write_lock.lock().await;
        let mut products = self.snapshot();
        products.push(product.clone());
        self.store(products).await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace the editable fields of product `id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the product does not exist, the draft is
    /// invalid or the file write fails.
    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<Product, CatalogError> {
        draft.validate()?;

        let _guard = self.write_lock.lock().await;
        let mut products = self.snapshot();
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        product.apply(draft);
        let updated = product.clone();
        self.store(products).await?;

        tracing::info!(product_id = %id, "Product updated");
        Ok(updated)
    }

    /// Remove product `id`, returning it.
    ///
    /// Carts holding the product keep their snapshot lines.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the product does not exist or the file write
    /// fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.snapshot();
        let index = products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        let removed = products.remove(index);
        self.store(products).await?;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(removed)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Product>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Vec<Product> {
        self.read().clone()
    }

    /// Write `products` to the file, then make them the live list.
    async fn store(&self, products: Vec<Product>) -> Result<(), CatalogError> {
        if let Some(path) = &self.path {
            let payload = serde_json::to_string_pretty(&products)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            let tmp = path.with_extension("json.tmp");
            tokio::fs::write(&tmp, payload).await?;
            tokio::fs::rename(&tmp, path).await?;
        }

        *self.products.write().unwrap_or_else(PoisonError::into_inner) = products;
        Ok(())
    }
}

/// Check a product list for problems: duplicate ids and records that would not
/// pass draft validation. Returns one message per problem.
#[must_use]
pub fn validate_catalog(products: &[Product]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for product in products {
        if !seen.insert(&product.id) {
            issues.push(format!("duplicate product id {}", product.id));
        }

        let draft = ProductDraft {
            name: product.name.clone(),
            category: product.category,
            image_url: product.image_url.clone(),
            image_urls: product.image_urls.clone(),
            price: product.price,
            sizes: product.sizes.clone(),
            description: product.description.clone(),
            is_featured: product.is_featured,
        };
        if let Err(e) = draft.validate() {
            issues.push(format!("product {}: {e}", product.id));
        }
        if product.primary_image_url().is_none() {
            issues.push(format!("product {}: no image", product.id));
        }
    }

    issues
}
