//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! galeria-cli catalog list --file data/catalog.json
//! galeria-cli catalog validate data/catalog.json
//! ```

use std::path::Path;

use galeria_core::Product;
use galeria_storefront::catalog::{CatalogError, ProductCatalog, validate_catalog};
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur during catalog commands.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    /// The catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The file is missing.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The file could not be read.
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a JSON product array.
    #[error("Catalog file is not a product list: {0}")]
    Parse(#[from] serde_json::Error),

    /// Validation found problems.
    #[error("{0} catalog problems found")]
    Invalid(usize),
}

/// Print every product, newest first.
///
/// # Errors
///
/// Returns an error if the catalog file exists but cannot be read or parsed.
pub async fn list(file: &Path) -> Result<(), CatalogCommandError> {
    let catalog = ProductCatalog::open(file).await?;
    let products = catalog.list();

    info!(path = %file.display(), products = products.len(), "Catalog loaded");
    for product in &products {
        println!("{}", describe(product));
    }

    Ok(())
}

/// Check a catalog file and report every problem found.
///
/// # Errors
///
/// Returns an error if the file is missing, is not a product list, or has
/// problems.
pub async fn validate(file: &Path) -> Result<(), CatalogCommandError> {
    if !file.exists() {
        return Err(CatalogCommandError::FileNotFound(file.display().to_string()));
    }

    let content = tokio::fs::read_to_string(file).await?;
    let products: Vec<Product> = serde_json::from_str(&content)?;
    info!(products = products.len(), "Parsed catalog");

    let issues = validate_catalog(&products);
    if !issues.is_empty() {
        error!("Catalog validation failed:");
        for issue in &issues {
            error!("  - {issue}");
        }
        return Err(CatalogCommandError::Invalid(issues.len()));
    }

    info!("Catalog validated successfully");
    Ok(())
}

/// One-line summary of a product.
fn describe(product: &Product) -> String {
    let price = product
        .display_price()
        .map_or_else(|| "sob consulta".to_string(), |price| price.display());
    let featured = if product.is_featured { " *" } else { "" };

    format!(
        "{}  [{}] {}{featured}  {price}  ({})",
        product.id,
        product.category,
        product.name,
        product.offered_sizes().join(", ")
    )
}
