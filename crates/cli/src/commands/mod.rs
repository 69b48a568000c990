//! Command implementations.

use std::path::PathBuf;

pub mod cart;
pub mod catalog;

/// Data directory from `GALERIA_DATA_DIR`, defaulting to `data`.
pub fn default_data_dir() -> PathBuf {
    std::env::var("GALERIA_DATA_DIR")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map_or_else(|| PathBuf::from("data"), PathBuf::from)
}

/// Catalog file from `GALERIA_CATALOG_FILE`, defaulting to
/// `<data dir>/catalog.json`.
pub fn default_catalog_file() -> PathBuf {
    std::env::var("GALERIA_CATALOG_FILE")
        .ok()
        .filter(|file| !file.is_empty())
        .map_or_else(|| default_data_dir().join("catalog.json"), PathBuf::from)
}
