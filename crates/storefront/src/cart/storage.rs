//! Durable key-value slots for cart snapshots.
//!
//! A cart is mirrored to a single named slot holding its JSON item array.
//! [`CartStorage`] is the port the cart store writes through; the server uses
//! [`FileStorage`] and tests use [`MemoryStorage`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Slot keys are restricted to ASCII letters, digits, `_` and `-`.
    #[error("invalid slot key: {0:?}")]
    InvalidKey(String),

    /// Filesystem failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend refused the operation (quota, disabled storage).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous key-value slot storage.
pub trait CartStorage: Send + Sync {
    /// Read the raw payload stored under `key`, `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

// =============================================================================
// File-backed slots
// =============================================================================

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` for slot files. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a crash never leaves a half-written slot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// =============================================================================
// In-memory slots
// =============================================================================

/// Process-local slots. Clones share the same slots, which lets a test drop a
/// store and hydrate a fresh one from what the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with a raw payload, bypassing key validation.
    pub fn seed(&self, key: &str, value: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
    }

    /// Raw payload currently stored under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    /// Make every subsequent write fail, as a full or disabled store would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Unavailable("slot map poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StorageError::Unavailable("slot map poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
