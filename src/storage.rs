//! Durable cart snapshots

use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use thiserror::Error;

use crate::cart::CartLine;

/// Errors raised while loading or persisting a cart snapshot.
///
/// The cart store treats these as recoverable: a failed load falls back to an
/// empty cart and a failed persist is logged and dropped.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The snapshot exists but is not a valid cart line array.
    #[error(transparent)]
    Malformed(#[from] serde_json::Error),
}

/// Where the cart keeps its durable snapshot.
///
/// The snapshot is a single JSON array of [`CartLine`] values, written in full
/// after every mutation. Last write wins; there is no locking across
/// concurrent writers.
pub trait CartStorage {
    /// Load the persisted cart lines.
    ///
    /// An absent snapshot loads as an empty cart.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`]: the backing store could not be read.
    /// - [`StorageError::Malformed`]: the snapshot could not be parsed.
    fn load(&self) -> Result<Vec<CartLine>, StorageError>;

    /// Replace the persisted snapshot with the given lines.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`]: the backing store could not be written.
    /// - [`StorageError::Malformed`]: the lines could not be serialized.
    fn persist(&self, lines: &[CartLine]) -> Result<(), StorageError>;
}

/// File-backed storage holding the snapshot at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create storage backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)?;

        Ok(serde_json::from_str(&raw)?)
    }

    fn persist(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(lines)?;

        fs::write(&self.path, raw)?;

        Ok(())
    }
}

/// In-memory storage for tests and fixtures.
///
/// Clones share the same underlying snapshot, so a cart persisted through one
/// handle can be re-opened through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    raw: Arc<Mutex<String>>,
}

impl MemoryStorage {
    /// Create empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-seeded with a raw snapshot, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Arc::new(Mutex::new(raw.into())),
        }
    }

    /// The raw snapshot as last persisted.
    pub fn raw(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, String> {
        // A poisoned lock still holds a usable snapshot.
        self.raw.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        let raw = self.lock();

        if raw.is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&raw)?)
    }

    fn persist(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(lines)?;

        *self.lock() = raw;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::cart::{CartLine, ItemKind};

    use super::*;

    fn line() -> CartLine {
        CartLine::new("r1", ItemKind::Report, "Fintech Outlook", Decimal::new(4999, 2))
    }

    #[test]
    fn memory_storage_round_trips_lines() -> TestResult {
        let storage = MemoryStorage::new();

        storage.persist(&[line()])?;
        let loaded = storage.load()?;

        assert_eq!(loaded, vec![line()]);

        Ok(())
    }

    #[test]
    fn memory_storage_empty_loads_as_empty_cart() -> TestResult {
        let storage = MemoryStorage::new();

        assert_eq!(storage.load()?, Vec::new());

        Ok(())
    }

    #[test]
    fn memory_storage_malformed_snapshot_errors() {
        let storage = MemoryStorage::with_raw("not json at all");

        assert!(matches!(storage.load(), Err(StorageError::Malformed(_))));
    }

    #[test]
    fn memory_storage_clones_share_snapshot() -> TestResult {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.persist(&[line()])?;

        assert_eq!(other.load()?, vec![line()]);

        Ok(())
    }

    #[test]
    fn file_storage_missing_file_loads_as_empty_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path().join("cart.json"));

        assert_eq!(storage.load()?, Vec::new());

        Ok(())
    }

    #[test]
    fn file_storage_round_trips_lines() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = JsonFileStorage::new(dir.path().join("cart.json"));

        storage.persist(&[line()])?;

        assert_eq!(storage.load()?, vec![line()]);

        Ok(())
    }

    #[test]
    fn file_storage_malformed_snapshot_errors() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "{ definitely broken")?;

        let storage = JsonFileStorage::new(path);

        assert!(matches!(storage.load(), Err(StorageError::Malformed(_))));

        Ok(())
    }
}
