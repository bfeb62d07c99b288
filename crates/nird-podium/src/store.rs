//! Persistent store adapter
//!
//! The catalog is read once and never written. The score ledger is read once
//! at startup and rewritten in full, pretty-printed, after every mutation.
//! There is no incremental or transactional durability: a persist is a
//! synchronous whole-file overwrite.

use crate::error::StoreError;
use crate::types::{Catalog, Ledger, ScoreEntry};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Durable home of the score ledger
pub trait LedgerStore: Send + Sync {
    /// Read the full ledger
    ///
    /// # Errors
    /// `StoreError::Io` or `StoreError::Malformed` when the ledger cannot be read
    fn load(&self) -> Result<Ledger, StoreError>;

    /// Overwrite the durable ledger with `ledger`
    ///
    /// # Errors
    /// `StoreError::Persist` when the write does not complete
    fn persist(&self, ledger: &[ScoreEntry]) -> Result<(), StoreError>;
}

/// Read the catalog document at `path`
///
/// # Errors
/// - `StoreError::Io` if the file cannot be read
/// - `StoreError::Malformed` if it is not a catalog document
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, StoreError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| StoreError::io_error(path, e))?;
    serde_json::from_str(&raw).map_err(|e| StoreError::malformed(path, e))
}

/// Ledger kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonLedgerFile {
    path: PathBuf,
}

impl JsonLedgerFile {
    /// Ledger backed by the file at `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonLedgerFile {
    fn load(&self) -> Result<Ledger, StoreError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::io_error(&self.path, e))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::malformed(&self.path, e))
    }

    fn persist(&self, ledger: &[ScoreEntry]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(ledger)
            .map_err(|e| StoreError::persist(&self.path, std::io::Error::other(e)))?;
        std::fs::write(&self.path, body).map_err(|e| StoreError::persist(&self.path, e))
    }
}

/// Ledger held in memory only
///
/// Writes can be switched to fail, which leaves the last good copy in place.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    persisted: Mutex<Ledger>,
    fail_writes: AtomicBool,
}

impl MemoryLedger {
    /// Empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-seeded with `entries`
    #[must_use]
    pub fn with_entries(entries: Ledger) -> Self {
        Self {
            persisted: Mutex::new(entries),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent persists fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Last successfully persisted ledger
    #[must_use]
    pub fn persisted(&self) -> Ledger {
        self.persisted.lock().clone()
    }
}

impl LedgerStore for MemoryLedger {
    fn load(&self) -> Result<Ledger, StoreError> {
        Ok(self.persisted.lock().clone())
    }

    fn persist(&self, ledger: &[ScoreEntry]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::persist("<memory>", std::io::Error::other("writes disabled")));
        }
        *self.persisted.lock() = ledger.to_vec();
        Ok(())
    }
}
