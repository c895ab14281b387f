//! Test fixtures and repository helpers.
//!
//! Provides convenience functions for setting up repositories and stores
//! in common test scenarios.

use quotebook_core::{Quote, QuoteRepository};
use quotebook_storage::{FileStore, InMemoryStore, KeyValueStore, StorageError, StorageResult};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Builds quotes from `(text, category)` pairs.
///
/// Panics on blank fields; test data is expected to be valid.
pub fn quotes(pairs: &[(&str, &str)]) -> Vec<Quote> {
    pairs
        .iter()
        .map(|(text, category)| Quote::new(text, category).expect("test quote must be valid"))
        .collect()
}

/// Creates an in-memory repository holding exactly `pairs`.
pub fn memory_repository(pairs: &[(&str, &str)]) -> QuoteRepository<InMemoryStore> {
    let mut repo = QuoteRepository::load(InMemoryStore::new());
    repo.replace_all(quotes(pairs))
        .expect("in-memory replace cannot fail");
    repo
}

/// A data directory that is deleted when dropped.
pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    /// Creates a fresh empty data directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Opens the durable store in this directory.
    ///
    /// Drop the previous store first; the directory is locked while open.
    pub fn open_store(&self) -> Arc<FileStore> {
        Arc::new(FileStore::open(self.dir.path()).expect("Failed to open file store"))
    }

    /// Loads a repository from this directory.
    pub fn open_repository(&self) -> QuoteRepository<Arc<FileStore>> {
        QuoteRepository::load(self.open_store())
    }
}

impl Default for TempDataDir {
    fn default() -> Self {
        Self::new()
    }
}

/// A store that can be switched into a failing mode.
///
/// Reads always succeed; while failing, every write returns an I/O error
/// and leaves the stored values untouched.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    /// Creates an empty store that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected write failure",
            )))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        self.check()?;
        self.inner.put(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        self.check()?;
        self.inner.remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.inner.keys()
    }
}
