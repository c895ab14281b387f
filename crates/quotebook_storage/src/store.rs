//! Key-value store trait definition.

use crate::error::StorageResult;

/// A string-keyed store for Quotebook state.
///
/// Stores are **opaque string maps**. Quotebook decides what each key means
/// and how its value is encoded; stores only keep the bytes safe.
///
/// # Invariants
///
/// - `get` returns exactly the value of the last successful `put` for a key
/// - `put` on a durable store returns only after the write is on disk
/// - A failed `put` or `remove` leaves the previous value visible
/// - Stores must be `Send + Sync` for shared access
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - Session-scoped storage
/// - [`super::FileStore`] - Durable storage
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable. The previous
    /// value stays visible in that case.
    fn put(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Returns `true` if a value was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be made durable.
    fn remove(&self, key: &str) -> StorageResult<bool>;

    /// Returns all keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be read.
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Returns `true` if a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot be read.
    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        (**self).remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }
}
