//! Remote source abstraction for sync operations.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use quotebook_core::Quote;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Category assigned to every quote taken from the remote.
pub const SERVER_CATEGORY: &str = "Server";

/// One record as returned by the remote endpoint.
///
/// Only `title` is used; everything else the server sends is kept in
/// `extra` and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Becomes the quote text. Missing titles read as empty.
    #[serde(default)]
    pub title: String,
    /// Unused fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RemoteRecord {
    /// Creates a record with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// Maps the record to a quote in the server category.
    ///
    /// Returns `None` if the title is blank.
    pub fn into_quote(self) -> Option<Quote> {
        Quote::new(&self.title, SERVER_CATEGORY).ok()
    }
}

/// Builds the remote snapshot from fetched records, skipping blank titles.
pub fn snapshot_from(records: Vec<RemoteRecord>) -> Vec<Quote> {
    records
        .into_iter()
        .filter_map(RemoteRecord::into_quote)
        .collect()
}

/// A source of remote quote records.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, mock for testing, etc.).
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetches at most `limit` records.
    ///
    /// Zero records is a successful, empty result.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Transport` if the remote cannot be reached or
    /// answers with a non-success status, and `SyncError::Parse` if the
    /// body cannot be decoded.
    async fn fetch_records(&self, limit: usize) -> SyncResult<Vec<RemoteRecord>>;
}

#[async_trait]
impl<T: RemoteSource + ?Sized> RemoteSource for Arc<T> {
    async fn fetch_records(&self, limit: usize) -> SyncResult<Vec<RemoteRecord>> {
        (**self).fetch_records(limit).await
    }
}

/// A mock remote source for testing.
///
/// Serves a fixed set of records, or a transport failure, and counts how
/// many fetches were made.
#[derive(Debug, Default)]
pub struct MockRemoteSource {
    records: Mutex<Vec<RemoteRecord>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    fetches: AtomicUsize,
}

impl MockRemoteSource {
    /// Creates a mock that serves no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that serves one record per title.
    pub fn with_titles(titles: &[&str]) -> Self {
        let mock = Self::new();
        mock.set_titles(titles);
        mock
    }

    /// Sets the records to serve.
    pub fn set_records(&self, records: Vec<RemoteRecord>) {
        *self.records.lock() = records;
    }

    /// Sets the records to serve, one per title.
    pub fn set_titles(&self, titles: &[&str]) {
        self.set_records(titles.iter().copied().map(RemoteRecord::new).collect());
    }

    /// Makes fetches fail with a transport error (`Some`) or succeed (`None`).
    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock() = message.map(String::from);
    }

    /// Makes each fetch wait `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Returns the number of fetches made so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for MockRemoteSource {
    async fn fetch_records(&self, limit: usize) -> SyncResult<Vec<RemoteRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failure.lock().clone() {
            return Err(SyncError::transport(message));
        }

        Ok(self.records.lock().iter().take(limit).cloned().collect())
    }
}
