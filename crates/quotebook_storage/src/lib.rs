//! # Quotebook Storage
//!
//! String-keyed key-value stores for Quotebook.
//!
//! Stores are **opaque string maps** - they do not interpret the values
//! they hold. Callers own the encoding of every value (Quotebook stores
//! JSON documents and plain strings).
//!
//! ## Design Principles
//!
//! - A store is a flat map of `String` keys to `String` values
//! - A successful `put` is visible to every later `get`
//! - Durable stores make a write survive process restart before returning
//! - Must be `Send + Sync` so one store can be shared across tasks
//!
//! ## Available Stores
//!
//! - [`InMemoryStore`] - Session-scoped storage, also used in tests
//! - [`FileStore`] - Durable storage in a single JSON file
//!
//! ## Example
//!
//! ```rust
//! use quotebook_storage::{KeyValueStore, InMemoryStore};
//!
//! let store = InMemoryStore::new();
//! store.put("selectedCategory", "Faith").unwrap();
//! assert_eq!(store.get("selectedCategory").unwrap().as_deref(), Some("Faith"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use file::{FileStore, CORRUPT_FILE, LOCK_FILE, STORE_FILE};
pub use memory::InMemoryStore;
pub use store::KeyValueStore;
