//! # Quotebook Core
//!
//! Local state for Quotebook.
//!
//! This crate provides:
//! - The [`Quote`] record and the built-in default collection
//! - [`QuoteRepository`], the in-memory collection with write-through
//!   persistence to a durable [`KeyValueStore`](quotebook_storage::KeyValueStore)
//! - [`Preferences`] for the selected category filter and the last viewed quote
//! - JSON export and import of the collection ([`transfer`])
//!
//! ## Key Invariants
//!
//! - Every mutation is durable before it returns
//! - A failed mutation leaves the in-memory collection unchanged
//! - Quotes have no identity; duplicates are allowed
//! - Import merges, it never replaces

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod preferences;
mod quote;
mod repository;
pub mod transfer;

pub use config::{default_data_dir, CoreConfig};
pub use error::{CoreError, CoreResult};
pub use preferences::{Preferences, LAST_VIEWED_KEY, SELECTED_CATEGORY_KEY};
pub use quote::{default_quotes, CategoryFilter, Quote, ALL_CATEGORIES};
pub use repository::{QuoteRepository, SharedRepository, QUOTES_KEY};
pub use transfer::{export_json, import_json, EXPORT_FILE_NAME};

/// Crate version, reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
