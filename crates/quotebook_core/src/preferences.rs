//! Persisted UI state that lives outside the repository.

use crate::error::{CoreError, CoreResult};
use crate::quote::{CategoryFilter, Quote};
use quotebook_storage::KeyValueStore;
use tracing::warn;

/// Durable store key for the selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Session store key for the last quote shown.
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

/// Selected filter (durable) and last viewed quote (session-scoped).
///
/// `D` is normally the same durable store the repository writes to, shared
/// through an `Arc`; `V` is a store that ends with the session.
#[derive(Debug)]
pub struct Preferences<D: KeyValueStore, V: KeyValueStore> {
    durable: D,
    session: V,
}

impl<D: KeyValueStore, V: KeyValueStore> Preferences<D, V> {
    /// Creates preferences over the given stores.
    pub fn new(durable: D, session: V) -> Self {
        Self { durable, session }
    }

    /// Returns the persisted filter, or `All` when nothing usable is stored.
    pub fn selected_filter(&self) -> CategoryFilter {
        match self.durable.get(SELECTED_CATEGORY_KEY) {
            Ok(Some(value)) => CategoryFilter::parse(&value),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                warn!(error = %e, "failed to read selected category");
                CategoryFilter::All
            }
        }
    }

    /// Persists `filter` as the selected filter.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn set_selected_filter(&self, filter: &CategoryFilter) -> CoreResult<()> {
        self.durable.put(SELECTED_CATEGORY_KEY, filter.as_str())?;
        Ok(())
    }

    /// Returns the last quote shown this session, if any.
    ///
    /// Unparsable values read back as absent.
    pub fn last_viewed(&self) -> Option<Quote> {
        let value = match self.session.get(LAST_VIEWED_KEY) {
            Ok(value) => value?,
            Err(e) => {
                warn!(error = %e, "failed to read last viewed quote");
                return None;
            }
        };

        match serde_json::from_str(&value) {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!(error = %e, "ignoring unparsable last viewed quote");
                None
            }
        }
    }

    /// Records `quote` as the last quote shown.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn set_last_viewed(&self, quote: &Quote) -> CoreResult<()> {
        let value =
            serde_json::to_string(quote).map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.session.put(LAST_VIEWED_KEY, &value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_storage::InMemoryStore;
    use std::sync::Arc;

    #[test]
    fn selected_filter_defaults_to_all() {
        let prefs = Preferences::new(InMemoryStore::new(), InMemoryStore::new());
        assert_eq!(prefs.selected_filter(), CategoryFilter::All);
    }

    #[test]
    fn selected_filter_round_trip() {
        let durable = Arc::new(InMemoryStore::new());
        let prefs = Preferences::new(Arc::clone(&durable), InMemoryStore::new());

        prefs
            .set_selected_filter(&CategoryFilter::Category("Faith".into()))
            .unwrap();
        assert_eq!(
            durable.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("Faith")
        );
        assert_eq!(
            prefs.selected_filter(),
            CategoryFilter::Category("Faith".into())
        );

        prefs.set_selected_filter(&CategoryFilter::All).unwrap();
        assert_eq!(
            durable.get(SELECTED_CATEGORY_KEY).unwrap().as_deref(),
            Some("all")
        );
    }

    #[test]
    fn last_viewed_round_trip_in_session_store() {
        let durable = Arc::new(InMemoryStore::new());
        let session = Arc::new(InMemoryStore::new());
        let prefs = Preferences::new(Arc::clone(&durable), Arc::clone(&session));

        assert!(prefs.last_viewed().is_none());

        let quote = Quote::new("A", "X").unwrap();
        prefs.set_last_viewed(&quote).unwrap();

        assert_eq!(prefs.last_viewed(), Some(quote));
        assert!(session.contains(LAST_VIEWED_KEY).unwrap());
        assert!(!durable.contains(LAST_VIEWED_KEY).unwrap());
    }

    #[test]
    fn last_viewed_ignores_garbage() {
        let session = InMemoryStore::with_entries([(LAST_VIEWED_KEY, "{oops")]);
        let prefs = Preferences::new(InMemoryStore::new(), session);
        assert!(prefs.last_viewed().is_none());
    }

    #[test]
    fn last_viewed_cleared_with_session() {
        let session = Arc::new(InMemoryStore::new());
        let prefs = Preferences::new(InMemoryStore::new(), Arc::clone(&session));
        prefs
            .set_last_viewed(&Quote::new("A", "X").unwrap())
            .unwrap();

        session.clear();
        assert!(prefs.last_viewed().is_none());
    }
}
