//! Quote repository with write-through persistence.

use crate::error::{CoreError, CoreResult};
use crate::quote::{default_quotes, CategoryFilter, Quote};
use crate::transfer::parse_document;
use parking_lot::Mutex;
use quotebook_storage::KeyValueStore;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Durable store key holding the JSON-encoded collection.
pub const QUOTES_KEY: &str = "quotes";

/// Repository handle shared between the front end and the sync engine.
///
/// Never hold the lock across an `.await`.
pub type SharedRepository<S> = Arc<Mutex<QuoteRepository<S>>>;

/// The in-memory quote collection, mirrored to a durable store.
///
/// The repository is the single source of truth for reads during a session.
/// Every mutation writes the full collection to the store before it
/// returns; if that write fails the in-memory collection is left as it was.
///
/// # Example
///
/// ```rust
/// use quotebook_core::{CategoryFilter, Quote, QuoteRepository};
/// use quotebook_storage::InMemoryStore;
///
/// let mut repo = QuoteRepository::load(InMemoryStore::new());
/// repo.append(Quote::new("Less is more.", "Design").unwrap()).unwrap();
/// let design = repo.by_category(&CategoryFilter::parse("Design"));
/// assert_eq!(design.len(), 1);
/// ```
#[derive(Debug)]
pub struct QuoteRepository<S: KeyValueStore> {
    store: S,
    quotes: Vec<Quote>,
}

impl<S: KeyValueStore> QuoteRepository<S> {
    /// Loads the collection from `store`.
    ///
    /// Accepts any document the import path accepts, blank fields
    /// included, so whatever a mutation persisted reads back unchanged.
    /// Falls back to [`default_quotes`] when the stored value is absent,
    /// unreadable, or malformed. The fallback is not written back; the
    /// first mutation persists it.
    pub fn load(store: S) -> Self {
        let quotes = match store.get(QUOTES_KEY) {
            Ok(Some(document)) => match parse_document(&document) {
                Ok(quotes) => {
                    debug!(count = quotes.len(), "loaded stored quotes");
                    quotes
                }
                Err(e) => {
                    warn!(error = %e, "stored quotes are unusable, using defaults");
                    default_quotes()
                }
            },
            Ok(None) => {
                info!("no stored quotes, using defaults");
                default_quotes()
            }
            Err(e) => {
                warn!(error = %e, "failed to read stored quotes, using defaults");
                default_quotes()
            }
        };

        Self { store, quotes }
    }

    /// Creates a repository shared behind a mutex.
    pub fn into_shared(self) -> SharedRepository<S> {
        Arc::new(Mutex::new(self))
    }

    /// Returns the collection in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Returns the number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends one quote after trimming both fields.
    ///
    /// Returns the quote as stored.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if either field is blank, or a
    /// storage error if persisting fails. The collection is unchanged in
    /// both cases.
    pub fn append(&mut self, quote: Quote) -> CoreResult<Quote> {
        let quote = Quote::new(&quote.text, &quote.category)?;

        let mut next = self.quotes.clone();
        next.push(quote.clone());
        self.commit(next)?;

        debug!(category = %quote.category, total = self.quotes.len(), "appended quote");
        Ok(quote)
    }

    /// Replaces the whole collection.
    ///
    /// No validation is applied beyond the type's shape; this is the path
    /// used when a remote snapshot wins.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails; the previous collection
    /// stays in place.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> CoreResult<()> {
        let count = quotes.len();
        self.commit(quotes)?;
        info!(count, "replaced quote collection");
        Ok(())
    }

    /// Replaces the whole collection from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Format` if the document is not an array of
    /// `{text, category}` objects. Malformed documents are rejected whole.
    pub fn replace_all_json(&mut self, document: &str) -> CoreResult<()> {
        let quotes = parse_document(document)?;
        self.replace_all(quotes)
    }

    /// Appends every quote in order. Duplicates are kept.
    ///
    /// # Errors
    ///
    /// Returns a storage error if persisting fails; nothing is appended.
    pub fn merge_append(&mut self, quotes: Vec<Quote>) -> CoreResult<()> {
        if quotes.is_empty() {
            return Ok(());
        }

        let mut next = self.quotes.clone();
        next.extend(quotes);
        self.commit(next)
    }

    /// Returns the quotes that pass `filter`, in insertion order.
    pub fn by_category(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    /// Returns distinct category names in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.quotes
            .iter()
            .filter(|q| seen.insert(q.category.as_str()))
            .map(|q| q.category.clone())
            .collect()
    }

    /// Picks a quote uniformly at random from the whole collection.
    pub fn random_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Quote> {
        self.quotes.choose(rng)
    }

    fn commit(&mut self, next: Vec<Quote>) -> CoreResult<()> {
        let document =
            serde_json::to_string(&next).map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.store.put(QUOTES_KEY, &document)?;
        self.quotes = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_storage::InMemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    fn stored_quotes(repo: &QuoteRepository<InMemoryStore>) -> Vec<Quote> {
        let document = repo.store().get(QUOTES_KEY).unwrap().unwrap();
        serde_json::from_str(&document).unwrap()
    }

    #[test]
    fn load_empty_store_uses_defaults_without_writing() {
        let repo = QuoteRepository::load(InMemoryStore::new());
        assert_eq!(repo.quotes(), default_quotes().as_slice());
        assert!(!repo.store().contains(QUOTES_KEY).unwrap());
    }

    #[test]
    fn load_reads_stored_collection() {
        let store =
            InMemoryStore::with_entries([(QUOTES_KEY, r#"[{"text":"A","category":"X"}]"#)]);
        let repo = QuoteRepository::load(store);
        assert_eq!(repo.quotes(), &[quote("A", "X")]);
    }

    #[test]
    fn load_keeps_stored_empty_collection() {
        let store = InMemoryStore::with_entries([(QUOTES_KEY, "[]")]);
        let repo = QuoteRepository::load(store);
        assert!(repo.is_empty());
    }

    #[test]
    fn load_keeps_blank_entries_it_wrote() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        repo.replace_all_json(r#"[{"text":"A","category":"X"},{"text":"","category":"Y"}]"#)
            .unwrap();

        let reloaded = QuoteRepository::load(InMemoryStore::with_entries(repo.store().snapshot()));
        assert_eq!(reloaded.quotes(), repo.quotes());
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn load_falls_back_on_corrupt_value() {
        let corrupt_values = [
            "not json",
            r#"{"text":"A"}"#,
            r#"[{"text":"A"}]"#,
        ];
        for corrupt in corrupt_values {
            let store = InMemoryStore::with_entries([(QUOTES_KEY, corrupt)]);
            let repo = QuoteRepository::load(store);
            assert_eq!(repo.quotes(), default_quotes().as_slice(), "input: {corrupt}");
        }
    }

    #[test]
    fn append_persists_trimmed_quote() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        let before = repo.len();

        let added = repo
            .append(Quote {
                text: "  Keep going. ".into(),
                category: " Motivation".into(),
            })
            .unwrap();

        assert_eq!(added, quote("Keep going.", "Motivation"));
        assert_eq!(repo.len(), before + 1);
        assert_eq!(repo.quotes().last(), Some(&added));
        assert_eq!(stored_quotes(&repo), repo.quotes());
    }

    #[test]
    fn append_rejects_blank_fields_without_mutation() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        let before = repo.quotes().to_vec();

        let err = repo
            .append(Quote {
                text: String::new(),
                category: "X".into(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "text" }));

        let err = repo
            .append(Quote {
                text: "X".into(),
                category: "  ".into(),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { field: "category" }));

        assert_eq!(repo.quotes(), before.as_slice());
        assert!(!repo.store().contains(QUOTES_KEY).unwrap());
    }

    #[test]
    fn replace_all_discards_previous_collection() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        repo.replace_all(vec![quote("B", "Server")]).unwrap();

        assert_eq!(repo.quotes(), &[quote("B", "Server")]);
        assert_eq!(stored_quotes(&repo), repo.quotes());
    }

    #[test]
    fn replace_all_json_rejects_malformed_entries_wholesale() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        let before = repo.quotes().to_vec();

        let err = repo
            .replace_all_json(r#"[{"text":"A","category":"X"},{"category":"Y"}]"#)
            .unwrap_err();
        assert!(matches!(err, CoreError::Format { .. }));
        assert_eq!(repo.quotes(), before.as_slice());

        repo.replace_all_json(r#"[{"text":"A","category":"X"}]"#)
            .unwrap();
        assert_eq!(repo.quotes(), &[quote("A", "X")]);
    }

    #[test]
    fn merge_append_keeps_duplicates() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        repo.replace_all(vec![quote("A", "X")]).unwrap();
        repo.merge_append(vec![quote("A", "X"), quote("B", "Y")])
            .unwrap();

        assert_eq!(
            repo.quotes(),
            &[quote("A", "X"), quote("A", "X"), quote("B", "Y")]
        );
        assert_eq!(stored_quotes(&repo).len(), 3);
    }

    #[test]
    fn by_category_filters_exactly() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        repo.replace_all(vec![quote("A", "X"), quote("B", "Y"), quote("C", "X")])
            .unwrap();

        let xs = repo.by_category(&CategoryFilter::Category("X".into()));
        assert_eq!(xs, vec![quote("A", "X"), quote("C", "X")]);

        assert!(repo
            .by_category(&CategoryFilter::Category("Z".into()))
            .is_empty());
        assert_eq!(repo.by_category(&CategoryFilter::All).len(), 3);
    }

    #[test]
    fn categories_in_first_seen_order() {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        repo.replace_all(vec![
            quote("A", "Y"),
            quote("B", "X"),
            quote("C", "Y"),
            quote("D", "Z"),
        ])
        .unwrap();

        assert_eq!(repo.categories(), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn random_quote_is_member_or_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut repo = QuoteRepository::load(InMemoryStore::new());

        for _ in 0..20 {
            let picked = repo.random_quote(&mut rng).unwrap();
            assert!(repo.quotes().contains(picked));
        }

        repo.replace_all(Vec::new()).unwrap();
        assert!(repo.random_quote(&mut rng).is_none());
    }

    #[test]
    fn shared_repository_sees_mutations() {
        let shared = QuoteRepository::load(InMemoryStore::new()).into_shared();
        let other = Arc::clone(&shared);

        other.lock().replace_all(vec![quote("A", "X")]).unwrap();
        assert_eq!(shared.lock().len(), 1);
    }
}
