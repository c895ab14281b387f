//! JSON export and import of the quote collection.
//!
//! The document format is a JSON array of `{"text", "category"}` objects,
//! pretty-printed on export. Import merges into the current collection; it
//! never replaces it, so importing an export of the same collection doubles
//! every quote.

use crate::error::{CoreError, CoreResult};
use crate::quote::Quote;
use crate::repository::QuoteRepository;
use quotebook_storage::KeyValueStore;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// Default file name for exported collections.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Parses a quote document.
///
/// The top level must be an array and every element must decode as an
/// object with string `text` and `category` fields. Extra fields are
/// ignored. Both fields are trimmed, so imported categories compare equal
/// to the names a [`CategoryFilter`](crate::CategoryFilter) parses. Blank
/// fields are accepted; callers that need the non-blank invariant check
/// [`Quote::is_valid`] themselves.
///
/// # Errors
///
/// Returns `CoreError::Format` for invalid JSON, a non-array top level, or
/// any element of the wrong shape. A single bad element rejects the whole
/// document.
pub fn parse_document(document: &str) -> CoreResult<Vec<Quote>> {
    let value: Value = serde_json::from_str(document)
        .map_err(|e| CoreError::format(format!("not valid JSON: {e}")))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(CoreError::format(format!(
                "expected a JSON array of quotes, found {}",
                kind_of(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Quote>(item)
                .map(trim_fields)
                .map_err(|e| CoreError::format(format!("entry {index}: {e}")))
        })
        .collect()
}

/// Serializes the whole collection as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns `CoreError::Serialization` if encoding fails.
pub fn export_json<S: KeyValueStore>(repo: &QuoteRepository<S>) -> CoreResult<String> {
    serde_json::to_string_pretty(repo.quotes())
        .map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Parses `document` and appends its quotes to the collection.
///
/// Returns the number of quotes appended.
///
/// # Errors
///
/// Returns `CoreError::Format` if the document is malformed (the collection
/// is left unchanged) or a storage error if persisting fails.
pub fn import_json<S: KeyValueStore>(
    repo: &mut QuoteRepository<S>,
    document: &str,
) -> CoreResult<usize> {
    let quotes = parse_document(document)?;
    let count = quotes.len();
    repo.merge_append(quotes)?;
    info!(count, total = repo.len(), "imported quotes");
    Ok(count)
}

/// Writes [`export_json`] output to `path`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn export_to_file<S: KeyValueStore>(repo: &QuoteRepository<S>, path: &Path) -> CoreResult<()> {
    let document = export_json(repo)?;
    fs::write(path, document)?;
    info!(path = %path.display(), count = repo.len(), "exported quotes");
    Ok(())
}

/// Reads `path` and imports it with [`import_json`].
///
/// # Errors
///
/// Returns an error if the file cannot be read, is malformed, or
/// persisting fails.
pub fn import_from_file<S: KeyValueStore>(
    repo: &mut QuoteRepository<S>,
    path: &Path,
) -> CoreResult<usize> {
    let document = fs::read_to_string(path)?;
    import_json(repo, &document)
}

fn trim_fields(quote: Quote) -> Quote {
    Quote {
        text: quote.text.trim().to_string(),
        category: quote.category.trim().to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::CategoryFilter;
    use quotebook_storage::InMemoryStore;

    fn repo_with(quotes: &[(&str, &str)]) -> QuoteRepository<InMemoryStore> {
        let mut repo = QuoteRepository::load(InMemoryStore::new());
        repo.replace_all(
            quotes
                .iter()
                .map(|(t, c)| Quote::new(t, c).unwrap())
                .collect(),
        )
        .unwrap();
        repo
    }

    #[test]
    fn export_is_pretty_array_with_stable_field_order() {
        let repo = repo_with(&[("A", "X")]);
        let document = export_json(&repo).unwrap();

        assert!(document.starts_with('['));
        assert!(document.contains('\n'));
        let text_at = document.find("\"text\"").unwrap();
        let category_at = document.find("\"category\"").unwrap();
        assert!(text_at < category_at);
    }

    #[test]
    fn import_merges_after_existing() {
        let mut repo = repo_with(&[("A", "X")]);
        let count = import_json(
            &mut repo,
            r#"[{"text":"B","category":"Y"},{"text":"C","category":"Z"}]"#,
        )
        .unwrap();

        assert_eq!(count, 2);
        let texts: Vec<&str> = repo.quotes().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[test]
    fn import_rejects_non_array() {
        let mut repo = repo_with(&[("A", "X")]);
        let err = import_json(&mut repo, r#"{"text":"B","category":"Y"}"#).unwrap_err();

        assert!(matches!(err, CoreError::Format { .. }));
        assert!(err.to_string().contains("an object"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn import_rejects_invalid_json() {
        let mut repo = repo_with(&[("A", "X")]);
        let err = import_json(&mut repo, "[{").unwrap_err();
        assert!(matches!(err, CoreError::Format { .. }));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn import_rejects_whole_document_on_bad_entry() {
        let mut repo = repo_with(&[("A", "X")]);
        let err = import_json(
            &mut repo,
            r#"[{"text":"B","category":"Y"},{"title":"no text"}]"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("entry 1"));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn import_ignores_extra_fields_and_accepts_blank_values() {
        let mut repo = repo_with(&[]);
        import_json(
            &mut repo,
            r#"[{"text":"B","category":"Y","author":"anon"},{"text":"","category":""}]"#,
        )
        .unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn import_trims_fields_so_categories_are_selectable() {
        let mut repo = repo_with(&[]);
        import_json(
            &mut repo,
            r#"[{"text":"  B ","category":" Y "},{"text":" ","category":"  "}]"#,
        )
        .unwrap();

        assert_eq!(repo.quotes()[0], Quote::new("B", "Y").unwrap());
        assert_eq!(repo.quotes()[1].category, "");
        assert_eq!(repo.categories(), vec!["Y", ""]);

        let selected = repo.by_category(&CategoryFilter::parse(" Y "));
        assert_eq!(selected, vec![Quote::new("B", "Y").unwrap()]);
    }

    #[test]
    fn import_of_empty_array_is_a_no_op_merge() {
        let mut repo = repo_with(&[("A", "X")]);
        assert_eq!(import_json(&mut repo, "[]").unwrap(), 0);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn export_then_import_doubles_collection() {
        let mut repo = repo_with(&[("A", "X"), ("B", "Y")]);
        let document = export_json(&repo).unwrap();
        import_json(&mut repo, &document).unwrap();

        let texts: Vec<&str> = repo.quotes().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);

        let source = repo_with(&[("A", "X")]);
        export_to_file(&source, &path).unwrap();

        let mut target = repo_with(&[]);
        assert_eq!(import_from_file(&mut target, &path).unwrap(), 1);
        assert_eq!(target.quotes(), source.quotes());
    }

    #[test]
    fn import_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = repo_with(&[]);
        let err = import_from_file(&mut repo, &dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
