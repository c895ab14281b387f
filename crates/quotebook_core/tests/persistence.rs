//! Write-through persistence against real and failing stores.

use quotebook_core::{
    default_quotes, import_json, CategoryFilter, CoreConfig, CoreError, Preferences, Quote,
    QuoteRepository, QUOTES_KEY,
};
use quotebook_storage::{InMemoryStore, KeyValueStore, CORRUPT_FILE, STORE_FILE};
use std::fs;
use quotebook_testkit::prelude::*;
use std::sync::Arc;

#[test]
fn mutations_survive_restart() {
    let data = TempDataDir::new();

    {
        let mut repo = data.open_repository();
        assert_eq!(repo.quotes(), default_quotes().as_slice());
        repo.append(Quote::new("Ship it.", "Work").unwrap()).unwrap();
    }

    let repo = data.open_repository();
    assert_eq!(repo.len(), default_quotes().len() + 1);
    assert_eq!(
        repo.quotes().last(),
        Some(&Quote::new("Ship it.", "Work").unwrap())
    );
}

#[test]
fn corrupt_stored_quotes_fall_back_to_defaults() {
    let data = TempDataDir::new();
    {
        let store = data.open_store();
        store.put(QUOTES_KEY, "{\"broken\":").unwrap();
    }

    let repo = data.open_repository();
    assert_eq!(repo.quotes(), default_quotes().as_slice());
}

#[test]
fn imported_blank_entries_survive_restart() {
    let data = TempDataDir::new();
    let expected = {
        let mut repo = data.open_repository();
        repo.append(Quote::new("Mine", "Personal").unwrap()).unwrap();
        let count = import_json(&mut repo, r#"[{"text":"","category":"X"}]"#).unwrap();
        assert_eq!(count, 1);
        assert_eq!(repo.len(), default_quotes().len() + 2);
        repo.quotes().to_vec()
    };

    let repo = data.open_repository();
    assert_eq!(repo.quotes(), expected.as_slice());
    assert!(repo.quotes().contains(&Quote::new("Mine", "Personal").unwrap()));
}

#[test]
fn unreadable_store_file_opens_with_defaults() {
    let data = TempDataDir::new();
    fs::write(data.path().join(STORE_FILE), r#"{"quotes": ["#).unwrap();

    let config = CoreConfig::new().data_dir(data.path());
    let store = config.open_store().unwrap();
    let mut repo = QuoteRepository::load(store);

    assert_eq!(repo.quotes(), default_quotes().as_slice());
    assert!(data.path().join(CORRUPT_FILE).exists());

    repo.append(Quote::new("Fresh start", "Recovery").unwrap())
        .unwrap();
    drop(repo);

    let repo = data.open_repository();
    assert_eq!(repo.len(), default_quotes().len() + 1);
}

#[test]
fn selected_filter_survives_restart_but_last_viewed_does_not() {
    let data = TempDataDir::new();
    let quote = Quote::new("A", "X").unwrap();

    {
        let prefs = Preferences::new(data.open_store(), InMemoryStore::new());
        prefs
            .set_selected_filter(&CategoryFilter::Category("X".into()))
            .unwrap();
        prefs.set_last_viewed(&quote).unwrap();
        assert_eq!(prefs.last_viewed(), Some(quote));
    }

    let prefs = Preferences::new(data.open_store(), InMemoryStore::new());
    assert_eq!(
        prefs.selected_filter(),
        CategoryFilter::Category("X".into())
    );
    assert!(prefs.last_viewed().is_none());
}

#[test]
fn repository_and_preferences_share_one_store() {
    let data = TempDataDir::new();
    let store = data.open_store();

    let mut repo = QuoteRepository::load(Arc::clone(&store));
    let prefs = Preferences::new(Arc::clone(&store), InMemoryStore::new());

    repo.replace_all(quotes(&[("A", "X")])).unwrap();
    prefs.set_selected_filter(&CategoryFilter::All).unwrap();

    assert_eq!(store.keys().unwrap(), vec!["quotes", "selectedCategory"]);
}

#[test]
fn failed_write_leaves_collection_unchanged() {
    let store = Arc::new(FlakyStore::new());
    let mut repo = QuoteRepository::load(Arc::clone(&store));
    repo.replace_all(quotes(&[("A", "X")])).unwrap();

    store.set_failing(true);

    let err = repo.append(Quote::new("B", "Y").unwrap()).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert!(repo.replace_all(quotes(&[("C", "Z")])).is_err());
    assert!(repo.merge_append(quotes(&[("D", "W")])).is_err());

    assert_eq!(repo.quotes(), quotes(&[("A", "X")]).as_slice());

    store.set_failing(false);
    let reloaded = QuoteRepository::load(Arc::clone(&store));
    assert_eq!(reloaded.quotes(), quotes(&[("A", "X")]).as_slice());
}
