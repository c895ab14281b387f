//! The quote widget: the caller surface the front ends drive.
//!
//! A widget owns one shared repository, the persisted preferences, and the
//! sync engine writing to the same repository. Front ends translate user
//! input into [`Action`]s and render the [`Reply`] that
//! [`QuoteWidget::dispatch`] returns.

use quotebook_core::{
    export_json, import_json, transfer, CategoryFilter, CoreResult, Preferences, Quote,
    QuoteRepository, SharedRepository,
};
use quotebook_storage::KeyValueStore;
use quotebook_sync::{RemoteSource, SyncConfig, SyncEngine, SyncOutcome};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// A user request, independent of how it was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show a random quote.
    ShowRandom,
    /// Append a quote.
    AddQuote {
        /// Quote text.
        text: String,
        /// Quote category.
        category: String,
    },
    /// Select a category filter (`all` for every category).
    FilterBy(String),
    /// List quotes under the selected filter.
    List,
    /// List distinct categories.
    Categories,
    /// Export the collection, to a file or as text.
    Export(Option<PathBuf>),
    /// Import quotes from a file.
    Import(PathBuf),
    /// Run a sync now.
    Sync,
    /// Show the latest sync status.
    Status,
    /// Show available commands.
    Help,
    /// End the session.
    Quit,
}

/// Errors from parsing a typed command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseActionError {
    /// The line was blank.
    #[error("empty command")]
    Empty,
    /// The command word is not known.
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    /// A required argument was missing.
    #[error("usage: {0}")]
    Usage(&'static str),
}

impl Action {
    /// Parses one line of interactive input.
    ///
    /// `add` takes the category as its first word and the rest of the line
    /// as text.
    pub fn parse(line: &str) -> Result<Self, ParseActionError> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "" => Err(ParseActionError::Empty),
            "random" | "r" => Ok(Action::ShowRandom),
            "add" => {
                let (category, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ParseActionError::Usage("add <category> <text>"))?;
                Ok(Action::AddQuote {
                    text: text.trim().to_string(),
                    category: category.to_string(),
                })
            }
            "filter" => {
                if rest.is_empty() {
                    Err(ParseActionError::Usage("filter <category|all>"))
                } else {
                    Ok(Action::FilterBy(rest.to_string()))
                }
            }
            "list" | "ls" => Ok(Action::List),
            "categories" => Ok(Action::Categories),
            "export" => Ok(Action::Export(
                (!rest.is_empty()).then(|| PathBuf::from(rest)),
            )),
            "import" => {
                if rest.is_empty() {
                    Err(ParseActionError::Usage("import <file>"))
                } else {
                    Ok(Action::Import(PathBuf::from(rest)))
                }
            }
            "sync" => Ok(Action::Sync),
            "status" => Ok(Action::Status),
            "help" | "?" => Ok(Action::Help),
            "quit" | "exit" | "q" => Ok(Action::Quit),
            other => Err(ParseActionError::Unknown(other.to_string())),
        }
    }
}

/// What an [`Action`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A random quote, or `None` when the collection is empty.
    Quote(Option<Quote>),
    /// The quote as appended.
    Added(Quote),
    /// Quotes under a filter.
    Quotes(Vec<Quote>),
    /// Distinct categories.
    Categories(Vec<String>),
    /// The exported document.
    Exported(String),
    /// The export was written to this file.
    ExportedTo(PathBuf),
    /// Number of quotes imported.
    Imported(usize),
    /// Outcome of a sync.
    Synced(SyncOutcome),
    /// The latest sync status text.
    Status(String),
    /// Command help.
    Help,
    /// The session should end.
    Quit,
}

const HELP: &str = "\
commands:
  random                    show a random quote
  add <category> <text>     add a quote
  filter <category|all>     select a category
  list                      list quotes in the selected category
  categories                list categories
  export [file]             export quotes as JSON
  import <file>             import quotes from a JSON file
  sync                      sync with the server now
  status                    show the last sync status
  quit                      leave the shell";

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Quote(Some(quote)) => write!(f, "{quote}"),
            Reply::Quote(None) => write!(f, "No quotes yet. Add one!"),
            Reply::Added(quote) => write!(f, "Added {quote}"),
            Reply::Quotes(quotes) if quotes.is_empty() => write!(f, "No quotes in this category."),
            Reply::Quotes(quotes) => {
                for (i, quote) in quotes.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{quote}")?;
                }
                Ok(())
            }
            Reply::Categories(categories) => write!(f, "{}", categories.join("\n")),
            Reply::Exported(document) => write!(f, "{document}"),
            Reply::ExportedTo(path) => write!(f, "Exported to {}", path.display()),
            Reply::Imported(count) => write!(f, "Quotes imported successfully! ({count})"),
            Reply::Synced(SyncOutcome::Skipped) => write!(f, "A sync is already running."),
            Reply::Synced(outcome) => {
                write!(f, "{}", outcome.status_text().unwrap_or_default())
            }
            Reply::Status(text) if text.is_empty() => write!(f, "Not synced yet."),
            Reply::Status(text) => write!(f, "{text}"),
            Reply::Help => write!(f, "{HELP}"),
            Reply::Quit => Ok(()),
        }
    }
}

/// Front-end facade over the repository, preferences, and sync engine.
///
/// `S` is the durable store, cloned between the repository and the
/// preferences (normally an `Arc`). `V` is the session store.
pub struct QuoteWidget<S, V, R>
where
    S: KeyValueStore + Clone,
    V: KeyValueStore,
    R: RemoteSource,
{
    repository: SharedRepository<S>,
    preferences: Preferences<S, V>,
    engine: Arc<SyncEngine<R, S>>,
    filter: CategoryFilter,
}

impl<S, V, R> QuoteWidget<S, V, R>
where
    S: KeyValueStore + Clone,
    V: KeyValueStore,
    R: RemoteSource,
{
    /// Loads the repository and preferences and wires up the sync engine.
    pub fn open(store: S, session: V, remote: R, config: SyncConfig) -> Self {
        let repository = QuoteRepository::load(store.clone()).into_shared();
        let preferences = Preferences::new(store, session);
        let filter = preferences.selected_filter();
        let engine = Arc::new(SyncEngine::new(config, remote, Arc::clone(&repository)));

        Self {
            repository,
            preferences,
            engine,
            filter,
        }
    }

    /// Returns the sync engine, for scheduling.
    pub fn engine(&self) -> &Arc<SyncEngine<R, S>> {
        &self.engine
    }

    /// Returns the selected filter.
    pub fn selected_filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Returns the last quote shown this session.
    pub fn last_viewed(&self) -> Option<Quote> {
        self.preferences.last_viewed()
    }

    /// Picks a random quote from the whole collection and records it as
    /// last viewed.
    pub fn show_random(&self) -> Option<Quote> {
        let quote = self
            .repository
            .lock()
            .random_quote(&mut rand::thread_rng())
            .cloned()?;

        if let Err(e) = self.preferences.set_last_viewed(&quote) {
            warn!(error = %e, "failed to record last viewed quote");
        }
        Some(quote)
    }

    /// Appends a quote.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank fields, or a storage error.
    pub fn add_quote(&self, text: &str, category: &str) -> CoreResult<Quote> {
        let quote = Quote::new(text, category)?;
        self.repository.lock().append(quote)
    }

    /// Selects and persists a category filter, returning its quotes.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the filter cannot be persisted.
    pub fn filter_by(&mut self, category: &str) -> CoreResult<Vec<Quote>> {
        let filter = CategoryFilter::parse(category);
        self.preferences.set_selected_filter(&filter)?;
        self.filter = filter;
        Ok(self.list())
    }

    /// Lists quotes under the selected filter.
    pub fn list(&self) -> Vec<Quote> {
        self.repository.lock().by_category(&self.filter)
    }

    /// Lists quotes under `filter` without changing the selection.
    pub fn list_in(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.repository.lock().by_category(filter)
    }

    /// Returns distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        self.repository.lock().categories()
    }

    /// Exports the collection as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn export_json(&self) -> CoreResult<String> {
        export_json(&*self.repository.lock())
    }

    /// Writes the export document to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the write fails.
    pub fn export_to_file(&self, path: &Path) -> CoreResult<()> {
        transfer::export_to_file(&*self.repository.lock(), path)
    }

    /// Merges a JSON document into the collection.
    ///
    /// # Errors
    ///
    /// Returns a format error if the document is rejected.
    pub fn import_json(&self, document: &str) -> CoreResult<usize> {
        import_json(&mut *self.repository.lock(), document)
    }

    /// Merges the quotes in the file at `path` into the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is rejected.
    pub fn import_from_file(&self, path: &Path) -> CoreResult<usize> {
        transfer::import_from_file(&mut *self.repository.lock(), path)
    }

    /// Runs a sync now; returns `Skipped` if one is already running.
    pub async fn trigger_sync(&self) -> SyncOutcome {
        self.engine.sync().await
    }

    /// Returns the latest sync status text.
    pub fn status(&self) -> String {
        self.engine.status()
    }

    /// Runs one action.
    ///
    /// # Errors
    ///
    /// Returns the core error of the underlying operation. Sync failures
    /// are not errors; they come back as `Reply::Synced`.
    pub async fn dispatch(&mut self, action: Action) -> CoreResult<Reply> {
        let reply = match action {
            Action::ShowRandom => Reply::Quote(self.show_random()),
            Action::AddQuote { text, category } => Reply::Added(self.add_quote(&text, &category)?),
            Action::FilterBy(category) => Reply::Quotes(self.filter_by(&category)?),
            Action::List => Reply::Quotes(self.list()),
            Action::Categories => Reply::Categories(self.categories()),
            Action::Export(None) => Reply::Exported(self.export_json()?),
            Action::Export(Some(path)) => {
                self.export_to_file(&path)?;
                Reply::ExportedTo(path)
            }
            Action::Import(path) => Reply::Imported(self.import_from_file(&path)?),
            Action::Sync => Reply::Synced(self.trigger_sync().await),
            Action::Status => Reply::Status(self.status()),
            Action::Help => Reply::Help,
            Action::Quit => Reply::Quit,
        };
        Ok(reply)
    }
}
