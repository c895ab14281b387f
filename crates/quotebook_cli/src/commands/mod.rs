//! CLI command implementations.

pub mod quotes;
pub mod shell;
pub mod sync;
pub mod transfer;

use crate::widget::QuoteWidget;
use quotebook_core::CoreConfig;
use quotebook_storage::{FileStore, InMemoryStore};
use quotebook_sync::{HttpRemoteSource, ReqwestClient, SyncConfig};
use std::error::Error;
use std::sync::Arc;

/// The widget as the binary runs it: file-backed, with an HTTP remote.
pub type CliWidget = QuoteWidget<Arc<FileStore>, InMemoryStore, HttpRemoteSource<ReqwestClient>>;

/// Opens the data directory and builds the widget.
///
/// The session store lives for this process only.
pub fn open_widget(core: &CoreConfig, sync: SyncConfig) -> Result<CliWidget, Box<dyn Error>> {
    let store = Arc::new(core.open_store()?);
    let remote = HttpRemoteSource::from_config(&sync)?;
    Ok(QuoteWidget::open(store, InMemoryStore::new(), remote, sync))
}
