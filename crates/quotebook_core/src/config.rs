//! Core configuration.

use crate::error::CoreResult;
use crate::transfer::EXPORT_FILE_NAME;
use directories::ProjectDirs;
use quotebook_storage::FileStore;
use std::path::{Path, PathBuf};

const FALLBACK_DATA_DIR: &str = ".quotebook";

/// Configuration for opening Quotebook state.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory holding the durable store.
    pub data_dir: PathBuf,

    /// File name used by export when no path is given.
    pub export_file_name: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            export_file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data directory.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the default export file name.
    #[must_use]
    pub fn export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    /// Returns the export path used when none is given.
    #[must_use]
    pub fn default_export_path(&self) -> PathBuf {
        PathBuf::from(&self.export_file_name)
    }

    /// Opens the durable store in the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, is locked, or
    /// holds a corrupted store file.
    pub fn open_store(&self) -> CoreResult<FileStore> {
        Ok(FileStore::open(&self.data_dir)?)
    }
}

/// Returns the platform data directory for Quotebook.
///
/// Falls back to `.quotebook` in the working directory when the platform
/// gives no home directory.
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "quotebook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| Path::new(FALLBACK_DATA_DIR).to_path_buf())
}
