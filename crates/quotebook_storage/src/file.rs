//! File-based key-value store for persistent storage.
//!
//! Layout of a data directory:
//!
//! ```text
//! <data-dir>/
//! ├─ LOCK            # Advisory lock for single-writer
//! ├─ store.json      # JSON object of every key and value
//! └─ store.json.corrupt  # Last unreadable document, set aside on open
//! ```

use crate::error::{StorageError, StorageResult};
use crate::store::KeyValueStore;
use fs2::FileExt;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the file holding the key-value document.
pub const STORE_FILE: &str = "store.json";

/// Name of the advisory lock file.
pub const LOCK_FILE: &str = "LOCK";

/// Name an unreadable `store.json` is moved to before opening empty.
pub const CORRUPT_FILE: &str = "store.json.corrupt";

const STORE_TEMP: &str = "store.json.tmp";

/// A file-based key-value store.
///
/// All entries live in one JSON object file inside a data directory. Data
/// survives process restarts.
///
/// # Durability
///
/// Every `put` and `remove` rewrites the whole document:
/// 1. Write the new document to a temporary file
/// 2. Sync the temporary file to disk
/// 3. Rename it over `store.json`
/// 4. Fsync the directory so the rename is durable
///
/// A reader never observes a half-written document.
///
/// # Thread Safety
///
/// This store is thread-safe. An advisory lock on `LOCK` keeps a second
/// process (or a second `FileStore` in the same process) from writing the
/// same directory.
///
/// # Example
///
/// ```no_run
/// use quotebook_storage::{KeyValueStore, FileStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("quotebook-data")).unwrap();
/// store.put("selectedCategory", "Faith").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - Another holder has the lock (returns `Locked`)
    /// - `store.json` is unreadable and cannot be moved aside (returns
    ///   `Corrupted`)
    ///
    /// A `store.json` that is not a JSON object of strings is renamed to
    /// `store.json.corrupt` and the store opens empty.
    pub fn open(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked {
                path: dir.to_path_buf(),
            });
        }

        let entries = read_document(&dir.join(STORE_FILE))?;
        debug!(dir = %dir.display(), keys = entries.len(), "opened file store");

        Ok(Self {
            dir: dir.to_path_buf(),
            entries: RwLock::new(entries),
            _lock_file: lock_file,
        })
    }

    /// Returns the data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the JSON document.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORE_FILE)
    }

    fn write_document(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let temp_path = self.dir.join(STORE_TEMP);
        let mut file = File::create(&temp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, self.path())?;
        self.sync_directory()?;

        Ok(())
    }

    /// Syncs the data directory so a completed rename survives a crash.
    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        let dir = File::open(&self.dir)?;
        dir.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        // NTFS journals metadata; directory handles cannot be fsynced
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write();
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());

        self.write_document(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut entries = self.entries.write();
        if !entries.contains_key(key) {
            return Ok(false);
        }

        let mut next = entries.clone();
        next.remove(key);

        self.write_document(&next)?;
        *entries = next;
        Ok(true)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

fn read_document(path: &Path) -> StorageResult<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let text = fs::read_to_string(path)?;
    if text.trim().is_empty() {
        warn!(path = %path.display(), "store file is empty, starting fresh");
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str(&text) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            let aside = path.with_file_name(CORRUPT_FILE);
            warn!(
                path = %path.display(),
                moved_to = %aside.display(),
                error = %e,
                "store file is unreadable, starting fresh"
            );
            if aside.exists() {
                fs::remove_file(&aside)?;
            }
            fs::rename(path, &aside).map_err(|rename_err| {
                StorageError::Corrupted(format!(
                    "{}: {e} (could not move aside: {rename_err})",
                    path.display()
                ))
            })?;
            Ok(BTreeMap::new())
        }
    }
}
