use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use thiserror::Error;
use tracing::{debug, warn};

pub const SESSION_ID_KEY: &str = "chat_session_id";
pub const THEME_KEY: &str = "ui_theme";
pub const HIGH_CONTRAST_KEY: &str = "ui_high_contrast";

pub const STORE_FILE_NAME: &str = "storage.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write store file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize store contents: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable string-to-string store. Writes are synchronous and last write wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

type Entries = BTreeMap<String, String>;

fn lock_entries(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    // A poisoned map is still a consistent map; keep serving it.
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock_entries(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock_entries(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock_entries(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock_entries(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        lock_entries(&self.entries).clear();
        Ok(())
    }
}

/// JSON-object file store. Reads are served from the map loaded at open;
/// every mutation re-reads the file and writes it through.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Opens `<data_dir>/storage.json`, creating the directory if needed.
    pub fn open_in(data_dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(data_dir).map_err(|source| StorageError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        Ok(Self::open(data_dir.join(STORE_FILE_NAME)))
    }

    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        debug!(path = %path.display(), keys = entries.len(), "opened key/value store");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Applies one change on top of the current file contents, so writes from
    /// other handles on the same file survive. The cached map only takes the
    /// new contents once they are on disk.
    fn mutate(&self, apply: impl FnOnce(&mut Entries)) -> Result<(), StorageError> {
        let mut entries = lock_entries(&self.entries);
        let mut updated = read_entries(&self.path);
        apply(&mut updated);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

/// A missing file is an empty store; an unreadable or corrupt one is logged
/// and treated as empty.
fn read_entries(path: &Path) -> Entries {
    match fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<Entries>(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), "ignoring corrupt store file: {err}");
                Entries::new()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => Entries::new(),
        Err(err) => {
            warn!(path = %path.display(), "unable to read store file: {err}");
            Entries::new()
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock_entries(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.mutate(Entries::clear)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
