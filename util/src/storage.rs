//! Client-local key/value storage.
//!
//! The native counterpart of the browser's `localStorage`: string keys mapped to
//! string values, read synchronously. `FileStorage` persists the map as one JSON
//! document so it survives restarts; `MemoryStorage` is the in-process store used
//! by tests and short-lived tools.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

use crate::paths::ensure_parent_dir;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A string key/value store shared by every component of the client.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to whichever store the application was wired with.
pub type SharedStorage = Arc<dyn LocalStorage>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStorage {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        lock(&self.items).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.items).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.items).remove(key);
        Ok(())
    }
}

/// JSON-file backed store.
///
/// The whole map is kept in memory and rewritten on every mutation through a
/// temporary file and a rename, so a crash never leaves a half-written document.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// A missing or empty file is an empty store. A corrupt document is moved
    /// aside to `<name>.corrupt` and the store starts empty; only an unreadable
    /// file is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(e) => {
                    let aside = corrupt_path(&path);
                    tracing::warn!(
                        path = %path.display(),
                        moved_to = %aside.display(),
                        error = %e,
                        "local storage document is corrupt; starting empty"
                    );
                    fs::rename(&path, &aside)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = items.len(), "opened local storage");
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        ensure_parent_dir(&self.path)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    path.with_file_name(name)
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = lock(&self.items);
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = lock(&self.items);
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_storage_roundtrip_and_remove_missing() {
        let store = MemoryStorage::new();
        store.set_item("token", "abc").unwrap();
        assert_eq!(store.get_item("token").as_deref(), Some("abc"));

        store.remove_item("token").unwrap();
        store.remove_item("token").unwrap();
        assert!(store.get_item("token").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("state").join("local_storage.json");

        {
            let store = FileStorage::open(&path).unwrap();
            store.set_item("vividstream_user", r#"{"id":"1"}"#).unwrap();
            store.set_item("token", "jwt").unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("token").as_deref(), Some("jwt"));
        assert_eq!(
            reopened.get_item("vividstream_user").as_deref(),
            Some(r#"{"id":"1"}"#)
        );

        reopened.remove_item("token").unwrap();
        let again = FileStorage::open(&path).unwrap();
        assert!(again.get_item("token").is_none());
    }

    #[test]
    fn corrupt_document_is_set_aside_and_store_starts_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("local_storage.json");
        fs::write(&path, r#"{"token": "abc""#).unwrap();

        let store = FileStorage::open(&path).unwrap();
        assert!(store.get_item("token").is_none());
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join("local_storage.json.corrupt")).unwrap(),
            r#"{"token": "abc""#
        );

        store.set_item("token", "fresh").unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("token").as_deref(), Some("fresh"));
    }

    #[test]
    fn empty_file_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("local_storage.json");
        fs::write(&path, "").unwrap();

        let store = FileStorage::open(&path).unwrap();
        assert!(store.get_item("anything").is_none());
    }
}
