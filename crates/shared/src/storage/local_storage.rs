use directories::ProjectDirs;
use log::{debug, error};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const STORAGE_FILENAME: &str = "local_storage.json";

pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize storage: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn get_default_storage_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "ledger", "client").map(|dirs| dirs.data_local_dir().to_path_buf())
}

/// String key/value store persisted as one JSON file, the desktop stand-in
/// for browser `localStorage`.
#[derive(Debug)]
pub struct LocalStorage {
    dir: Option<PathBuf>,
    items: Mutex<HashMap<String, String>>,
}

impl LocalStorage {
    /// Opens the store in `storage_dir`, or the platform data directory when
    /// `None`. Nothing touches disk when `disable_storing` is set.
    pub fn new(storage_dir: Option<String>, disable_storing: bool) -> Self {
        if disable_storing {
            return Self::in_memory();
        }

        let dir = storage_dir
            .map(PathBuf::from)
            .or_else(get_default_storage_dir);
        debug!("Local storage dir: {dir:?}");

        let items = dir
            .as_deref()
            .map(Self::load_items)
            .unwrap_or_default();

        Self {
            dir,
            items: Mutex::new(items),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            dir: None,
            items: Mutex::new(HashMap::new()),
        }
    }

    fn load_items(dir: &Path) -> HashMap<String, String> {
        let path = dir.join(STORAGE_FILENAME);
        if !path.exists() {
            debug!("No storage file at {path:?}, starting empty");
            return HashMap::new();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(items) => items,
                Err(e) => {
                    error!("Ignoring unreadable storage file {path:?}: {e}");
                    HashMap::new()
                }
            },
            Err(e) => {
                error!("Failed to read storage file {path:?}: {e}");
                HashMap::new()
            }
        }
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };

        fs::create_dir_all(dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(STORAGE_FILENAME);
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&path, json).map_err(|source| StorageError::Io { path, source })?;
        debug!("Saved local storage to {dir:?}");
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items();
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open(dir: &Path) -> LocalStorage {
        LocalStorage::new(Some(dir.to_string_lossy().into_owned()), false)
    }

    #[test]
    fn test_items_survive_reopen() {
        let dir = tempdir().unwrap();
        let storage = open(dir.path());
        storage.set_item(TRANSACTION_COUNT_KEY, "7").unwrap();
        drop(storage);

        let reopened = open(dir.path());
        assert_eq!(
            reopened.get_item(TRANSACTION_COUNT_KEY),
            Some("7".to_string())
        );
    }

    #[test]
    fn test_set_item_overwrites_on_disk() {
        let dir = tempdir().unwrap();
        let storage = open(dir.path());
        storage.set_item(TRANSACTION_COUNT_KEY, "1").unwrap();
        storage.set_item(TRANSACTION_COUNT_KEY, "2").unwrap();
        assert_eq!(
            open(dir.path()).get_item(TRANSACTION_COUNT_KEY),
            Some("2".to_string())
        );
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(STORAGE_FILENAME), "{not json").unwrap();

        let storage = open(dir.path());
        assert_eq!(storage.get_item(TRANSACTION_COUNT_KEY), None);
        storage.set_item(TRANSACTION_COUNT_KEY, "1").unwrap();
        assert_eq!(
            open(dir.path()).get_item(TRANSACTION_COUNT_KEY),
            Some("1".to_string())
        );
    }

    #[test]
    fn test_disabled_storing_never_touches_disk() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(Some(dir.path().to_string_lossy().into_owned()), true);
        storage.set_item(TRANSACTION_COUNT_KEY, "3").unwrap();

        assert_eq!(storage.get_item(TRANSACTION_COUNT_KEY), Some("3".to_string()));
        assert!(!dir.path().join(STORAGE_FILENAME).exists());
    }
}
