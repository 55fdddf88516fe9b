//! Durable key/value storage for user state.
//!
//! Mirrors the browser local-storage contract: string keys mapping to string
//! values, read synchronously. The file backend keeps every key in one JSON
//! object and rewrites it atomically on each change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AppError, AppResult};

/// String-keyed storage of serialized values
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    fn remove_item(&self, key: &str) -> AppResult<()>;
}

/// In-process storage, used by tests and for ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with the given items
    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: Mutex::new(items),
        }
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.items
            .lock()
            .map_err(|_| AppError::Internal("storage lock poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.items
            .lock()
            .map_err(|_| AppError::Internal("storage lock poisoned".to_string()))?
            .remove(key);
        Ok(())
    }
}

/// Storage backed by a single JSON file
///
/// The file holds an object of string values. It is read once when opened; an
/// unreadable or malformed file starts out empty and is replaced on the next
/// write. Writes go to a sibling temp file that is then renamed over the
/// original.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = Self::load(&path);

        tracing::info!(
            path = %path.display(),
            keys = items.len(),
            "Opened local storage"
        );

        Self {
            path,
            items: Mutex::new(items),
        }
    }

    fn load(path: &Path) -> BTreeMap<String, String> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to read local storage");
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                path = %path.display(),
                "Local storage file is malformed, starting empty"
            );
            BTreeMap::new()
        })
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(items)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut items = self
            .items
            .lock()
            .map_err(|_| AppError::Internal("storage lock poisoned".to_string()))?;
        change(&mut items);
        self.flush(&items)
    }
}

impl LocalStorage for JsonFileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.update(|items| {
            items.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("movieWatchlist"), None);

        assert_ok!(storage.set_item("movieWatchlist", "[]"));
        assert_eq!(storage.get_item("movieWatchlist").as_deref(), Some("[]"));

        assert_ok!(storage.remove_item("movieWatchlist"));
        assert_eq!(storage.get_item("movieWatchlist"), None);
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let storage = JsonFileStorage::open(&path);
        assert_ok!(storage.set_item("movieReviews", r#"[{"movieId":1}]"#));
        drop(storage);

        let reopened = JsonFileStorage::open(&path);
        assert_eq!(
            reopened.get_item("movieReviews").as_deref(),
            Some(r#"[{"movieId":1}]"#)
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_storage_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("state.json");

        let storage = JsonFileStorage::open(&path);
        assert_ok!(storage.set_item("k", "v"));
        assert!(path.exists());
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let storage = JsonFileStorage::open(&path);
        assert_eq!(storage.get_item("movieWatchlist"), None);

        assert_ok!(storage.set_item("movieWatchlist", "[]"));
        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.get("movieWatchlist").map(String::as_str), Some("[]"));
    }

    #[test]
    fn test_file_storage_remove_item() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.json");

        let storage = JsonFileStorage::open(&path);
        assert_ok!(storage.set_item("a", "1"));
        assert_ok!(storage.remove_item("a"));

        let reopened = JsonFileStorage::open(&path);
        assert_eq!(reopened.get_item("a"), None);
    }
}
