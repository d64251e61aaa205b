//! String key-value persistence for the history log and the theme.
//!
//! The calculator only needs `get` and `set` on string values. [`MemoryStore`]
//! keeps them in process, [`FileStore`] writes them to a single JSON file.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

/// Key of the serialized history log.
pub const HISTORY_KEY: &str = "calculatorHistory";
/// Key of the theme preference.
pub const THEME_KEY: &str = "calculatorTheme";

/// Storage used to persist calculator data between sessions
pub trait KeyValueStore {
    /// Get the value stored for `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-memory store, for tests and sessions that should not persist
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by one JSON object file. The whole file is rewritten on every
/// `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; so is a
    /// file that does not hold a JSON object of strings, which gets replaced
    /// on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring malformed store file");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(Error::Storage(format!(
                    "cannot read {}: {}",
                    path.display(),
                    err
                )))
            }
        };
        debug!(path = %path.display(), keys = data.len(), "opened store");
        Ok(Self {
            path,
            data: RefCell::new(data),
        })
    }

    /// `store.json` in the user data directory, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("deskcalc").join("store.json"))
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let storage_error =
            |err: &dyn std::fmt::Display| Error::Storage(format!("{}: {}", self.path.display(), err));
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| storage_error(&err))?;
        }
        let text = serde_json::to_string_pretty(&*self.data.borrow())
            .map_err(|err| storage_error(&err))?;
        fs::write(&self.path, text).map_err(|err| storage_error(&err))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a"), Ok(None));
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a"), Ok(Some("2".to_string())));
    }

    #[test]
    fn shared_handles_see_the_same_data() {
        let store = Rc::new(MemoryStore::new());
        let other = Rc::clone(&store);
        other.set(THEME_KEY, "dark").unwrap();
        assert_eq!(store.get(THEME_KEY), Ok(Some("dark".to_string())));
        assert_eq!((&*store).get(THEME_KEY), Ok(Some("dark".to_string())));
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(HISTORY_KEY), Ok(None));
        store.set(HISTORY_KEY, "[]").unwrap();
        store.set(THEME_KEY, "dark").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(HISTORY_KEY), Ok(Some("[]".to_string())));
        assert_eq!(reopened.get(THEME_KEY), Ok(Some("dark".to_string())));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_KEY), Ok(None));
        store.set(THEME_KEY, "light").unwrap();
        assert_eq!(
            FileStore::open(&path).unwrap().get(THEME_KEY),
            Ok(Some("light".to_string()))
        );
    }
}
