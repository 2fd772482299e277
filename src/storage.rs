use std::{
    collections::{BTreeMap, HashMap},
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use log::*;

use crate::errors::{AppError, AppResult};

/// Persistent string key-value storage, as offered by the host platform.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Keeps every entry in one JSON object on disk, rewritten on each change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> AppResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw).map_err(AppError::StateDeserializationError)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(entries).map_err(AppError::StateSerializationError)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, raw)?;
        trace!("Wrote {} entries to {}", entries.len(), self.path.display());

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());

        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.read_all()?;

        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> T) -> T {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut entries)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.with(|entries| entries.get(key).cloned()))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.with(|entries| entries.insert(key.to_owned(), value.to_owned()));
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.with(|entries| entries.remove(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("userToken").unwrap(), None);

        store.set("userToken", "abc").unwrap();
        store.set("userData", "{}").unwrap();
        assert_eq!(store.get("userToken").unwrap().as_deref(), Some("abc"));

        store.set("userToken", "def").unwrap();
        assert_eq!(store.get("userToken").unwrap().as_deref(), Some("def"));

        store.remove("userToken").unwrap();
        store.remove("neverSet").unwrap();
        assert_eq!(store.get("userToken").unwrap(), None);
        assert_eq!(store.get("userData").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn memory_store_behaves_like_a_map() {
        exercise(&MemoryStore::default());
    }

    #[test]
    fn file_store_behaves_like_a_map() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&FileStore::new(dir.path().join("nested").join("session.json")));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        FileStore::new(&path).set("userToken", "abc").unwrap();

        assert_eq!(
            FileStore::new(&path).get("userToken").unwrap().as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn corrupt_file_is_a_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStore::new(&path).get("userToken"),
            Err(AppError::StateDeserializationError(..))
        ));
    }
}
