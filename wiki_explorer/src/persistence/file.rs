//! A store keeping one JSON file per key in a directory.

use std::io;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::PersistenceError;

/// A [`KeyValueStore`] writing `<root>/<key>.json`.
///
/// Characters outside `[A-Za-z0-9._-]` in keys are replaced by `_`. Writes go
/// through a temporary file and a rename so a crash never leaves a torn value.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Use `root` as the storage directory; it is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        std::fs::write(&staging, value)?;
        std::fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("session"));

        assert_eq!(store.read("infinite-wiki:history").unwrap(), None);
        store.write("infinite-wiki:history", r#"["Earth"]"#).unwrap();
        assert_eq!(
            store.read("infinite-wiki:history").unwrap().as_deref(),
            Some(r#"["Earth"]"#)
        );
        assert!(dir.path().join("session/infinite-wiki_history.json").exists());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileStore::new(dir.path()).write("k", "42").unwrap();

        let reopened = JsonFileStore::new(dir.path());
        assert_eq!(reopened.read("k").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        store.remove("never-written").unwrap();

        store.write("k", "1").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.read("k").unwrap(), None);
    }
}
