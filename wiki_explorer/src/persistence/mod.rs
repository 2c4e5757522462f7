//! Persistence Adapter - load/save of session state under stable string keys.
//!
//! Stores are plain string key-value maps. [`Persistence`] layers typed JSON
//! values and the failure policy on top: a failed load logs a warning and
//! yields the caller's default, a failed save logs a warning and is dropped.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PersistenceError;

/// Stable keys of the persisted session parts (before namespacing).
pub mod keys {
    pub const SESSION: &str = "session";
    pub const HISTORY: &str = "history";
    pub const VIEWED_TOPICS: &str = "viewed-topics";
    pub const ARTICLES: &str = "articles";
    pub const PAGE_LINKS: &str = "page-links";
}

/// A durable string key-value store.
pub trait KeyValueStore: Send {
    /// Read a value. `Ok(None)` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// Typed, namespaced access to a [`KeyValueStore`] that never fails.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// The namespaced key actually written to the store.
    pub fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Load a value, falling back to `default` if it is missing or unreadable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(error) => {
                tracing::warn!(key = %self.full_key(key), %error, "failed to load persisted value, using default");
                default
            }
        }
    }

    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load(key, T::default())
    }

    /// Save a value. Failures are logged, never returned.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if let Err(error) = self.try_save(key, value) {
            tracing::warn!(key = %self.full_key(key), %error, "failed to persist value");
        }
    }

    /// Remove a value. Failures are logged, never returned.
    pub fn remove(&mut self, key: &str) {
        let full_key = self.full_key(key);
        if let Err(error) = self.store.remove(&full_key) {
            tracing::warn!(key = %full_key, %error, "failed to remove persisted value");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        match self.store.read(&self.full_key(key))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn try_save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(value)?;
        let full_key = self.full_key(key);
        self.store.write(&full_key, &raw)
    }
}
