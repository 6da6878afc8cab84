//! Snapshot storage contracts and adapters.
//!
//! The dock runtime persists a single JSON document per key. Adapters only move raw JSON text;
//! typed encoding lives in [`load_snapshot_with`] and [`save_snapshot_with`].

mod local;

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use local::WebSnapshotStorage;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures raised by [`SnapshotStorage`] adapters and the typed snapshot helpers.
pub enum StorageError {
    /// The storage medium is not reachable in the current environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// Reading a key failed.
    #[error("storage read failed: {0}")]
    Read(String),
    /// Writing or deleting a key failed.
    #[error("storage write failed: {0}")]
    Write(String),
    /// The value could not be serialized to JSON.
    #[error("snapshot encode failed: {0}")]
    Encode(String),
    /// The stored JSON could not be parsed into the requested type.
    #[error("snapshot decode failed: {0}")]
    Decode(String),
}

/// Key-value storage port holding raw JSON snapshots.
pub trait SnapshotStorage {
    /// Loads the raw JSON stored under `key`, if any.
    fn load_raw(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the raw JSON stored under `key`.
    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), StorageError>;

    /// Removes `key` from storage. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op storage for headless hosts and baseline tests. Nothing is ever loaded.
pub struct NoopSnapshotStorage;

impl SnapshotStorage for NoopSnapshotStorage {
    fn load_raw(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn save_raw(&self, _key: &str, _raw_json: &str) -> Result<(), StorageError> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory storage keyed by string. Clones share the same backing map.
pub struct MemorySnapshotStorage {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySnapshotStorage {
    /// Creates a store pre-seeded with one raw entry.
    pub fn with_entry(key: impl Into<String>, raw_json: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .inner
            .borrow_mut()
            .insert(key.into(), raw_json.into());
        store
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save_raw(&self, key: &str, raw_json: &str) -> Result<(), StorageError> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed snapshot through a [`SnapshotStorage`] implementation.
///
/// # Errors
///
/// Returns an error when the store read fails or the stored JSON does not decode as `T`.
pub fn load_snapshot_with<S: SnapshotStorage + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.load_raw(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| StorageError::Decode(e.to_string()))?;
    Ok(Some(value))
}

/// Serializes and saves a typed snapshot through a [`SnapshotStorage`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_snapshot_with<S: SnapshotStorage + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.save_raw(key, &raw)
}
