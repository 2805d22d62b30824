//! Shared store handle
//!
//! Serializes callers on a single mutex so a put's append and table update
//! form one critical section.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use super::KvStore;
use crate::error::Result;

/// Cloneable, thread-safe handle to a [`KvStore`]
#[derive(Debug, Clone)]
pub struct SharedKvStore {
    inner: Arc<Mutex<KvStore>>,
}

impl SharedKvStore {
    pub fn new(store: KvStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Get an owned copy of the current value for `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).map(str::to_owned)
    }

    /// Durably append `key -> value`, then make it visible.
    ///
    /// Other callers wait until the fsync and the table update are done.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.inner.lock().put(key, value)
    }

    pub fn log_path(&self) -> PathBuf {
        self.inner.lock().log_path().to_path_buf()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Take the store back out if this is the last handle
    pub fn into_inner(self) -> std::result::Result<KvStore, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<KvStore> for SharedKvStore {
    fn from(store: KvStore) -> Self {
        Self::new(store)
    }
}
