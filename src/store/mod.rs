//! Secret store abstraction.
//!
//! The engine only ever talks to a [`SecretStore`]: the real Vault client and the
//! in-process [`MemoryStore`] both implement it, so resolution and execution can be
//! exercised without a server.
//!
//! Contract shared by every implementation:
//! - `list` of a missing directory is `Ok(None)`, not an error. Child names that end
//!   in `/` are nested directories.
//! - `read` of a missing key is `Ok(None)`.
//! - `write` and `delete` either succeed or return a [`StoreError`].

mod memory;
mod vault;

pub use memory::MemoryStore;
pub use vault::{VaultClient, VaultSettings};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Opaque key/value payload stored at a leaf path. Copied verbatim, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueBundle(Map<String, Value>);

impl ValueBundle {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ValueBundle {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueBundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("path {path} rejected: {reason}")]
    Rejected { path: String, reason: String },
}

/// Minimal operations the relocation engine needs from a hierarchical secret store.
pub trait SecretStore {
    /// Direct children of the directory `path`; `None` when no such directory exists.
    fn list(&self, path: &str) -> Result<Option<Vec<String>>, StoreError>;

    /// Value stored at `path`; `None` when the key does not exist.
    fn read(&self, path: &str) -> Result<Option<ValueBundle>, StoreError>;

    fn write(&self, path: &str, value: &ValueBundle) -> Result<(), StoreError>;

    fn delete(&self, path: &str) -> Result<(), StoreError>;
}

impl<T: SecretStore + ?Sized> SecretStore for &T {
    fn list(&self, path: &str) -> Result<Option<Vec<String>>, StoreError> {
        (**self).list(path)
    }

    fn read(&self, path: &str) -> Result<Option<ValueBundle>, StoreError> {
        (**self).read(path)
    }

    fn write(&self, path: &str, value: &ValueBundle) -> Result<(), StoreError> {
        (**self).write(path, value)
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        (**self).delete(path)
    }
}

impl<T: SecretStore + ?Sized> SecretStore for Box<T> {
    fn list(&self, path: &str) -> Result<Option<Vec<String>>, StoreError> {
        (**self).list(path)
    }

    fn read(&self, path: &str) -> Result<Option<ValueBundle>, StoreError> {
        (**self).read(path)
    }

    fn write(&self, path: &str, value: &ValueBundle) -> Result<(), StoreError> {
        (**self).write(path, value)
    }

    fn delete(&self, path: &str) -> Result<(), StoreError> {
        (**self).delete(path)
    }
}
