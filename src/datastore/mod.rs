//! Byte-oriented key/value persistence used by the checkpoint store.
//!
//! Keys are hierarchical `/`-separated paths; [`namespace::wrap`] scopes a
//! store under a prefix so unrelated data can share one backend.
use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::error::StoreError;

pub mod memory;
pub mod namespace;
#[cfg(feature = "store-sqlite")]
pub mod sqlite;

pub use memory::MemoryDatastore;
pub use namespace::Namespaced;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteDatastore;

/// A normalized hierarchical key such as `/das/checkpoint`.
///
/// Always starts with `/`, never ends with one (except the root), and never
/// contains empty segments.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(String);

impl Key {
    /// Builds a key from a path, normalizing slashes.
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        Self(format!("/{}", segments.join("/")))
    }

    /// The root key `/`.
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// Appends `other` below `self`: `/das` + `/checkpoint` = `/das/checkpoint`.
    pub fn child(&self, other: &Key) -> Self {
        if self.is_root() {
            return other.clone();
        }
        if other.is_root() {
            return self.clone();
        }
        Self(format!("{}{}", self.0, other.0))
    }

    /// Whether this is the root key.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Minimal durable key/value interface.
///
/// Absence is reported as `Ok(None)`, never as an error or an empty value.
/// Implementations must make a single `put` atomic.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Value stored at `key`, if any.
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` at `key`, replacing any previous value.
    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError>;

    /// Whether a value is stored at `key`.
    async fn has(&self, key: &Key) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.is_some())
    }
}

#[async_trait]
impl<D: Datastore + ?Sized> Datastore for Arc<D> {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key).await
    }

    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value).await
    }

    async fn has(&self, key: &Key) -> Result<bool, StoreError> {
        (**self).has(key).await
    }
}
