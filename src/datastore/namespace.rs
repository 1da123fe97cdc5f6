//! Key-prefixing wrapper that partitions one backend into isolated regions.
use async_trait::async_trait;

use super::{Datastore, Key};
use crate::error::StoreError;

/// A view of `D` in which every key is stored below `prefix`.
#[derive(Debug, Clone)]
pub struct Namespaced<D> {
    inner: D,
    prefix: Key,
}

/// Wraps `inner` so that `get`/`put` on `k` touch `prefix/k` in `inner`.
///
/// Does no I/O.
pub fn wrap<D: Datastore>(inner: D, prefix: Key) -> Namespaced<D> {
    Namespaced { inner, prefix }
}

impl<D> Namespaced<D> {
    /// The prefix applied to every key.
    pub fn prefix(&self) -> &Key {
        &self.prefix
    }

    fn scoped(&self, key: &Key) -> Key {
        self.prefix.child(key)
    }
}

#[async_trait]
impl<D: Datastore> Datastore for Namespaced<D> {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(&self.scoped(key)).await
    }

    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.put(&self.scoped(key), value).await
    }

    async fn has(&self, key: &Key) -> Result<bool, StoreError> {
        self.inner.has(&self.scoped(key)).await
    }
}
