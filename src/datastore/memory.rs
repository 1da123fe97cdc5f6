//! Ordered in-memory datastore, for tests and ephemeral nodes.
use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{Datastore, Key};
use crate::error::StoreError;

/// `BTreeMap`-backed store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    entries: RwLock<BTreeMap<Key, Vec<u8>>>,
}

impl MemoryDatastore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.write().insert(key.clone(), value);
        Ok(())
    }

    async fn has(&self, key: &Key) -> Result<bool, StoreError> {
        Ok(self.entries.read().contains_key(key))
    }
}
