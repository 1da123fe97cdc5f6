//! Durable sampling checkpoint.
//!
//! The checkpoint is the height of the latest fully sampled header, stored as
//! an 8-byte big-endian integer at `/das/checkpoint`. A node that has never
//! stored one reads back `0`, and sampling always resumes at
//! `checkpoint + 1`.
use tracing::debug;

use crate::{
    datastore::{namespace, Datastore, Key, Namespaced},
    error::StoreError,
};

/// Namespace every checkpoint key lives under.
pub const STORE_PREFIX: &str = "das";

/// Key of the checkpoint record inside [`STORE_PREFIX`].
pub const CHECKPOINT_KEY: &str = "checkpoint";

/// Width of the encoded checkpoint.
const CHECKPOINT_LEN: usize = std::mem::size_of::<u64>();

/// Raw result of reading the checkpoint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredCheckpoint {
    /// A record exists and decodes to this height.
    Found(i64),
    /// No checkpoint has ever been written.
    Absent,
}

impl StoredCheckpoint {
    /// Collapses [`Absent`](Self::Absent) to `0`.
    pub fn height(self) -> i64 {
        match self {
            StoredCheckpoint::Found(h) => h,
            StoredCheckpoint::Absent => 0,
        }
    }
}

/// First height still to be sampled after `checkpoint`, or `None` once
/// `i64::MAX` has been sampled and no height is left.
pub fn resume_height(checkpoint: i64) -> Option<i64> {
    checkpoint.checked_add(1)
}

/// Checkpoint persistence over a `das`-scoped view of a datastore.
///
/// No caching, locking or monotonicity checks: every `load` is one `get`,
/// every `store` is one `put`, and concurrent writers race with last write
/// winning. Keep a single writer.
#[derive(Debug, Clone)]
pub struct CheckpointStore<D> {
    ds: Namespaced<D>,
}

impl<D: Datastore> CheckpointStore<D> {
    /// Scopes `ds` under the [`STORE_PREFIX`] namespace. Does no I/O.
    pub fn wrap(ds: D) -> Self {
        Self {
            ds: namespace::wrap(ds, Key::new(STORE_PREFIX)),
        }
    }

    /// Reads the checkpoint without erasing the absent case.
    pub async fn read(&self) -> Result<StoredCheckpoint, StoreError> {
        let key = Key::new(CHECKPOINT_KEY);
        match self.ds.get(&key).await? {
            Some(buf) => decode(&buf)
                .map(StoredCheckpoint::Found)
                .ok_or_else(|| StoreError::InvalidCheckpoint {
                    key: self.ds.prefix().child(&key),
                    len: buf.len(),
                }),
            None => Ok(StoredCheckpoint::Absent),
        }
    }

    /// Loads the checkpoint height, or `0` if none was ever stored.
    ///
    /// On error the caller must not fall back to `0`.
    pub async fn load(&self) -> Result<i64, StoreError> {
        let stored = self.read().await?;
        if stored == StoredCheckpoint::Absent {
            debug!("checkpoint not found, starting sampling at block height 1");
        }
        Ok(stored.height())
    }

    /// Persists `height`, overwriting any previous checkpoint.
    ///
    /// Any `i64` is accepted, including values lower than the stored one.
    pub async fn store(&self, height: i64) -> Result<(), StoreError> {
        self.ds
            .put(&Key::new(CHECKPOINT_KEY), encode(height).to_vec())
            .await
    }
}

fn encode(height: i64) -> [u8; CHECKPOINT_LEN] {
    (height as u64).to_be_bytes()
}

fn decode(buf: &[u8]) -> Option<i64> {
    let bytes: [u8; CHECKPOINT_LEN] = buf.try_into().ok()?;
    Some(u64::from_be_bytes(bytes) as i64)
}
