use async_trait::async_trait;
use das_node::datastore::{namespace, Datastore, Key, MemoryDatastore};
use das_node::error::StoreError;
use das_node::{resume_height, CheckpointStore, StoredCheckpoint};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn fresh_store_loads_zero() -> anyhow::Result<()> {
    let store = CheckpointStore::wrap(MemoryDatastore::new());

    assert_eq!(store.load().await?, 0);
    assert_eq!(store.read().await?, StoredCheckpoint::Absent);
    assert_eq!(resume_height(store.load().await?), Some(1));
    Ok(())
}

#[tokio::test]
async fn stored_heights_round_trip() -> anyhow::Result<()> {
    let store = CheckpointStore::wrap(MemoryDatastore::new());

    for h in [0, 1, 100, 1 << 40, i64::MAX, -1, i64::MIN] {
        store.store(h).await?;
        assert_eq!(store.load().await?, h, "round trip of {h}");
        assert_eq!(store.read().await?, StoredCheckpoint::Found(h));
    }
    Ok(())
}

#[tokio::test]
async fn explicit_zero_reads_like_no_checkpoint() -> anyhow::Result<()> {
    let store = CheckpointStore::wrap(MemoryDatastore::new());

    store.store(100).await?;
    assert_eq!(store.load().await?, 100);
    assert_eq!(resume_height(store.load().await?), Some(101));

    store.store(0).await?;
    assert_eq!(store.load().await?, 0);
    // only the tagged read can still tell them apart
    assert_eq!(store.read().await?, StoredCheckpoint::Found(0));
    Ok(())
}

#[tokio::test]
async fn repeated_loads_are_stable() -> anyhow::Result<()> {
    let store = CheckpointStore::wrap(MemoryDatastore::new());
    store.store(7).await?;

    for _ in 0..5 {
        assert_eq!(store.load().await?, 7);
    }
    Ok(())
}

#[tokio::test]
async fn later_store_wins_in_any_order() -> anyhow::Result<()> {
    let store = CheckpointStore::wrap(MemoryDatastore::new());

    for (h1, h2) in [(10, 20), (20, 20), (20, 5)] {
        store.store(h1).await?;
        store.store(h2).await?;
        assert_eq!(store.load().await?, h2);
    }
    Ok(())
}

#[tokio::test]
async fn checkpoint_lives_under_das_namespace() -> anyhow::Result<()> {
    let base = Arc::new(MemoryDatastore::new());
    let store = CheckpointStore::wrap(base.clone());

    // unrelated data, including a bare "checkpoint" key outside the namespace
    base.put(&Key::new("checkpoint"), vec![0xAA; 8]).await?;
    let other = namespace::wrap(base.clone(), Key::new("headers"));
    other.put(&Key::new("checkpoint"), vec![0xBB; 8]).await?;
    assert_eq!(store.load().await?, 0);

    store.store(42).await?;
    assert_eq!(
        base.get(&Key::new("das/checkpoint")).await?,
        Some(42u64.to_be_bytes().to_vec())
    );
    assert_eq!(base.get(&Key::new("checkpoint")).await?, Some(vec![0xAA; 8]));
    assert_eq!(other.get(&Key::new("checkpoint")).await?, Some(vec![0xBB; 8]));
    assert_eq!(base.len(), 3);
    Ok(())
}

#[tokio::test]
async fn corrupt_record_is_an_error() -> anyhow::Result<()> {
    let base = Arc::new(MemoryDatastore::new());
    let store = CheckpointStore::wrap(base.clone());
    base.put(&Key::new("das/checkpoint"), vec![1, 2, 3]).await?;

    match store.load().await {
        Err(StoreError::InvalidCheckpoint { key, len }) => {
            assert_eq!(key, Key::new("das/checkpoint"));
            assert_eq!(len, 3);
        }
        other => panic!("expected InvalidCheckpoint, got {other:?}"),
    }
    Ok(())
}

/// Store that fails every call and counts how often it was hit.
#[derive(Default)]
struct BrokenStore {
    calls: AtomicUsize,
}

#[async_trait]
impl Datastore for BrokenStore {
    async fn get(&self, _key: &Key) -> Result<Option<Vec<u8>>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("disk on fire").into())
    }
    async fn put(&self, _key: &Key, _value: Vec<u8>) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("disk on fire").into())
    }
}

#[tokio::test]
async fn storage_failures_propagate_without_retry() {
    let broken = Arc::new(BrokenStore::default());
    let store = CheckpointStore::wrap(broken.clone());

    let err = store.load().await.unwrap_err();
    assert!(matches!(err, StoreError::Other(_)), "got {err:?}");
    assert_eq!(broken.calls.load(Ordering::SeqCst), 1);

    let err = store.store(5).await.unwrap_err();
    assert!(err.to_string().contains("disk on fire"));
    assert_eq!(broken.calls.load(Ordering::SeqCst), 2);
}
