#![cfg(feature = "store-sqlite")]

use das_node::datastore::{Datastore, Key, SqliteDatastore};
use das_node::CheckpointStore;

use tempfile::NamedTempFile;

#[tokio::test]
async fn sqlite_datastore_roundtrips() -> anyhow::Result<()> {
    // temp file for each run
    let tmp = NamedTempFile::new()?;
    let store = SqliteDatastore::new(tmp.path())?;

    // Defaults on a fresh DB
    let key = Key::new("das/checkpoint");
    assert!(store.get(&key).await?.is_none(), "fresh DB has no keys");
    assert!(!store.has(&key).await?);

    store.put(&key, vec![1, 2, 3]).await?;
    assert_eq!(store.get(&key).await?, Some(vec![1, 2, 3]));

    // upsert replaces
    store.put(&key, vec![]).await?;
    assert_eq!(store.get(&key).await?, Some(vec![]));
    assert!(store.has(&key).await?);

    Ok(())
}

#[tokio::test]
async fn checkpoint_survives_reopen() -> anyhow::Result<()> {
    let tmp = NamedTempFile::new()?;

    {
        let checkpoints = CheckpointStore::wrap(SqliteDatastore::new(tmp.path())?);
        assert_eq!(checkpoints.load().await?, 0, "fresh DB starts at checkpoint 0");
        checkpoints.store(123_456).await?;
    }

    // a new handle stands in for a restarted process
    let checkpoints = CheckpointStore::wrap(SqliteDatastore::new(tmp.path())?);
    assert_eq!(checkpoints.load().await?, 123_456);

    let raw = SqliteDatastore::new(tmp.path())?
        .get(&Key::new("/das/checkpoint"))
        .await?;
    assert_eq!(raw, Some(123_456u64.to_be_bytes().to_vec()));

    Ok(())
}
