//! Embedded SQLite datastore.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tokio::task;
use tracing::debug;

use super::{Datastore, Key};
use crate::error::StoreError;

/// Single key/value table:
///   kv(key TEXT PRIMARY KEY, value BLOB NOT NULL)
///
/// Keys are stored in their normalized `/a/b` form. The database runs in WAL
/// mode with `synchronous=FULL`, so a `put` that returned `Ok` survives a
/// crash or power loss.
#[derive(Debug, Clone)]
pub struct SqliteDatastore {
    path: PathBuf,
}

impl SqliteDatastore {
    /// Creates/initializes the SQLite file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );
            "#,
        )?;
        debug!(path = %path.display(), "opened sqlite datastore");
        Ok(Self { path })
    }

    fn open(path: &Path) -> Result<Connection, StoreError> {
        let conn = Connection::open(path)?;
        // synchronous is per-connection, journal_mode is persistent
        conn.execute_batch("PRAGMA synchronous=FULL;")?;
        Ok(conn)
    }

    fn kv_get(conn: &Connection, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            let v: Vec<u8> = row.get(0)?;
            Ok(Some(v))
        } else {
            Ok(None)
        }
    }

    fn kv_set(conn: &Connection, key: &str, val: &[u8]) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO kv(key,value) VALUES(?1,?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, val],
        )?;
        Ok(())
    }
}

#[async_trait]
impl Datastore for SqliteDatastore {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path.clone();
        let key = key.clone();
        task::spawn_blocking(move || {
            let conn = Self::open(&path)?;
            Self::kv_get(&conn, key.as_str())
        })
        .await?
    }

    async fn put(&self, key: &Key, value: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path.clone();
        let key = key.clone();
        task::spawn_blocking(move || {
            let conn = Self::open(&path)?;
            Self::kv_set(&conn, key.as_str(), &value)
        })
        .await?
    }
}
