//! Error types for the datastore, checkpoint and RPC layers.
use thiserror::Error;

use crate::datastore::Key;

/// Failures raised by a [`Datastore`](crate::datastore::Datastore) or while
/// decoding a persisted checkpoint.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite backend failure.
    #[cfg(feature = "store-sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The blocking task running a store operation panicked or was cancelled.
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A checkpoint record exists but is not an 8-byte big-endian integer.
    #[error("corrupt checkpoint at {key}: expected 8 bytes, found {len}")]
    InvalidCheckpoint {
        /// Key the record was read from (as seen by the caller).
        key: Key,
        /// Length of the stored value.
        len: usize,
    },

    /// Any other backend failure, for third-party datastores.
    #[error("store error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Failures raised by the [`RpcServer`](crate::rpc::RpcServer).
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind RPC server to {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: String,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// `start` was called while the server is already listening.
    #[error("RPC server is already running on {0}")]
    AlreadyRunning(std::net::SocketAddr),

    /// Route patterns must be absolute paths.
    #[error("invalid route pattern {0:?}: must start with '/'")]
    InvalidRoute(String),

    /// The method is not one the router can filter on.
    #[error("unsupported HTTP method {0:?}")]
    UnsupportedMethod(String),

    /// Socket error after binding.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
