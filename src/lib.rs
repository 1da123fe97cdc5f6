#![forbid(unsafe_code)]
#![deny(missing_docs)]
//! das-node: crash-safe sampling checkpoints and the node's RPC server.
//!
//! ## What you implement
//! - [`HeaderSource`]: report the current network head height.
//! - [`Sampler`]: do the per-height sampling work.
//! - [`Datastore`] (optional): bring your own backend, or use
//!   [`MemoryDatastore`] / [`SqliteDatastore`].
//!
//! ## What the crate does
//! - Persists the **checkpoint** (last fully sampled height) under the `das`
//!   namespace as an 8-byte big-endian integer; a fresh store reads as `0`.
//! - Resumes sampling at **checkpoint + 1** after every restart.
//! - Serves HTTP routes registered at any time on a start/stop-able listener.
//!
//! ## Minimal usage
//! ```rust,ignore
//! use das_node::prelude::*;
//! use async_trait::async_trait;
//!
//! struct Head;
//! #[async_trait]
//! impl HeaderSource for Head {
//!     async fn network_head(&self) -> anyhow::Result<i64> { Ok(10) }
//! }
//!
//! struct Noop;
//! #[async_trait]
//! impl Sampler for Noop {
//!     async fn sample(&self, _height: i64) -> anyhow::Result<()> { Ok(()) }
//! }
//!
//! async fn run() -> anyhow::Result<()> {
//!     let daser = Daser::new(SqliteDatastore::new("node.sqlite")?, Head, Noop);
//!     let checkpoint = daser.run_to_head().await?;
//!     assert_eq!(checkpoint, 10);
//!     Ok(())
//! }
//! ```

/// Checkpoint persistence and the resumption rule.
pub mod checkpoint;

/// Node configuration.
pub mod config;

/// Resumable sampling driver.
pub mod daser;

/// Key/value store abstraction and implementations.
pub mod datastore;

/// Error types.
pub mod error;

/// `tracing` subscriber setup.
pub mod logging;

/// HTTP server and routing.
pub mod rpc;

// Public re-exports
pub use checkpoint::{resume_height, CheckpointStore, StoredCheckpoint};
pub use config::{LogConfig, NodeConfig, RpcConfig, StoreConfig};
pub use daser::{Daser, HeaderSource, Sampler};
#[cfg(feature = "store-sqlite")]
pub use datastore::SqliteDatastore;
pub use datastore::{Datastore, Key, MemoryDatastore, Namespaced};
pub use error::{ServerError, StoreError};
pub use rpc::{RequestRouter, RouteTable, RpcServer};

/// Convenience prelude for end users.
pub mod prelude {
    #[cfg(feature = "store-sqlite")]
    pub use crate::SqliteDatastore;
    pub use crate::{
        resume_height, CheckpointStore, Daser, Datastore, HeaderSource, MemoryDatastore,
        RpcServer, Sampler,
    };
}
