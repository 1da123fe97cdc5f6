//! Resumable sampling driver.
//!
//! Walks heights from the stored checkpoint up to the network head, hands
//! each height to a [`Sampler`] and persists progress after every height.
use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    checkpoint::{resume_height, CheckpointStore},
    datastore::Datastore,
};

/// Source of the highest height known to exist.
#[async_trait]
pub trait HeaderSource: Send + Sync {
    /// Current network head height.
    async fn network_head(&self) -> anyhow::Result<i64>;
}

/// Per-height sampling work.
#[async_trait]
pub trait Sampler: Send + Sync {
    /// Sample the block at `height`. Returning `Ok` marks it done.
    async fn sample(&self, height: i64) -> anyhow::Result<()>;
}

/// Drives a [`Sampler`] over new heights. `D` = datastore, `H` = header source, `S` = sampler.
pub struct Daser<D, H, S> {
    checkpoints: CheckpointStore<D>,
    headers: H,
    sampler: S,
}

impl<D, H, S> Daser<D, H, S>
where
    D: Datastore,
    H: HeaderSource,
    S: Sampler,
{
    /// Create a driver over `ds`; checkpoints go to its `das` namespace.
    pub fn new(ds: D, headers: H, sampler: S) -> Self {
        Self {
            checkpoints: CheckpointStore::wrap(ds),
            headers,
            sampler,
        }
    }

    /// The checkpoint store this driver persists progress to.
    pub fn checkpoints(&self) -> &CheckpointStore<D> {
        &self.checkpoints
    }

    /// Sample every height after the checkpoint up to the current head.
    ///
    /// The checkpoint advances after each sampled height. On failure the
    /// failing height is not recorded, so the next run retries it.
    ///
    /// # Errors
    /// Returns an error if the checkpoint cannot be loaded or stored, the head
    /// is unavailable, or the sampler fails.
    pub async fn run_to_head(&self) -> anyhow::Result<i64> {
        let checkpoint = self
            .checkpoints
            .load()
            .await
            .context("load checkpoint")?;
        let head = self.headers.network_head().await.context("network head")?;

        let Some(start) = resume_height(checkpoint).filter(|&start| start <= head) else {
            debug!(checkpoint, head, "already sampled up to head");
            return Ok(checkpoint);
        };
        info!(from = start, to = head, "sampling");

        let mut done = checkpoint;
        for height in start..=head {
            self.sampler
                .sample(height)
                .await
                .with_context(|| format!("sample @height {height}"))?;

            self.checkpoints
                .store(height)
                .await
                .with_context(|| format!("store checkpoint @height {height}"))?;
            done = height;
        }

        info!(checkpoint = done, "sampled up to head");
        Ok(done)
    }
}
