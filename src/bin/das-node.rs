//! Node process: opens the datastore, reports the sampling checkpoint and
//! serves it over RPC until interrupted.
//!
//! Usage: `das-node [config.toml]`
use std::path::PathBuf;

use anyhow::Context;
use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use das_node::{
    config::NodeConfig, logging::init_logging, resume_height, CheckpointStore, RpcServer,
    SqliteDatastore,
};
use serde_json::json;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = NodeConfig::load(config_path.as_deref()).context("load config")?;
    init_logging(&cfg.log);

    let ds = SqliteDatastore::new(&cfg.store.path)
        .with_context(|| format!("open datastore at {}", cfg.store.path.display()))?;
    let checkpoints = CheckpointStore::wrap(ds);

    let checkpoint = checkpoints.load().await.context("load checkpoint")?;
    info!(
        checkpoint,
        next_height = ?resume_height(checkpoint),
        "loaded sampling checkpoint"
    );

    let server = RpcServer::new(cfg.rpc.clone());
    server.register_handler("/das/checkpoint", "GET", move |_req: Request| {
        let checkpoints = checkpoints.clone();
        async move { checkpoint_status(&checkpoints).await }
    })?;
    server.start().await?;

    tokio::signal::ctrl_c().await.context("wait for ctrl-c")?;
    server.stop().await?;
    Ok(())
}

async fn checkpoint_status(checkpoints: &CheckpointStore<SqliteDatastore>) -> Response {
    match checkpoints.load().await {
        Ok(checkpoint) => Json(json!({
            "checkpoint": checkpoint,
            "next_height": resume_height(checkpoint),
        }))
        .into_response(),
        Err(err) => {
            error!(%err, "failed to load checkpoint");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
