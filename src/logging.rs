//! Structured logging setup.
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `cfg.filter`. Returns `false` if a subscriber was
/// already installed, which is left untouched.
pub fn init_logging(cfg: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if cfg.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    match installed {
        Ok(()) => {
            tracing::debug!(filter = %cfg.filter, json = cfg.json, "logging initialized");
            true
        }
        Err(_) => false,
    }
}
