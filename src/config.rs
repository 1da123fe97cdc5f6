//! Node configuration, loaded from an optional TOML file and `DAS__*`
//! environment variables (`DAS__RPC__PORT=9000`).
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DAS";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// RPC server binding.
    pub rpc: RpcConfig,
    /// Datastore location.
    pub store: StoreConfig,
    /// Logging output.
    pub log: LogConfig,
}

/// Where the RPC server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Interface address, e.g. `0.0.0.0`.
    pub address: String,
    /// TCP port; `0` picks a free one.
    pub port: u16,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_owned(),
            port: 26659,
        }
    }
}

impl RpcConfig {
    /// `address:port`, as handed to the socket layer.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Datastore location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("das-node.sqlite"),
        }
    }
}

/// Log filtering and format. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
        }
    }
}

impl NodeConfig {
    /// Defaults, overlaid with `path` (if given and present) and then the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
