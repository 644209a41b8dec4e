//! Server configuration: command line, environment and dataset loading

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use discovery_core::{Dataset, RecommendConfig};
use tracing::info;

use crate::error::ServerError;

/// Command line arguments, each with an environment fallback.
#[derive(Parser, Debug, Clone)]
#[command(name = "discovery-server")]
#[command(about = "User search and friend recommendation service")]
#[command(version)]
pub struct Args {
    /// HTTP server port
    #[arg(short, long, env = "DISCOVERY_PORT", default_value = "9100")]
    pub port: u16,

    /// HTTP server address (overrides port)
    #[arg(short, long, env = "DISCOVERY_ADDR")]
    pub address: Option<String>,

    /// JSON dataset used to seed the in-memory stores
    #[arg(short, long, env = "DISCOVERY_DATA")]
    pub data: Option<PathBuf>,

    /// Maximum concurrent store fetches per recommendation call
    #[arg(long, env = "DISCOVERY_FETCH_CONCURRENCY", default_value = "8")]
    pub fetch_concurrency: usize,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "DISCOVERY_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub data_path: Option<PathBuf>,
    pub recommend: RecommendConfig,
    /// Search limit applied when a request omits one
    pub default_search_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 9100)),
            data_path: None,
            recommend: RecommendConfig::default(),
            default_search_limit: 10,
        }
    }
}

impl ServerConfig {
    pub fn from_args(args: &Args) -> Result<Self, ServerError> {
        let address = match &args.address {
            Some(address) => address.clone(),
            None => format!("0.0.0.0:{}", args.port),
        };
        let addr = address
            .parse()
            .map_err(|source| ServerError::Address { address, source })?;

        Ok(Self {
            addr,
            data_path: args.data.clone(),
            recommend: RecommendConfig {
                fetch_concurrency: args.fetch_concurrency.max(1),
                ..RecommendConfig::default()
            },
            ..Self::default()
        })
    }

    /// Load the configured dataset, or an empty one when no path is set.
    pub async fn load_dataset(&self) -> Result<Dataset, ServerError> {
        match &self.data_path {
            Some(path) => load_dataset(path).await,
            None => {
                info!("No dataset configured, starting empty");
                Ok(Dataset::default())
            }
        }
    }
}

/// Read a JSON dataset file.
pub async fn load_dataset(path: &Path) -> Result<Dataset, ServerError> {
    let raw = tokio::fs::read(path).await?;
    let dataset: Dataset = serde_json::from_slice(&raw)?;
    info!(
        path = %path.display(),
        users = dataset.users.len(),
        friendships = dataset.friendships.len(),
        posts = dataset.posts.len(),
        pending = dataset.pending.len(),
        "Dataset loaded"
    );
    Ok(dataset)
}
