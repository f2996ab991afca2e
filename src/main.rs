//! DevRank Server
//!
//! Serves ranked GitHub profiles over HTTP

use devrank::{server, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting DevRank Server v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("Credential database: {}", config.database.path.display());

    server::run(config).await
}
