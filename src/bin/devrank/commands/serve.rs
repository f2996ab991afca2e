//! Serve command - run the HTTP server

use anyhow::Result;
use devrank::{server, Config};
use tracing_subscriber::EnvFilter;

pub async fn run(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    // `--verbose` may already have installed a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    server::run(config).await
}
