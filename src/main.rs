//! `homepage` binary: serves the site using `HOMEPAGE_*` environment settings.

use homepage::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SiteConfig::from_env()?;
    tracing::info!("Starting site server on {}", config.bind_addr());
    tracing::info!("Try: curl -i http://{}/home", config.bind_addr());

    SiteServer::new(config).run().await
}
