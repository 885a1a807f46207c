use std::sync::Arc;

use anyhow::Context;

use partshop_api::{app::services::AppServices, config::AppConfig, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    partshop_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // No traffic is served without a working store connection.
    let services = match AppServices::connect(&config).await {
        Ok(services) => services,
        Err(e) => {
            tracing::error!(error = %e, "error connecting to Postgres");
            return Err(e).context("failed to connect to the part store");
        }
    };

    let server = server::start(config.port, Arc::new(services))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!(url = %server.url, "server ready");

    server.wait().await.context("server terminated")?;
    Ok(())
}
