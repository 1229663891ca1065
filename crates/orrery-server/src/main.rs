//! orrery-server: serves analytic ephemeris batches to the explorer.
//!
//! Reads config from env vars (a `.env` file is honoured):
//!   ORRERY_BIND_ADDR  listen address (default: 0.0.0.0:3000)
//!   ORRERY_MAX_LIMIT  largest `limit` accepted per request (default: 10000)

use anyhow::Context;
use tokio::net::TcpListener;

use orrery_server::config::ServerConfig;
use orrery_server::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,orrery_server=debug".into()),
        )
        .init();

    let config = ServerConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    tracing::info!("max batch limit {}", config.max_limit);

    let app = build_router(config);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind to {bind_addr}"))?;
    tracing::info!("orrery-server listening on {bind_addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
