use anyhow::{Context, Result};
use clap::Parser;
use huddle_server::{AppState, Args, ServerConfig, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from(Args::parse());
    let bind = config.bind;
    info!(
        "Max {} participants per room, {} ICE servers",
        config.max_participants,
        config.ice_servers.len()
    );

    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;

    info!("huddle-server listening on {}", bind);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
