//! DRM Server - disaster response routing backend

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drm_server::config::Config;
use drm_server::state::AppState;
use drm_server::{api, persistence};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("drm_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting DRM Server...");

    let config = Config::from_env();
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    let db = persistence::init_database(&config.database_path, config.database_max_connections)
        .await?;
    let state = Arc::new(AppState::new(&config, db)?);

    let app = api::app(state);

    // Run server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
