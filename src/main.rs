// src/main.rs - Process entry point
//
// Grounded in src/main.rs's start_server shape: load config, init tracing,
// connect the catalogue, build the router, serve.

use std::sync::Arc;

use tracing::info;

use banquet_engine::api::{create_router, AppState};
use banquet_engine::catalogue::sqlite::SqliteCatalogue;
use banquet_engine::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load("banquet_engine.toml")?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.level))
        .init();

    info!("connecting to catalogue at {}", config.database.url);
    let catalogue = SqliteCatalogue::new(&config.database.url).await?;

    let state = Arc::new(AppState {
        catalogue: Arc::new(catalogue),
    });

    let app = create_router(state, config.server.cors_permissive);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("banquet engine listening on {}", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}
