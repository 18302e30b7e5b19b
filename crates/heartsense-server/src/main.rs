//! HTTP server entry point.
//!
//! Loads the model artifact once, then serves predictions until killed.

use std::sync::Arc;

use anyhow::{Context, Result};
use heartsense_model::LogisticModel;
use heartsense_server::{router, AppState, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .compact()
        .init();

    let config = Config::from_env()?;
    let model = LogisticModel::from_file(&config.model_path)
        .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;
    let state = Arc::new(AppState::new(model));

    let app = router(state);

    info!("Starting server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
