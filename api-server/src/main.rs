//! Fraud Scoring API - server entry point

use std::net::SocketAddr;

use anyhow::Context;
use fraud_api::{create_router, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "fraud_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Fraud Scoring API starting...");
    let paths = config.scoring_paths();
    tracing::info!("Model: {}", paths.model_path.display());
    tracing::info!("Transactions: {}", paths.transactions_path.display());
    tracing::info!("Reports: {}", paths.outputs_dir.display());

    let state = AppState::new(config.clone());

    // Warm the artifact cache; a missing model is reported per request
    if let Err(e) = state.service.model_info() {
        tracing::warn!("Model not loaded at startup: {}", e);
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
