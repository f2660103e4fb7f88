//! Fraud Scoring API Server
//!
//! Serves predictions from the trained fraud pipeline and metadata about the
//! latest training run.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     FRAUD SCORING API                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   spawn_blocking   ┌────────────────────┐  │
//! │  │  Router  │ ─────────────────► │  ScoringService    │  │
//! │  │  (Axum)  │                    │  (fraud-core)      │  │
//! │  └──────────┘                    └─────────┬──────────┘  │
//! │                                            ▼             │
//! │        ml/model.bin   transactions.csv   outputs/        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use fraud_core::ScoringService;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScoringService>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            service: Arc::new(ScoringService::new(config.scoring_paths())),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(handlers::health::check))
        // Model
        .route("/model/latest-run", get(handlers::model::latest_run))
        .route("/model/predict-sample", get(handlers::model::predict_sample))
        .route("/model/info", get(handlers::model::info))
        .route("/model/reload", post(handlers::model::reload))
        // Transactions
        .route(
            "/transactions/with-predictions",
            get(handlers::transactions::with_predictions),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Allow-listed origins with credentials; methods and headers mirror the request
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
