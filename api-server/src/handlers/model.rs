//! Model handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use fraud_core::{LatestRun, ModelInfo, PredictionBatch};
use validator::Validate;

use super::SampleQuery;
use crate::{AppResult, AppState};

/// Latest training run report
pub async fn latest_run(State(state): State<AppState>) -> AppResult<Json<LatestRun>> {
    let service = state.service.clone();
    let run = tokio::task::spawn_blocking(move || service.latest_run()).await??;
    Ok(Json(run))
}

/// First rows of the transaction file with predictions
pub async fn predict_sample(
    State(state): State<AppState>,
    query: Result<Query<SampleQuery>, QueryRejection>,
) -> AppResult<Json<PredictionBatch>> {
    let Query(query) = query?;
    query.validate()?;

    let service = state.service.clone();
    let batch = tokio::task::spawn_blocking(move || service.predict_sample(query.limit)).await??;
    Ok(Json(batch))
}

/// Metadata of the cached artifact
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let service = state.service.clone();
    let info = tokio::task::spawn_blocking(move || service.model_info()).await??;
    Ok(Json(info))
}

/// Re-read the artifact from disk
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let service = state.service.clone();
    let info = tokio::task::spawn_blocking(move || service.reload()).await??;
    tracing::info!(
        trained_at = info.trained_at,
        layout_hash = %info.layout_hash,
        "Model artifact reloaded"
    );
    Ok(Json(info))
}
