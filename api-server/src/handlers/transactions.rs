//! Transactions handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use fraud_core::PredictionBatch;
use validator::Validate;

use super::BulkQuery;
use crate::{AppResult, AppState};

/// Transactions with predictions, bounded by `limit`
pub async fn with_predictions(
    State(state): State<AppState>,
    query: Result<Query<BulkQuery>, QueryRejection>,
) -> AppResult<Json<PredictionBatch>> {
    let Query(query) = query?;
    query.validate()?;

    let service = state.service.clone();
    let batch = tokio::task::spawn_blocking(move || service.predict_bulk(query.limit)).await??;
    tracing::debug!(count = batch.count, "Scored transactions");
    Ok(Json(batch))
}
