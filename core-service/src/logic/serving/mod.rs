//! Serving Module - predictions and run metadata for the query API
//!
//! Every operation is synchronous and blocking (file reads, matrix work);
//! async callers run them on a blocking thread.

pub mod bounds;
pub mod reconcile;


use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::constants::{PREDICTED_LABEL_COLUMN, PREDICTED_PROBABILITY_COLUMN};
use crate::error::CoreResult;
use crate::logic::config::ScoringPaths;
use crate::logic::dataset::TransactionTable;
use crate::logic::model::{ArtifactStore, FittedPipeline};
use crate::logic::report::{load_latest_run, LatestRun};

pub use bounds::{LimitRange, BULK_LIMIT, SAMPLE_LIMIT};
pub use reconcile::reconcile;

/// Scored rows in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionBatch {
    pub count: usize,
    pub rows: Vec<Map<String, Value>>,
}

/// Metadata of the loaded artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub schema_version: u16,
    pub label_column: String,
    pub feature_columns: Vec<String>,
    pub layout_hash: String,
    pub trained_at: i64,
    pub training_rows: usize,
    pub model_path: String,
}

pub struct ScoringService {
    paths: ScoringPaths,
    store: ArtifactStore,
}

impl ScoringService {
    pub fn new(paths: ScoringPaths) -> Self {
        Self {
            store: ArtifactStore::new(paths.model_path.clone()),
            paths,
        }
    }

    /// First `limit` rows (1-100, default 10) with predictions
    pub fn predict_sample(&self, limit: Option<i64>) -> CoreResult<PredictionBatch> {
        self.predict_head(SAMPLE_LIMIT, limit)
    }

    /// First `limit` rows (1-5000, default 200) with predictions
    pub fn predict_bulk(&self, limit: Option<i64>) -> CoreResult<PredictionBatch> {
        self.predict_head(BULK_LIMIT, limit)
    }

    fn predict_head(&self, range: LimitRange, limit: Option<i64>) -> CoreResult<PredictionBatch> {
        let limit = range.check(limit)?;
        let pipeline = self.store.get()?;
        let table = TransactionTable::head_from_path(&self.paths.transactions_path, limit)?;
        score_table(&pipeline, &table)
    }

    pub fn latest_run(&self) -> CoreResult<LatestRun> {
        load_latest_run(&self.paths)
    }

    pub fn model_info(&self) -> CoreResult<ModelInfo> {
        let pipeline = self.store.get()?;
        Ok(self.describe(&pipeline))
    }

    /// Re-read the artifact; the previous one stays cached on failure
    pub fn reload(&self) -> CoreResult<ModelInfo> {
        let pipeline = self.store.reload()?;
        Ok(self.describe(&pipeline))
    }

    fn describe(&self, pipeline: &FittedPipeline) -> ModelInfo {
        ModelInfo {
            schema_version: pipeline.schema_version,
            label_column: pipeline.label_column.clone(),
            feature_columns: pipeline.feature_columns(),
            layout_hash: format!("{:08x}", pipeline.layout_hash),
            trained_at: pipeline.trained_at,
            training_rows: pipeline.training_rows,
            model_path: self.paths.relative_display(self.store.path()),
        }
    }
}

/// Each row of `table` (all original columns, in order) plus the decision
/// and probability
pub fn score_table(pipeline: &FittedPipeline, table: &TransactionTable) -> CoreResult<PredictionBatch> {
    let features = reconcile(table, pipeline)?;
    let predictions = pipeline.predict(&features)?;

    let rows: Vec<Map<String, Value>> = predictions
        .iter()
        .enumerate()
        .map(|(row, prediction)| {
            let mut record = table.record(row);
            record.insert(
                PREDICTED_LABEL_COLUMN.to_string(),
                json!(prediction.is_fraud as u8),
            );
            record.insert(
                PREDICTED_PROBABILITY_COLUMN.to_string(),
                json!(prediction.probability),
            );
            record
        })
        .collect();

    log::debug!("Scored {} rows", rows.len());
    Ok(PredictionBatch {
        count: rows.len(),
        rows,
    })
}
