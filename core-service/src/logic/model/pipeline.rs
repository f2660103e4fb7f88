//! Fitted Pipeline - transformation + classifier as one unit

use serde::{Deserialize, Serialize};

use super::classifier::LogisticParams;
use crate::constants::{ARTIFACT_SCHEMA_VERSION, DECISION_THRESHOLD};
use crate::error::{CoreError, CoreResult};
use crate::logic::dataset::TransactionTable;
use crate::logic::features::{FeatureLayout, FeatureTransform};

/// One scored row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub is_fraud: bool,
    pub probability: f64,
}

/// Everything needed to score a transaction, as persisted in the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub schema_version: u16,
    pub label_column: String,
    pub layout: FeatureLayout,
    pub layout_hash: u32,
    pub transform: FeatureTransform,
    pub classifier: LogisticParams,
    /// Unix timestamp
    pub trained_at: i64,
    pub training_rows: usize,
}

impl FittedPipeline {
    /// Fit transformation and classifier on `rows` of `table` only
    pub fn fit(
        table: &TransactionTable,
        layout: FeatureLayout,
        rows: &[usize],
        labels: &[bool],
        label_column: &str,
        max_iterations: u64,
    ) -> CoreResult<Self> {
        let transform = FeatureTransform::fit(table, &layout, rows)?;
        let x = transform.transform(&table.select_rows(rows))?;
        let y: Vec<bool> = rows.iter().map(|&i| labels[i]).collect();
        let classifier = LogisticParams::fit(&x, &y, max_iterations)?;

        Ok(Self {
            schema_version: ARTIFACT_SCHEMA_VERSION,
            label_column: label_column.to_string(),
            layout_hash: layout.hash(),
            layout,
            transform,
            classifier,
            trained_at: chrono::Utc::now().timestamp(),
            training_rows: rows.len(),
        })
    }

    pub fn feature_columns(&self) -> Vec<String> {
        self.layout.names()
    }

    /// Reject parameters whose shape disagrees with the stored layout
    pub fn verify_layout(&self) -> CoreResult<()> {
        let actual = self.layout.hash();
        if actual != self.layout_hash {
            return Err(CoreError::CorruptArtifact(format!(
                "feature layout hash {:08x} does not match recorded {:08x}",
                actual, self.layout_hash
            )));
        }

        if self.transform.output_width() != self.classifier.width() {
            return Err(CoreError::CorruptArtifact(format!(
                "transformation emits {} features but classifier expects {}",
                self.transform.output_width(),
                self.classifier.width()
            )));
        }

        Ok(())
    }

    /// P(fraud) per row
    pub fn predict_proba(&self, table: &TransactionTable) -> CoreResult<Vec<f64>> {
        let x = self.transform.transform(table)?;
        Ok(x.rows()
            .into_iter()
            .map(|row| self.classifier.probability(row))
            .collect())
    }

    /// Decision and probability from the same encoded row
    pub fn predict(&self, table: &TransactionTable) -> CoreResult<Vec<Prediction>> {
        Ok(self
            .predict_proba(table)?
            .into_iter()
            .map(|probability| Prediction {
                is_fraud: probability >= DECISION_THRESHOLD,
                probability,
            })
            .collect())
    }
}
