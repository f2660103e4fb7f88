use crate::constants::NON_FEATURE_COLUMNS;
use crate::error::{CoreError, CoreResult};
use crate::logic::dataset::TransactionTable;
use crate::logic::model::FittedPipeline;

/// Strip identifier and label columns (when present) and check that every
/// column the pipeline reads is there
pub fn reconcile(table: &TransactionTable, pipeline: &FittedPipeline) -> CoreResult<TransactionTable> {
    let mut dropped: Vec<&str> = NON_FEATURE_COLUMNS.to_vec();
    dropped.push(&pipeline.label_column);

    let features = table.drop_columns(&dropped);
    let missing = pipeline.transform.missing_columns(&features);
    if !missing.is_empty() {
        return Err(CoreError::SchemaMismatch { missing });
    }

    Ok(features)
}
