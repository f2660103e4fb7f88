//! Training Module - batch fit of the fraud pipeline
//!
//! ```text
//! CSV ──► labels ──► stratified split ──► fit (train rows) ──► evaluate
//!                                                               │
//!                               report + sidecar ◄── artifact ◄─┘
//! ```
//!
//! The artifact is written only after fit and evaluation succeed.

use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_ITERATIONS, DEFAULT_SPLIT_SEED, LABEL_COLUMN};
use crate::error::{CoreError, CoreResult};
use crate::logic::dataset::record::parse_number;
use crate::logic::dataset::{stratified_split, TransactionTable};
use crate::logic::evaluation::evaluate;
use crate::logic::features::FeatureLayout;
use crate::logic::model::{save_artifact, FittedPipeline};
use crate::logic::report::RunReport;

#[cfg(test)]
mod tests;

/// Opt-in rule `column > threshold` used when the label column is absent
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticLabel {
    pub column: String,
    pub threshold: f64,
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    /// Where run reports go; `None` skips the report
    pub outputs_dir: Option<PathBuf>,
    pub label_column: String,
    pub synthetic_label: Option<SyntheticLabel>,
    pub seed: u64,
    pub max_iterations: u64,
}

impl TrainingConfig {
    pub fn new(dataset_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            model_path: model_path.into(),
            outputs_dir: None,
            label_column: LABEL_COLUMN.to_string(),
            synthetic_label: None,
            seed: DEFAULT_SPLIT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug)]
pub struct TrainingOutcome {
    pub artifact_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub report: RunReport,
    pub pipeline: FittedPipeline,
}

pub fn run_training(config: &TrainingConfig) -> CoreResult<TrainingOutcome> {
    log::info!("Loading dataset from {}", config.dataset_path.display());
    let mut table = TransactionTable::from_path(&config.dataset_path)?;
    if table.is_empty() {
        return Err(CoreError::EmptyDataset(
            config.dataset_path.display().to_string(),
        ));
    }

    let labels = resolve_labels(&mut table, config)?;
    let positives = labels.iter().filter(|l| **l).count();
    if positives == 0 || positives == labels.len() {
        return Err(CoreError::NoLabelSignal {
            column: config.label_column.clone(),
            positives,
            total: labels.len(),
        });
    }

    let split = stratified_split(&labels, config.seed);
    let (train_size, validation_size, test_size) = split.sizes();
    log::info!(
        "Split {} rows ({} positive): train {}, validation {}, test {}",
        labels.len(),
        positives,
        train_size,
        validation_size,
        test_size
    );

    let layout = FeatureLayout::infer(&table, &config.label_column)?;
    log::info!("Features: {}", layout.names().join(", "));

    let pipeline = FittedPipeline::fit(
        &table,
        layout,
        &split.train,
        &labels,
        &config.label_column,
        config.max_iterations,
    )?;

    let validation = evaluate(
        &pipeline,
        &table.select_rows(&split.validation),
        &pick(&labels, &split.validation),
    )?;
    let test = evaluate(
        &pipeline,
        &table.select_rows(&split.test),
        &pick(&labels, &split.test),
    )?;
    log::info!(
        "Validation accuracy {:.4}, test accuracy {:.4}",
        validation.report.accuracy,
        test.report.accuracy
    );

    save_artifact(&pipeline, &config.model_path)?;

    let report = RunReport {
        created_at: chrono::Local::now(),
        train_size,
        validation_size,
        test_size,
        validation,
        test,
        model_path: config.model_path.clone(),
    };

    let report_path = match &config.outputs_dir {
        Some(dir) => Some(report.write(dir)?),
        None => None,
    };

    Ok(TrainingOutcome {
        artifact_path: config.model_path.clone(),
        report_path,
        report,
        pipeline,
    })
}

fn pick(labels: &[bool], rows: &[usize]) -> Vec<bool> {
    rows.iter().map(|&i| labels[i]).collect()
}

/// Read the label column, or derive it when the caller opted in.
/// A derived label is appended to `table` under the label column name.
fn resolve_labels(table: &mut TransactionTable, config: &TrainingConfig) -> CoreResult<Vec<bool>> {
    let column = &config.label_column;

    if let Some(col) = table.column_index(column) {
        return (0..table.len())
            .map(|row| {
                let raw = table.cell(row, col).unwrap_or_default();
                parse_label(raw).ok_or_else(|| CoreError::InvalidLabel {
                    column: column.clone(),
                    row,
                    value: raw.to_string(),
                })
            })
            .collect();
    }

    let Some(rule) = &config.synthetic_label else {
        return Err(CoreError::MissingLabel {
            column: column.clone(),
        });
    };

    let source = table
        .column_index(&rule.column)
        .ok_or_else(|| CoreError::SchemaMismatch {
            missing: vec![rule.column.clone()],
        })?;

    log::warn!(
        "Label column '{}' not found; deriving it as {} > {}",
        column,
        rule.column,
        rule.threshold
    );

    let mut labels = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let label = match table.cell(row, source) {
            None => false,
            Some(raw) => {
                parse_number(raw).ok_or_else(|| CoreError::InvalidValue {
                    column: rule.column.clone(),
                    row,
                    value: raw.to_string(),
                })? > rule.threshold
            }
        };
        labels.push(label);
    }

    let cells = labels.iter().map(|l| (*l as u8).to_string()).collect();
    table.push_column(column, cells);
    Ok(labels)
}

/// `0/1`, `true/false`, or any number (non-zero is positive)
pub fn parse_label(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        other => parse_number(other).map(|v| v != 0.0),
    }
}
