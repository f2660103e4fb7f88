//! Fitted Feature Transformation
//!
//! Numeric columns are standardised with population mean and deviation
//! fitted on the training rows. Categorical columns are one-hot encoded over
//! a sorted vocabulary fitted on the same rows. Output order is all numeric
//! columns, then every categorical block.
//!
//! Missing numeric cells take the fitted mean (0 after scaling). Missing and
//! unseen categories encode to all zeros.

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::layout::FeatureLayout;
use crate::error::{CoreError, CoreResult};
use crate::logic::dataset::record::parse_number;
use crate::logic::dataset::{ColumnKind, TransactionTable};

/// Deviation below which a column is treated as constant
const MIN_SCALE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericScaler {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
}

impl NumericScaler {
    pub fn fit(column: &str, values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                column: column.to_string(),
                mean: 0.0,
                scale: 1.0,
            };
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        Self {
            column: column.to_string(),
            mean,
            scale: if std < MIN_SCALE { 1.0 } else { std },
        }
    }

    pub fn apply(&self, value: Option<f64>) -> f64 {
        match value {
            Some(x) => (x - self.mean) / self.scale,
            None => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    pub column: String,
    /// Sorted, unique
    pub categories: Vec<String>,
}

impl CategoryEncoder {
    pub fn fit<'a>(column: &str, values: impl Iterator<Item = &'a str>) -> Self {
        let categories: BTreeSet<&str> = values.collect();
        Self {
            column: column.to_string(),
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }

    /// Slot of a category; `None` for unseen values
    pub fn position(&self, value: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn width(&self) -> usize {
        self.categories.len()
    }
}

/// Transformation parameters carried inside the artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTransform {
    pub numeric: Vec<NumericScaler>,
    pub categorical: Vec<CategoryEncoder>,
}

impl FeatureTransform {
    /// Fit on `rows` of `table` only
    pub fn fit(table: &TransactionTable, layout: &FeatureLayout, rows: &[usize]) -> CoreResult<Self> {
        let mut numeric = Vec::new();
        for feature in layout.of_kind(ColumnKind::Numeric) {
            let col = column_index(table, &feature.name)?;
            let mut values = Vec::with_capacity(rows.len());
            for &row in rows {
                if let Some(raw) = table.cell(row, col) {
                    values.push(parse_cell(&feature.name, row, raw)?);
                }
            }
            numeric.push(NumericScaler::fit(&feature.name, &values));
        }

        let mut categorical = Vec::new();
        for feature in layout.of_kind(ColumnKind::Categorical) {
            let col = column_index(table, &feature.name)?;
            let values = rows.iter().filter_map(|&row| table.cell(row, col));
            categorical.push(CategoryEncoder::fit(&feature.name, values));
        }

        Ok(Self {
            numeric,
            categorical,
        })
    }

    /// Columns the transformation reads, numeric first
    pub fn input_columns(&self) -> Vec<&str> {
        self.numeric
            .iter()
            .map(|s| s.column.as_str())
            .chain(self.categorical.iter().map(|e| e.column.as_str()))
            .collect()
    }

    /// Expected columns absent from `table`
    pub fn missing_columns(&self, table: &TransactionTable) -> Vec<String> {
        self.input_columns()
            .into_iter()
            .filter(|c| !table.has_column(c))
            .map(str::to_string)
            .collect()
    }

    pub fn output_width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(CategoryEncoder::width).sum::<usize>()
    }

    /// Names of the encoded columns, `column=category` for one-hot slots
    pub fn output_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.numeric.iter().map(|s| s.column.clone()).collect();
        for encoder in &self.categorical {
            for category in &encoder.categories {
                names.push(format!("{}={}", encoder.column, category));
            }
        }
        names
    }

    /// Encode every row of `table`. Extra columns are ignored.
    pub fn transform(&self, table: &TransactionTable) -> CoreResult<Array2<f64>> {
        let missing = self.missing_columns(table);
        if !missing.is_empty() {
            return Err(CoreError::SchemaMismatch { missing });
        }

        let mut out = Array2::<f64>::zeros((table.len(), self.output_width()));

        for (slot, scaler) in self.numeric.iter().enumerate() {
            let col = column_index(table, &scaler.column)?;
            for row in 0..table.len() {
                let value = match table.cell(row, col) {
                    Some(raw) => Some(parse_cell(&scaler.column, row, raw)?),
                    None => None,
                };
                out[[row, slot]] = scaler.apply(value);
            }
        }

        let mut offset = self.numeric.len();
        for encoder in &self.categorical {
            let col = column_index(table, &encoder.column)?;
            for row in 0..table.len() {
                if let Some(pos) = table.cell(row, col).and_then(|raw| encoder.position(raw)) {
                    out[[row, offset + pos]] = 1.0;
                }
            }
            offset += encoder.width();
        }

        Ok(out)
    }
}

fn column_index(table: &TransactionTable, name: &str) -> CoreResult<usize> {
    table.column_index(name).ok_or_else(|| CoreError::SchemaMismatch {
        missing: vec![name.to_string()],
    })
}

fn parse_cell(column: &str, row: usize, raw: &str) -> CoreResult<f64> {
    parse_number(raw).ok_or_else(|| CoreError::InvalidValue {
        column: column.to_string(),
        row,
        value: raw.to_string(),
    })
}
