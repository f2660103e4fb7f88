//! Feature Layout - which columns feed the model
//!
//! **This file controls the feature contract.**
//!
//! ## Rules
//! 1. Identifier and label columns are never features
//! 2. Feature order is the dataset's column order, numeric and categorical alike
//! 3. The layout hash covers the artifact schema version and every
//!    `name:kind` pair, so a reordered or retyped layout never matches

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::constants::{ARTIFACT_SCHEMA_VERSION, NON_FEATURE_COLUMNS};
use crate::error::{CoreError, CoreResult};
use crate::logic::dataset::{ColumnKind, TransactionTable};

/// One model input column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered feature columns fixed at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    pub columns: Vec<FeatureColumn>,
}

impl FeatureLayout {
    /// Partition every non-identifier, non-label column by its inferred kind
    pub fn infer(table: &TransactionTable, label_column: &str) -> CoreResult<Self> {
        let columns: Vec<FeatureColumn> = table
            .columns()
            .iter()
            .zip(table.kinds())
            .filter(|(name, _)| is_feature_column(name, label_column))
            .map(|(name, kind)| FeatureColumn {
                name: name.clone(),
                kind: *kind,
            })
            .collect();

        if columns.is_empty() {
            return Err(CoreError::NoFeatures);
        }

        Ok(Self { columns })
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &FeatureColumn> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    pub fn hash(&self) -> u32 {
        compute_layout_hash(&self.columns)
    }
}

/// True unless the column is the identifier or any label column
pub fn is_feature_column(name: &str, label_column: &str) -> bool {
    name != label_column && !NON_FEATURE_COLUMNS.contains(&name)
}

/// CRC32 over schema version and ordered `name:kind` pairs
pub fn compute_layout_hash(columns: &[FeatureColumn]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&ARTIFACT_SCHEMA_VERSION.to_le_bytes());

    for column in columns {
        hasher.update(column.name.as_bytes());
        hasher.update(b":");
        hasher.update(column.kind.as_str().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}
