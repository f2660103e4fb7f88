//! Error handling

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),

    // Schema errors
    #[error("Input is missing columns required by the model: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("Column '{column}' row {row}: expected a number, got '{value}'")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    // Validation errors
    #[error("{0}")]
    Validation(String),

    // Training input errors
    #[error("Dataset {0} has no rows")]
    EmptyDataset(String),

    #[error(
        "Dataset has no '{column}' label column. Add a label or opt in with --synthetic-label-threshold"
    )]
    MissingLabel { column: String },

    #[error("Label column '{column}' row {row}: cannot interpret '{value}' as 0/1")]
    InvalidLabel {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Label column '{column}' has {positives} positive rows out of {total}; both classes are required")]
    NoLabelSignal {
        column: String,
        positives: usize,
        total: usize,
    },

    #[error("Dataset has no feature columns left after removing identifier and label columns")]
    NoFeatures,

    // Artifact errors
    #[error("Artifact schema v{found} is not supported (expected v{expected}). Retrain the model")]
    SchemaVersion { expected: u16, found: u16 },

    #[error("Artifact is corrupt: {0}")]
    CorruptArtifact(String),

    #[error("Classifier fit failed: {0}")]
    Fit(String),

    // Wrapped errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Artifact encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Artifact decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
}

impl CoreError {
    /// Schema or value problems in caller-supplied data
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            CoreError::SchemaMismatch { .. } | CoreError::InvalidValue { .. }
        )
    }

    /// Artifact exists but cannot be used by this build
    pub fn is_incompatible_artifact(&self) -> bool {
        matches!(
            self,
            CoreError::SchemaVersion { .. } | CoreError::CorruptArtifact(_) | CoreError::Decode(_)
        )
    }
}
