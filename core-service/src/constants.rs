//! Central Configuration Constants
//!
//! Single source of truth for column roles, artifact format and defaults.
//! Paths here are defaults only; callers inject real paths via config structs.

/// Identifier column, never a feature
pub const ID_COLUMN: &str = "transaction_id";

/// Primary label column
pub const LABEL_COLUMN: &str = "is_fraud";

/// Secondary label column written by the transaction generator
pub const POTENTIAL_LABEL_COLUMN: &str = "is_potential_fraud";

/// Columns stripped from every record before it reaches the transformation
pub const NON_FEATURE_COLUMNS: &[&str] = &[ID_COLUMN, LABEL_COLUMN, POTENTIAL_LABEL_COLUMN];

/// Output column: binary fraud decision (0/1)
pub const PREDICTED_LABEL_COLUMN: &str = "predicted_is_fraud";

/// Output column: fraud probability in [0, 1]
pub const PREDICTED_PROBABILITY_COLUMN: &str = "predicted_probability";

/// Fixed decision threshold on predicted probability
pub const DECISION_THRESHOLD: f64 = 0.5;

// ============================================
// Artifact format
// ============================================

/// Leading bytes of every artifact file
pub const ARTIFACT_MAGIC: &[u8; 8] = b"FRDMODEL";

/// Artifact schema version.
/// MUST be incremented when `FittedPipeline` changes shape.
pub const ARTIFACT_SCHEMA_VERSION: u16 = 1;

// ============================================
// Run reports
// ============================================

/// File name prefix of run reports
pub const REPORT_PREFIX: &str = "model_run_";

/// Text report extension
pub const REPORT_EXTENSION: &str = "txt";

/// Structured sidecar extension
pub const REPORT_SIDECAR_EXTENSION: &str = "json";

// ============================================
// Training defaults
// ============================================

/// Seed used for the stratified split
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Share of each class held out of training (validation + test)
pub const HOLDOUT_FRACTION: f64 = 0.2;

/// Share of the holdout that becomes the test subset
pub const TEST_FRACTION_OF_HOLDOUT: f64 = 0.5;

/// Classifier iteration budget
pub const DEFAULT_MAX_ITERATIONS: u64 = 2000;

/// Column the opt-in synthetic label is derived from
pub const DEFAULT_SYNTHETIC_LABEL_COLUMN: &str = "amount";

// ============================================
// Default paths (relative to the base directory)
// ============================================

pub const DEFAULT_MODEL_PATH: &str = "ml/model.bin";
pub const DEFAULT_TRANSACTIONS_PATH: &str = "transactions.csv";
pub const DEFAULT_OUTPUTS_DIR: &str = "outputs";
pub const DEFAULT_SUSPICIOUS_REPORT_PATH: &str = "suspicious_transactions.txt";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
