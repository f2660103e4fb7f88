//! Fraud Scoring Core
//!
//! Training pipeline, model artifact and serving logic for the transaction
//! fraud classifier.
//!
//! # Architecture
//!
//! ```text
//!  transactions.csv ──► dataset ──► training ──► ml/model.bin ──► serving ──► api-server
//!                                     │                              ▲
//!                                     └──► outputs/model_run_*.txt ──┘
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{CoreError, CoreResult};
pub use logic::config::ScoringPaths;
pub use logic::dataset::{FieldValue, TransactionTable};
pub use logic::model::{ArtifactStore, FittedPipeline};
pub use logic::report::{LatestRun, RunMetrics};
pub use logic::rules::{run_check, CheckSummary};
pub use logic::serving::{ModelInfo, PredictionBatch, ScoringService};
pub use logic::training::{run_training, TrainingConfig, TrainingOutcome};
