//! Evaluation Module - held-out split metrics

pub mod metrics;


pub use metrics::{average_precision, evaluate, ClassMetrics, ClassificationReport, SplitEvaluation};
