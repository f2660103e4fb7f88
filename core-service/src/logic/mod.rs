//! Logic Module - Business Logic & Engines
//!
//! ## Layout
//! - `dataset/` - CSV loading, typed cells, stratified split
//! - `features/` - Feature layout and fitted transformation
//! - `model/` - Classifier, fitted pipeline, artifact persistence and cache
//! - `evaluation/` - Classification report and PR-AUC
//! - `report/` - Run report writing, parsing and latest-run lookup
//! - `training/` - Batch training job
//! - `serving/` - Reconciliation, bounded predictions, model info
//! - `generator` - Synthetic transaction CSV
//! - `rules/` - Heuristic per-card checks and the suspicious-transaction report

pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod features;
pub mod generator;
pub mod model;
pub mod report;
pub mod rules;
pub mod serving;
pub mod training;

#[cfg(test)]
pub(crate) mod testing;
