//! Model Module - Fitted pipeline and artifact lifecycle
//!
//! created (training) → persisted (`artifact`) → cached (`store`) → superseded
//! by the next training run.

pub mod artifact;
pub mod classifier;
pub mod pipeline;
pub mod store;

#[cfg(test)]
mod tests;

// Re-export common types
pub use artifact::{decode_artifact, encode_artifact, load_artifact, save_artifact};
pub use classifier::LogisticParams;
pub use pipeline::{FittedPipeline, Prediction};
pub use store::ArtifactStore;
