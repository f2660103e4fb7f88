//! Features Module - Feature layout and fitted transformation
//!
//! `layout` decides which columns are features; `transform` turns those
//! columns into the numeric matrix the classifier reads.

pub mod layout;
pub mod transform;


// Re-export common types
pub use layout::{compute_layout_hash, is_feature_column, FeatureColumn, FeatureLayout};
pub use transform::{CategoryEncoder, FeatureTransform, NumericScaler};
