//! Dataset Module - Transaction CSV loading
//!
//! Reads the header-first transaction CSV into a typed table.
//! Column kinds are inferred once over the whole file and kept on every
//! row subset, so a split never re-types a column.

pub mod record;
pub mod split;
pub mod table;


pub use record::{ColumnKind, FieldValue};
pub use split::{stratified_holdout, stratified_split, SplitIndices};
pub use table::TransactionTable;
