//! Report Module - training run reports
//!
//! Training writes `model_run_<ts>.txt` and a `.json` sidecar per run;
//! serving reads back whichever report was modified last.

pub mod latest;
pub mod parser;
pub mod run;

#[cfg(test)]
mod tests;

pub use latest::{find_latest_report, load_latest_run, LatestRun};
pub use parser::parse_run_output;
pub use run::{RunMetrics, RunReport};
