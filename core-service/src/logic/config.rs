//! Path configuration shared by training and serving.
//!
//! Every path is injected at startup; nothing reads module-level locations.

use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_MODEL_PATH, DEFAULT_OUTPUTS_DIR, DEFAULT_TRANSACTIONS_PATH};

/// Locations of the artifact, the transaction data and the run reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringPaths {
    /// Base directory; report paths in responses are relative to it
    pub base_dir: PathBuf,

    /// Fitted pipeline artifact
    pub model_path: PathBuf,

    /// Transaction CSV scored by the serving layer
    pub transactions_path: PathBuf,

    /// Directory holding `model_run_*.txt` reports
    pub outputs_dir: PathBuf,
}

impl ScoringPaths {
    /// Default layout under a base directory
    pub fn under(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            model_path: base_dir.join(DEFAULT_MODEL_PATH),
            transactions_path: base_dir.join(DEFAULT_TRANSACTIONS_PATH),
            outputs_dir: base_dir.join(DEFAULT_OUTPUTS_DIR),
            base_dir,
        }
    }

    /// Override individual paths; relative overrides resolve against `base_dir`
    pub fn with_overrides(
        mut self,
        model_path: Option<PathBuf>,
        transactions_path: Option<PathBuf>,
        outputs_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(p) = model_path {
            self.model_path = self.resolve(p);
        }
        if let Some(p) = transactions_path {
            self.transactions_path = self.resolve(p);
        }
        if let Some(p) = outputs_dir {
            self.outputs_dir = self.resolve(p);
        }
        self
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        }
    }

    /// Display a path relative to `base_dir` when possible
    pub fn relative_display(&self, path: &Path) -> String {
        path.strip_prefix(&self.base_dir)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
