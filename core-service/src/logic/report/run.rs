use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::{REPORT_EXTENSION, REPORT_PREFIX, REPORT_SIDECAR_EXTENSION};
use crate::error::CoreResult;
use crate::logic::evaluation::SplitEvaluation;

/// Key metrics of one training run. Absent fields were not recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_pr_auc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_pr_auc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_accuracy: Option<f64>,
}

/// Everything one training run reports
#[derive(Debug, Clone)]
pub struct RunReport {
    pub created_at: DateTime<Local>,
    pub train_size: usize,
    pub validation_size: usize,
    pub test_size: usize,
    pub validation: SplitEvaluation,
    pub test: SplitEvaluation,
    pub model_path: PathBuf,
}

impl RunReport {
    /// Human-readable report; `report::parser` reads this layout back
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Training data size: {}\n", self.train_size));
        out.push_str(&format!("Validation data size: {}\n", self.validation_size));
        out.push_str(&format!("Testing data size: {}\n", self.test_size));

        out.push_str("\nValidation metrics\n");
        out.push_str(&self.validation.report.render());
        out.push_str(&format!("Validation PR-AUC: {}\n", format_pr_auc(self.validation.pr_auc)));

        out.push_str("\nTest metrics\n");
        out.push_str(&self.test.report.render());
        out.push_str(&format!("Test PR-AUC: {}\n", format_pr_auc(self.test.pr_auc)));

        out.push_str(&format!("Saved model to {}\n", self.model_path.display()));
        out
    }

    pub fn metrics(&self) -> RunMetrics {
        RunMetrics {
            train_size: Some(self.train_size as u64),
            validation_size: Some(self.validation_size as u64),
            test_size: Some(self.test_size as u64),
            validation_pr_auc: self.validation.pr_auc,
            test_pr_auc: self.test.pr_auc,
            validation_accuracy: Some(self.validation.report.accuracy),
            test_accuracy: Some(self.test.report.accuracy),
        }
    }

    /// Write `model_run_<ts>.txt` plus its JSON sidecar; never overwrites an
    /// existing report
    pub fn write(&self, outputs_dir: &Path) -> CoreResult<PathBuf> {
        fs::create_dir_all(outputs_dir)?;

        let stamp = self.created_at.format("%Y%m%d_%H%M%S").to_string();
        let text = self.render();
        let (path, mut file) = create_unique(outputs_dir, &stamp)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;

        let sidecar = path.with_extension(REPORT_SIDECAR_EXTENSION);
        fs::write(&sidecar, serde_json::to_vec_pretty(&self.metrics())?)?;

        log::info!("Run report written to {}", path.display());
        Ok(path)
    }
}

fn format_pr_auc(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "NaN".to_string(),
    }
}

fn create_unique(dir: &Path, stamp: &str) -> CoreResult<(PathBuf, fs::File)> {
    let mut attempt = 0usize;
    loop {
        let stem = if attempt == 0 {
            format!("{}{}", REPORT_PREFIX, stamp)
        } else {
            format!("{}{}_{}", REPORT_PREFIX, stamp, attempt)
        };
        let path = dir.join(format!("{}.{}", stem, REPORT_EXTENSION));

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
