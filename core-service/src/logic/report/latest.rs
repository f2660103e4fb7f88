use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::parser::parse_run_output;
use super::run::RunMetrics;
use crate::constants::{REPORT_EXTENSION, REPORT_PREFIX, REPORT_SIDECAR_EXTENSION};
use crate::error::{CoreError, CoreResult};
use crate::logic::config::ScoringPaths;

/// Most recent training run as served to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestRun {
    /// Report path relative to the base directory
    pub file: String,
    /// Modification time, seconds since epoch
    pub updated_at: f64,
    pub parsed_metrics: RunMetrics,
    pub raw_output: String,
}

fn no_reports() -> CoreError {
    CoreError::NotFound("No model run output files found in outputs/.".to_string())
}

fn is_report(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    name.starts_with(REPORT_PREFIX)
        && path.extension().and_then(|e| e.to_str()) == Some(REPORT_EXTENSION)
}

/// Report with the newest modification time; ties go to the later name
pub fn find_latest_report(outputs_dir: &Path) -> CoreResult<(PathBuf, SystemTime)> {
    if !outputs_dir.is_dir() {
        return Err(no_reports());
    }

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in fs::read_dir(outputs_dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_report(&path) {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        let newer = match &latest {
            Some((best_time, best_path)) => (modified, &path) > (*best_time, best_path),
            None => true,
        };
        if newer {
            latest = Some((modified, path));
        }
    }

    latest.map(|(time, path)| (path, time)).ok_or_else(no_reports)
}

/// Sidecar metrics when present and readable, otherwise parsed from text
fn read_metrics(report: &Path, raw_output: &str) -> RunMetrics {
    let sidecar = report.with_extension(REPORT_SIDECAR_EXTENSION);
    if sidecar.is_file() {
        match fs::read(&sidecar).map(|bytes| serde_json::from_slice::<RunMetrics>(&bytes)) {
            Ok(Ok(metrics)) => return metrics,
            Ok(Err(e)) => log::warn!("Ignoring unreadable sidecar {}: {}", sidecar.display(), e),
            Err(e) => log::warn!("Ignoring unreadable sidecar {}: {}", sidecar.display(), e),
        }
    }
    parse_run_output(raw_output)
}

pub fn load_latest_run(paths: &ScoringPaths) -> CoreResult<LatestRun> {
    let (path, modified) = find_latest_report(&paths.outputs_dir)?;
    let raw_output = fs::read_to_string(&path)?;

    let updated_at = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();

    Ok(LatestRun {
        file: paths.relative_display(&path),
        updated_at,
        parsed_metrics: read_metrics(&path, &raw_output),
        raw_output,
    })
}
