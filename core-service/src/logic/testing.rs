//! Shared fixtures for unit tests

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

use crate::constants::POTENTIAL_LABEL_COLUMN;
use crate::logic::config::ScoringPaths;
use crate::logic::generator::{write_transactions_csv, GeneratorConfig};
use crate::logic::training::{run_training, TrainingConfig, TrainingOutcome};

struct TrainedWorkspace {
    _dir: TempDir,
    paths: ScoringPaths,
    outcome: TrainingOutcome,
}

/// Trained once per test binary; read-only
static TRAINED: Lazy<TrainedWorkspace> = Lazy::new(|| {
    let dir = TempDir::new().unwrap();
    let paths = ScoringPaths::under(dir.path());
    write_dataset(dir.path(), 1000, 7);

    let mut config = TrainingConfig::new(&paths.transactions_path, &paths.model_path);
    config.outputs_dir = Some(paths.outputs_dir.clone());
    config.label_column = POTENTIAL_LABEL_COLUMN.to_string();

    let outcome = run_training(&config).unwrap();
    TrainedWorkspace {
        _dir: dir,
        paths,
        outcome,
    }
});

pub fn generator_config(rows: usize, seed: u64) -> GeneratorConfig {
    GeneratorConfig {
        rows,
        seed,
        anchor: NaiveDate::from_ymd_opt(2025, 1, 31)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    }
}

/// Generated dataset at `<dir>/transactions.csv`
pub fn write_dataset(dir: &Path, rows: usize, seed: u64) -> PathBuf {
    let path = dir.join("transactions.csv");
    write_transactions_csv(&generator_config(rows, seed), &path).unwrap();
    path
}

/// Dataset, artifact and run report laid out the way serving expects.
/// Tests must not modify these files; use [`copied_workspace`] instead.
pub fn shared_workspace() -> (&'static ScoringPaths, &'static TrainingOutcome) {
    (&TRAINED.paths, &TRAINED.outcome)
}

/// Private copy of the shared dataset and artifact under `dir`
pub fn copied_workspace(dir: &Path) -> ScoringPaths {
    let source = &TRAINED.paths;
    let paths = ScoringPaths::under(dir);

    if let Some(parent) = paths.model_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::copy(&source.transactions_path, &paths.transactions_path).unwrap();
    fs::copy(&source.model_path, &paths.model_path).unwrap();
    paths
}
