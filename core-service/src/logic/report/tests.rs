use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{Local, TimeZone};
use tempfile::TempDir;

use super::latest::{find_latest_report, load_latest_run};
use super::parser::parse_run_output;
use super::run::{RunMetrics, RunReport};
use crate::error::CoreError;
use crate::logic::config::ScoringPaths;
use crate::logic::evaluation::{ClassificationReport, SplitEvaluation};

fn split(truth: &[bool], predicted: &[bool], pr_auc: Option<f64>) -> SplitEvaluation {
    SplitEvaluation {
        report: ClassificationReport::compute(truth, predicted),
        pr_auc,
    }
}

fn sample_report(test_pr_auc: Option<f64>) -> RunReport {
    RunReport {
        created_at: Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
        train_size: 800,
        validation_size: 100,
        test_size: 100,
        validation: split(&[true, false, false, false], &[true, false, false, true], Some(0.8125)),
        test: split(&[true, true, false, false], &[true, true, false, false], test_pr_auc),
        model_path: PathBuf::from("ml/model.bin"),
    }
}

fn write_with_mtime(path: &Path, body: &str, mtime: SystemTime) {
    fs::write(path, body).unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

#[test]
fn test_rendered_report_parses_back() {
    let report = sample_report(Some(1.0));
    let parsed = parse_run_output(&report.render());

    assert_eq!(parsed.train_size, Some(800));
    assert_eq!(parsed.validation_size, Some(100));
    assert_eq!(parsed.test_size, Some(100));
    assert_eq!(parsed.validation_pr_auc, Some(0.8125));
    assert_eq!(parsed.test_pr_auc, Some(1.0));
    assert_eq!(parsed.validation_accuracy, Some(0.75));
    assert_eq!(parsed.test_accuracy, Some(1.0));
    assert_eq!(parsed, report.metrics());
}

#[test]
fn test_undefined_pr_auc_is_omitted() {
    let report = sample_report(None);
    let text = report.render();
    assert!(text.contains("Test PR-AUC: NaN"));

    let parsed = parse_run_output(&text);
    assert_eq!(parsed.test_pr_auc, None);
    assert_eq!(parsed.validation_pr_auc, Some(0.8125));
}

#[test]
fn test_partial_report_omits_missing_fields() {
    let parsed = parse_run_output("Training data size: 42\nsomething else\n");
    assert_eq!(parsed.train_size, Some(42));
    assert_eq!(parsed.test_size, None);
    assert_eq!(parsed.validation_accuracy, None);

    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json, serde_json::json!({ "train_size": 42 }));
}

#[test]
fn test_write_never_overwrites() {
    let dir = TempDir::new().unwrap();
    let report = sample_report(Some(0.5));

    let first = report.write(dir.path()).unwrap();
    let second = report.write(dir.path()).unwrap();

    assert_eq!(first.file_name().unwrap(), "model_run_20240305_140709.txt");
    assert_eq!(second.file_name().unwrap(), "model_run_20240305_140709_1.txt");
    assert!(first.with_extension("json").is_file());

    let sidecar: RunMetrics =
        serde_json::from_slice(&fs::read(second.with_extension("json")).unwrap()).unwrap();
    assert_eq!(sidecar, report.metrics());
}

#[test]
fn test_latest_run_chosen_by_mtime_not_name() {
    let dir = TempDir::new().unwrap();
    let outputs = dir.path().join("outputs");
    fs::create_dir_all(&outputs).unwrap();

    let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    write_with_mtime(
        &outputs.join("model_run_20990101_000000.txt"),
        "Training data size: 1\n",
        base,
    );
    write_with_mtime(
        &outputs.join("model_run_20200101_000000.txt"),
        "Training data size: 2\n",
        base + Duration::from_secs(60),
    );
    // Not a report
    write_with_mtime(&outputs.join("notes.txt"), "x", base + Duration::from_secs(120));

    let (latest, _) = find_latest_report(&outputs).unwrap();
    assert_eq!(latest.file_name().unwrap(), "model_run_20200101_000000.txt");

    let run = load_latest_run(&ScoringPaths::under(dir.path())).unwrap();
    assert_eq!(run.file, "outputs/model_run_20200101_000000.txt");
    assert_eq!(run.parsed_metrics.train_size, Some(2));
    assert_eq!(run.updated_at, 1_700_000_060.0);
    assert_eq!(run.raw_output, "Training data size: 2\n");
}

#[test]
fn test_sidecar_preferred_over_text() {
    let dir = TempDir::new().unwrap();
    let outputs = dir.path().join("outputs");
    fs::create_dir_all(&outputs).unwrap();

    let text = outputs.join("model_run_20240101_000000.txt");
    fs::write(&text, "Training data size: 10\n").unwrap();
    fs::write(text.with_extension("json"), r#"{"train_size": 99}"#).unwrap();

    let run = load_latest_run(&ScoringPaths::under(dir.path())).unwrap();
    assert_eq!(run.parsed_metrics.train_size, Some(99));

    // Broken sidecar falls back to the text
    fs::write(text.with_extension("json"), "{not json").unwrap();
    let run = load_latest_run(&ScoringPaths::under(dir.path())).unwrap();
    assert_eq!(run.parsed_metrics.train_size, Some(10));
}

#[test]
fn test_no_reports_is_not_found() {
    let dir = TempDir::new().unwrap();
    let paths = ScoringPaths::under(dir.path());
    assert!(matches!(load_latest_run(&paths), Err(CoreError::NotFound(_))));

    fs::create_dir_all(&paths.outputs_dir).unwrap();
    match load_latest_run(&paths) {
        Err(CoreError::NotFound(msg)) => assert!(msg.contains("No model run output files")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}
