use std::fs;

use tempfile::TempDir;

use super::{parse_label, run_training, SyntheticLabel, TrainingConfig};
use crate::error::CoreError;
use crate::logic::model::load_artifact;
use crate::logic::report::parse_run_output;
use crate::logic::testing::{shared_workspace, write_dataset};

fn threshold_csv() -> String {
    let mut csv = String::from("transaction_id,merchant,amount\n");
    for i in 0..50 {
        let amount = if i % 5 == 0 { 1500 + i } else { 10 + i };
        csv.push_str(&format!("{},M{},{}\n", i, i % 4, amount));
    }
    csv
}

#[test]
fn test_training_writes_artifact_and_report() {
    let (paths, outcome) = shared_workspace();

    assert!(paths.model_path.is_file());
    assert_eq!(outcome.artifact_path, paths.model_path);
    let loaded = load_artifact(&paths.model_path).unwrap();
    assert_eq!(loaded, outcome.pipeline);

    // Identifier and both label columns never become features
    let features = outcome.pipeline.feature_columns();
    assert_eq!(
        features,
        vec!["card_number", "timestamp", "merchant", "location", "amount"]
    );

    let report = &outcome.report;
    assert_eq!(report.train_size + report.validation_size + report.test_size, 1000);
    assert!((report.validation_size as i64 - 100).abs() <= 2);
    assert!((report.test_size as i64 - 100).abs() <= 2);

    let report_path = outcome.report_path.as_ref().unwrap();
    let text = fs::read_to_string(report_path).unwrap();
    assert!(text.contains(&format!("Saved model to {}", paths.model_path.display())));
    let parsed = parse_run_output(&text);
    assert_eq!(parsed.train_size, Some(report.train_size as u64));
    assert_eq!(parsed.validation_size, Some(report.validation_size as u64));
    assert_eq!(parsed.test_size, Some(report.test_size as u64));
    let accuracy = parsed.test_accuracy.unwrap();
    assert!((accuracy - report.test.report.accuracy).abs() < 1e-4);
    assert!(parsed.validation_pr_auc.is_some());
    assert!(report_path.with_extension("json").is_file());
}

#[test]
fn test_missing_label_fails_without_opt_in() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(dir.path(), 200, 1);
    let model = dir.path().join("ml").join("model.bin");

    // Generated data only carries is_potential_fraud
    let config = TrainingConfig::new(&dataset, &model);
    match run_training(&config) {
        Err(CoreError::MissingLabel { column }) => assert_eq!(column, "is_fraud"),
        other => panic!("expected MissingLabel, got {:?}", other.map(|_| ())),
    }
    assert!(!model.exists());
}

#[test]
fn test_synthetic_label_with_opt_in() {
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("tx.csv");
    fs::write(&dataset, threshold_csv()).unwrap();

    let mut config = TrainingConfig::new(&dataset, dir.path().join("model.bin"));
    config.synthetic_label = Some(SyntheticLabel {
        column: "amount".to_string(),
        threshold: 1000.0,
    });

    let outcome = run_training(&config).unwrap();
    // Source column stays a feature; derived label does not
    assert_eq!(outcome.pipeline.feature_columns(), vec!["merchant", "amount"]);
    assert_eq!(outcome.pipeline.label_column, "is_fraud");
    assert!(outcome.report_path.is_none());
}

#[test]
fn test_single_class_has_no_signal() {
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("tx.csv");
    fs::write(&dataset, "amount,is_fraud\n1,0\n2,0\n3,0\n").unwrap();

    let config = TrainingConfig::new(&dataset, dir.path().join("model.bin"));
    match run_training(&config) {
        Err(CoreError::NoLabelSignal { positives, total, .. }) => {
            assert_eq!(positives, 0);
            assert_eq!(total, 3);
        }
        other => panic!("expected NoLabelSignal, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unparseable_label_is_rejected() {
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("tx.csv");
    fs::write(&dataset, "amount,is_fraud\n1,0\n2,maybe\n").unwrap();

    let config = TrainingConfig::new(&dataset, dir.path().join("model.bin"));
    match run_training(&config) {
        Err(CoreError::InvalidLabel { row, value, .. }) => {
            assert_eq!(row, 1);
            assert_eq!(value, "maybe");
        }
        other => panic!("expected InvalidLabel, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_empty_and_missing_datasets() {
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("tx.csv");
    let config = TrainingConfig::new(&dataset, dir.path().join("model.bin"));

    assert!(matches!(run_training(&config), Err(CoreError::NotFound(_))));

    fs::write(&dataset, "amount,is_fraud\n").unwrap();
    assert!(matches!(run_training(&config), Err(CoreError::EmptyDataset(_))));
}

#[test]
fn test_label_values() {
    assert_eq!(parse_label("1"), Some(true));
    assert_eq!(parse_label("0"), Some(false));
    assert_eq!(parse_label("TRUE"), Some(true));
    assert_eq!(parse_label("false"), Some(false));
    assert_eq!(parse_label("2.5"), Some(true));
    assert_eq!(parse_label("0.0"), Some(false));
    assert_eq!(parse_label("yes"), None);
    assert_eq!(parse_label(""), None);
}
