use std::fs;

use tempfile::TempDir;

use super::artifact::{decode_artifact, encode_artifact, load_artifact, save_artifact};
use super::classifier::balanced_rows;
use super::pipeline::FittedPipeline;
use super::store::ArtifactStore;
use crate::constants::ARTIFACT_SCHEMA_VERSION;
use crate::error::CoreError;
use crate::logic::dataset::TransactionTable;
use crate::logic::features::FeatureLayout;

/// 60 rows; fraud iff amount is large, merchant mostly follows the label
fn training_table() -> (TransactionTable, Vec<bool>) {
    let mut csv = String::from("transaction_id,merchant,amount,is_fraud\n");
    let mut labels = Vec::new();
    for i in 0..60 {
        let fraud = i % 6 == 0;
        let amount = if fraud { 900 + i } else { 20 + i };
        let merchant = if fraud { "GiftCards" } else { ["Shell", "Target", "Amazon"][i % 3] };
        csv.push_str(&format!("{},{},{},{}\n", i, merchant, amount, fraud as u8));
        labels.push(fraud);
    }
    (TransactionTable::from_reader(csv.as_bytes()).unwrap(), labels)
}

fn fitted() -> FittedPipeline {
    let (table, labels) = training_table();
    let layout = FeatureLayout::infer(&table, "is_fraud").unwrap();
    let rows: Vec<usize> = (0..table.len()).collect();
    FittedPipeline::fit(&table, layout, &rows, &labels, "is_fraud", 500).unwrap()
}

fn scoring_table(csv: &str) -> TransactionTable {
    TransactionTable::from_reader(csv.as_bytes()).unwrap()
}

#[test]
fn test_balanced_rows_replicate_minority() {
    let rows = balanced_rows(&[true, false, false, false, false]);
    assert_eq!(rows.len(), 8);
    assert_eq!(rows.iter().filter(|&&i| i == 0).count(), 4);

    // Single class: untouched
    assert_eq!(balanced_rows(&[false, false]), vec![0, 1]);
}

#[test]
fn test_fit_orients_probability_towards_fraud() {
    let pipeline = fitted();
    let table = scoring_table("merchant,amount\nGiftCards,950\nShell,25\n");
    let probs = pipeline.predict_proba(&table).unwrap();

    assert!(probs[0] > 0.5, "fraud-like row scored {}", probs[0]);
    assert!(probs[1] < 0.5, "normal row scored {}", probs[1]);
    assert_eq!(pipeline.schema_version, ARTIFACT_SCHEMA_VERSION);
    assert_eq!(pipeline.feature_columns(), vec!["merchant", "amount"]);
    assert_eq!(pipeline.training_rows, 60);
}

#[test]
fn test_predict_matches_probability() {
    let pipeline = fitted();
    let table = scoring_table("merchant,amount\nGiftCards,950\nShell,25\nTarget,400\n");
    let probs = pipeline.predict_proba(&table).unwrap();
    let predictions = pipeline.predict(&table).unwrap();

    for (p, prediction) in probs.iter().zip(&predictions) {
        assert_eq!(prediction.probability, *p);
        assert_eq!(prediction.is_fraud, *p >= 0.5);
    }
}

#[test]
fn test_unseen_category_scores_in_range() {
    let pipeline = fitted();
    let table = scoring_table("merchant,amount\nNeverSeenBefore,500\n,\n");
    for p in pipeline.predict_proba(&table).unwrap() {
        assert!((0.0..=1.0).contains(&p));
    }
}

#[test]
fn test_artifact_round_trip_is_bit_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ml").join("model.bin");
    let pipeline = fitted();

    save_artifact(&pipeline, &path).unwrap();
    let loaded = load_artifact(&path).unwrap();
    assert_eq!(loaded, pipeline);

    let table = scoring_table("merchant,amount\nGiftCards,950\nShell,25\nWalmart,100\n");
    let before = pipeline.predict_proba(&table).unwrap();
    let after = loaded.predict_proba(&table).unwrap();
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.to_bits(), b.to_bits());
    }

    // Only the artifact remains; the temp file was renamed into place
    let entries: Vec<_> = fs::read_dir(path.parent().unwrap()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_schema_version_checked_before_payload() {
    let mut bytes = encode_artifact(&fitted()).unwrap();
    let bumped = (ARTIFACT_SCHEMA_VERSION + 1).to_le_bytes();
    bytes[8] = bumped[0];
    bytes[9] = bumped[1];
    // Corrupt the payload too; the version error must still win
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;

    match decode_artifact(&bytes) {
        Err(CoreError::SchemaVersion { expected, found }) => {
            assert_eq!(expected, ARTIFACT_SCHEMA_VERSION);
            assert_eq!(found, ARTIFACT_SCHEMA_VERSION + 1);
        }
        other => panic!("expected SchemaVersion, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_corrupt_artifacts_are_rejected() {
    let bytes = encode_artifact(&fitted()).unwrap();

    let mut flipped = bytes.clone();
    let last = flipped.len() - 1;
    flipped[last] ^= 0xff;
    assert!(matches!(decode_artifact(&flipped), Err(CoreError::CorruptArtifact(_))));

    let mut bad_magic = bytes.clone();
    bad_magic[0] = b'X';
    assert!(matches!(decode_artifact(&bad_magic), Err(CoreError::CorruptArtifact(_))));

    assert!(matches!(decode_artifact(&bytes[..12]), Err(CoreError::CorruptArtifact(_))));
}

#[test]
fn test_missing_artifact_is_not_found() {
    let dir = TempDir::new().unwrap();
    match load_artifact(&dir.path().join("model.bin")) {
        Err(CoreError::NotFound(msg)) => assert!(msg.contains("Model not found")),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_store_caches_until_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.bin");
    save_artifact(&fitted(), &path).unwrap();

    let store = ArtifactStore::new(&path);
    assert!(!store.is_loaded());
    let first = store.get().unwrap();
    assert!(store.is_loaded());

    // Cached: the file is no longer consulted
    fs::remove_file(&path).unwrap();
    let second = store.get().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    // Failed reload keeps the previous artifact
    fs::write(&path, b"garbage").unwrap();
    assert!(store.reload().is_err());
    assert!(std::sync::Arc::ptr_eq(&first, &store.get().unwrap()));

    save_artifact(&fitted(), &path).unwrap();
    let reloaded = store.reload().unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &reloaded));
}
