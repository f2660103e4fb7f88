//! Integration tests for the HTTP query interface.

use std::fs;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use fraud_api::{create_router, AppState, Config};
use fraud_core::constants::POTENTIAL_LABEL_COLUMN;
use fraud_core::logic::generator::{write_transactions_csv, GeneratorConfig};
use fraud_core::{run_training, TrainingConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Generated dataset, trained model and one run report under a temp dir
fn trained_state() -> (TempDir, AppState) {
    let dir = TempDir::new().expect("tempdir");
    let config = Config::for_base_dir(dir.path());
    let paths = config.scoring_paths();

    let generator = GeneratorConfig {
        rows: 600,
        seed: 21,
        anchor: NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .expect("anchor"),
    };
    write_transactions_csv(&generator, &paths.transactions_path).expect("dataset");

    let mut training = TrainingConfig::new(&paths.transactions_path, &paths.model_path);
    training.outputs_dir = Some(paths.outputs_dir.clone());
    training.label_column = POTENTIAL_LABEL_COLUMN.to_string();
    run_training(&training).expect("training");

    (dir, AppState::new(config))
}

async fn send(state: &AppState, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = create_router(state.clone())
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(Config::for_base_dir(dir.path()));

    let (status, body) = send(&state, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn test_predict_sample_limits() {
    let (_dir, state) = trained_state();

    let (status, body) = send(&state, "GET", "/model/predict-sample").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 10);
    assert_eq!(body["rows"].as_array().unwrap().len(), 10);

    for (limit, expected) in [(1, 1), (100, 100)] {
        let (status, body) =
            send(&state, "GET", &format!("/model/predict-sample?limit={}", limit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], expected);
    }

    for limit in ["0", "101", "abc"] {
        let (status, body) =
            send(&state, "GET", &format!("/model/predict-sample?limit={}", limit)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={}", limit);
        assert_eq!(body["status"], 400);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_rows_carry_predictions() {
    let (_dir, state) = trained_state();
    let (status, body) = send(&state, "GET", "/model/predict-sample?limit=5").await;
    assert_eq!(status, StatusCode::OK);

    for row in body["rows"].as_array().unwrap() {
        let p = row["predicted_probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p));
        assert_eq!(row["predicted_is_fraud"].as_u64().unwrap(), (p >= 0.5) as u64);
        assert!(row["transaction_id"].is_i64());
        assert!(row["merchant"].is_string());
    }
}

#[tokio::test]
async fn test_bulk_predictions_limits() {
    let (_dir, state) = trained_state();

    let (status, body) = send(&state, "GET", "/transactions/with-predictions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 200);

    let (status, body) = send(&state, "GET", "/transactions/with-predictions?limit=5000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 600);

    let (status, _) = send(&state, "GET", "/transactions/with-predictions?limit=5001").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_model_is_404() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(Config::for_base_dir(dir.path()));

    let (status, body) = send(&state, "GET", "/model/predict-sample").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Model not found. Run fraud-train first.");
    assert_eq!(body["status"], 404);

    let (status, body) = send(&state, "GET", "/model/latest-run").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No model run output files found in outputs/.");

    // Limit validation still comes first
    let (status, _) = send(&state, "GET", "/model/predict-sample?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schema_mismatch_is_422() {
    let (dir, state) = trained_state();
    fs::write(
        dir.path().join("transactions.csv"),
        "transaction_id,merchant,location\n1,Amazon,CA\n",
    )
    .unwrap();

    let (status, body) = send(&state, "GET", "/model/predict-sample").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("amount"), "{}", message);
}

#[tokio::test]
async fn test_latest_run() {
    let (_dir, state) = trained_state();
    let (status, body) = send(&state, "GET", "/model/latest-run").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["file"].as_str().unwrap().starts_with("outputs/model_run_"));
    assert!(body["updated_at"].as_f64().unwrap() > 0.0);
    assert!(body["parsed_metrics"]["train_size"].as_u64().unwrap() > 0);
    assert!(body["parsed_metrics"]["test_accuracy"].is_f64());
    assert!(body["raw_output"]
        .as_str()
        .unwrap()
        .contains("Validation metrics"));
}

#[tokio::test]
async fn test_model_info_and_reload() {
    let (_dir, state) = trained_state();

    let (status, info) = send(&state, "GET", "/model/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["label_column"], "is_potential_fraud");
    assert_eq!(info["model_path"], "ml/model.bin");
    let features: Vec<&str> = info["feature_columns"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(!features.contains(&"transaction_id"));
    assert!(features.contains(&"amount"));

    let (status, reloaded) = send(&state, "POST", "/model/reload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reloaded, info);
}

#[tokio::test]
async fn test_cors_allow_list() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(Config::for_base_dir(dir.path()));

    let response = create_router(state)
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "http://localhost:5173");
    assert_eq!(headers["access-control-allow-credentials"], "true");
}
