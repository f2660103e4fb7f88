//! Configuration module

use std::env;
use std::path::PathBuf;

use fraud_core::ScoringPaths;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Base directory for the model, dataset and reports
    pub base_dir: PathBuf,

    /// Artifact path override (relative to `base_dir` unless absolute)
    pub model_path: Option<PathBuf>,

    /// Transactions CSV override
    pub transactions_path: Option<PathBuf>,

    /// Run reports directory override
    pub outputs_dir: Option<PathBuf>,

    /// Origins allowed by CORS
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            base_dir: env::var("FRAUD_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),

            model_path: env::var("FRAUD_MODEL_PATH").ok().map(PathBuf::from),
            transactions_path: env::var("FRAUD_TRANSACTIONS_PATH").ok().map(PathBuf::from),
            outputs_dir: env::var("FRAUD_OUTPUTS_DIR").ok().map(PathBuf::from),

            cors_origins: parse_origins(
                &env::var("FRAUD_CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
        }
    }

    /// Defaults rooted at `base_dir`
    pub fn for_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            port: 8080,
            base_dir: base_dir.into(),
            model_path: None,
            transactions_path: None,
            outputs_dir: None,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
        }
    }

    pub fn scoring_paths(&self) -> ScoringPaths {
        ScoringPaths::under(&self.base_dir).with_overrides(
            self.model_path.clone(),
            self.transactions_path.clone(),
            self.outputs_dir.clone(),
        )
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
