//! Text report parser, for reports without a JSON sidecar.
//!
//! Each field is matched independently; a field whose line is absent or
//! malformed is left unset.

use once_cell::sync::Lazy;
use regex::Regex;

use super::run::RunMetrics;

static TRAIN_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Training data size:\s*(\d+)").expect("valid regex"));
static VALIDATION_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Validation data size:\s*(\d+)").expect("valid regex"));
static TEST_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Testing data size:\s*(\d+)").expect("valid regex"));
static VALIDATION_PR_AUC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Validation PR-AUC:\s*([0-9eE+\-.]+)").expect("valid regex"));
static TEST_PR_AUC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Test PR-AUC:\s*([0-9eE+\-.]+)").expect("valid regex"));
static ACCURACY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"accuracy\s+([0-9.]+)\s+\d+").expect("valid regex"));

pub fn parse_run_output(text: &str) -> RunMetrics {
    // First accuracy row is validation, second is test
    let mut accuracies = ACCURACY
        .captures_iter(text)
        .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse::<f64>().ok()));

    RunMetrics {
        train_size: capture(&TRAIN_SIZE, text),
        validation_size: capture(&VALIDATION_SIZE, text),
        test_size: capture(&TEST_SIZE, text),
        validation_pr_auc: capture(&VALIDATION_PR_AUC, text),
        test_pr_auc: capture(&TEST_PR_AUC, text),
        validation_accuracy: accuracies.next(),
        test_accuracy: accuracies.next(),
    }
}

fn capture<T: std::str::FromStr>(re: &Regex, text: &str) -> Option<T> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
