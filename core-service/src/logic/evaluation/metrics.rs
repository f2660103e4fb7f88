//! Held-out metrics: classification report and average precision.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::logic::dataset::TransactionTable;
use crate::logic::model::FittedPipeline;

const REPORT_DIGITS: usize = 4;
const NAME_WIDTH: usize = 12; // len("weighted avg")

/// Precision, recall, F1 and support for one class or average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Class `0` (legitimate)
    pub negative: ClassMetrics,
    /// Class `1` (fraud)
    pub positive: ClassMetrics,
    pub accuracy: f64,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    /// Zero division yields 0
    pub fn compute(truth: &[bool], predicted: &[bool]) -> Self {
        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut tn = 0usize;
        let mut fn_ = 0usize;

        for (&t, &p) in truth.iter().zip(predicted) {
            match (t, p) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
        }

        let total = tp + fp + tn + fn_;
        let positive = class_metrics(tp, fp, fn_);
        let negative = class_metrics(tn, fn_, fp);

        let macro_avg = ClassMetrics {
            precision: (negative.precision + positive.precision) / 2.0,
            recall: (negative.recall + positive.recall) / 2.0,
            f1: (negative.f1 + positive.f1) / 2.0,
            support: total,
        };

        let weight = |neg: f64, pos: f64| {
            ratio(
                neg * negative.support as f64 + pos * positive.support as f64,
                total as f64,
            )
        };
        let weighted_avg = ClassMetrics {
            precision: weight(negative.precision, positive.precision),
            recall: weight(negative.recall, positive.recall),
            f1: weight(negative.f1, positive.f1),
            support: total,
        };

        Self {
            negative,
            positive,
            accuracy: ratio((tp + tn) as f64, total as f64),
            macro_avg,
            weighted_avg,
        }
    }

    pub fn support(&self) -> usize {
        self.macro_avg.support
    }

    /// Tabular text layout, 4 digits
    pub fn render(&self) -> String {
        let mut out = format!("{:>w$} ", "", w = NAME_WIDTH);
        for header in ["precision", "recall", "f1-score", "support"] {
            out.push_str(&format!(" {:>9}", header));
        }
        out.push_str("\n\n");

        out.push_str(&metrics_row("0", &self.negative));
        out.push_str(&metrics_row("1", &self.positive));
        out.push('\n');

        out.push_str(&format!(
            "{:>w$}  {:>9} {:>9} {:>9.d$} {:>9}\n",
            "accuracy",
            "",
            "",
            self.accuracy,
            self.support(),
            w = NAME_WIDTH,
            d = REPORT_DIGITS
        ));
        out.push_str(&metrics_row("macro avg", &self.macro_avg));
        out.push_str(&metrics_row("weighted avg", &self.weighted_avg));
        out
    }
}

fn metrics_row(name: &str, m: &ClassMetrics) -> String {
    format!(
        "{:>w$}  {:>9.d$} {:>9.d$} {:>9.d$} {:>9}\n",
        name,
        m.precision,
        m.recall,
        m.f1,
        m.support,
        w = NAME_WIDTH,
        d = REPORT_DIGITS
    )
}

fn class_metrics(tp: usize, fp: usize, fn_: usize) -> ClassMetrics {
    let precision = ratio(tp as f64, (tp + fp) as f64);
    let recall = ratio(tp as f64, (tp + fn_) as f64);
    ClassMetrics {
        precision,
        recall,
        f1: ratio(2.0 * precision * recall, precision + recall),
        support: tp + fn_,
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Area under the precision-recall curve as a step sum over distinct scores.
/// `None` when there are no positive rows.
pub fn average_precision(truth: &[bool], scores: &[f64]) -> Option<f64> {
    let positives = truth.iter().filter(|t| **t).count();
    if positives == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..truth.len().min(scores.len())).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut tp = 0usize;
    let mut seen = 0usize;
    let mut prev_recall = 0.0;
    let mut ap = 0.0;
    let mut i = 0;

    while i < order.len() {
        let threshold = scores[order[i]];
        // Tied scores form a single threshold
        while i < order.len() && scores[order[i]] == threshold {
            if truth[order[i]] {
                tp += 1;
            }
            seen += 1;
            i += 1;
        }

        let precision = tp as f64 / seen as f64;
        let recall = tp as f64 / positives as f64;
        ap += (recall - prev_recall) * precision;
        prev_recall = recall;
    }

    Some(ap)
}

/// Metrics of one held-out split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEvaluation {
    pub report: ClassificationReport,
    pub pr_auc: Option<f64>,
}

/// Score `table` with `pipeline` and compare against `labels`
pub fn evaluate(
    pipeline: &FittedPipeline,
    table: &TransactionTable,
    labels: &[bool],
) -> CoreResult<SplitEvaluation> {
    if table.len() != labels.len() {
        return Err(CoreError::Validation(format!(
            "{} rows but {} labels",
            table.len(),
            labels.len()
        )));
    }

    let predictions = pipeline.predict(table)?;
    let decisions: Vec<bool> = predictions.iter().map(|p| p.is_fraud).collect();
    let scores: Vec<f64> = predictions.iter().map(|p| p.probability).collect();

    Ok(SplitEvaluation {
        report: ClassificationReport::compute(labels, &decisions),
        pr_auc: average_precision(labels, &scores),
    })
}
