//! Classifier - logistic regression parameters
//!
//! Fitting is delegated to `linfa-logistic`; only the fitted coefficients
//! and intercept are kept, oriented so the sigmoid is P(fraud).

use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticParams {
    /// Fit on encoded rows with minority-class rows replicated to balance classes
    pub fn fit(x: &Array2<f64>, labels: &[bool], max_iterations: u64) -> CoreResult<Self> {
        let rows = balanced_rows(labels);
        let records = x.select(Axis(0), &rows);
        let targets: Array1<bool> = rows.iter().map(|&i| labels[i]).collect();

        log::debug!(
            "Fitting logistic regression on {} rows ({} after balancing) x {} features",
            labels.len(),
            rows.len(),
            x.ncols()
        );

        let dataset = Dataset::new(records, targets);
        let fitted = LogisticRegression::<f64>::default()
            .max_iterations(max_iterations)
            .fit(&dataset)
            .map_err(|e| CoreError::Fit(e.to_string()))?;

        let mut coefficients = fitted.params().to_vec();
        let mut intercept = fitted.intercept();

        // linfa scores its own positive class, which may be `false`
        if !fitted.labels().pos.class {
            coefficients.iter_mut().for_each(|w| *w = -*w);
            intercept = -intercept;
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn width(&self) -> usize {
        self.coefficients.len()
    }

    /// P(fraud) for one encoded row
    pub fn probability(&self, features: ArrayView1<f64>) -> f64 {
        let z = self.intercept
            + features
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>();
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Row indices with minority-class rows repeated round(majority / minority) times
pub fn balanced_rows(labels: &[bool]) -> Vec<usize> {
    let positives = labels.iter().filter(|l| **l).count();
    let negatives = labels.len() - positives;

    if positives == 0 || negatives == 0 {
        return (0..labels.len()).collect();
    }

    let (minority, ratio) = if positives < negatives {
        (true, negatives as f64 / positives as f64)
    } else {
        (false, positives as f64 / negatives as f64)
    };
    let copies = (ratio.round() as usize).max(1);

    labels
        .iter()
        .enumerate()
        .flat_map(|(i, &label)| {
            let n = if label == minority { copies } else { 1 };
            std::iter::repeat(i).take(n)
        })
        .collect()
}
