//! HTTP handlers

pub mod health;
pub mod model;
pub mod transactions;

use serde::Deserialize;
use validator::Validate;

/// `?limit=` for `GET /model/predict-sample`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SampleQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

/// `?limit=` for `GET /transactions/with-predictions`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BulkQuery {
    #[validate(range(min = 1, max = 5000))]
    pub limit: Option<i64>,
}
