use crate::error::{CoreError, CoreResult};

/// Inclusive row-limit range with a default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitRange {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

/// `GET /model/predict-sample`
pub const SAMPLE_LIMIT: LimitRange = LimitRange {
    min: 1,
    max: 100,
    default: 10,
};

/// `GET /transactions/with-predictions`
pub const BULK_LIMIT: LimitRange = LimitRange {
    min: 1,
    max: 5000,
    default: 200,
};

impl LimitRange {
    /// Requested limit, or the default; out-of-range is `Validation`
    pub fn check(&self, requested: Option<i64>) -> CoreResult<usize> {
        let limit = requested.unwrap_or(self.default);
        if limit < self.min || limit > self.max {
            return Err(CoreError::Validation(format!(
                "limit must be between {} and {}, got {}",
                self.min, self.max, limit
            )));
        }
        Ok(limit as usize)
    }
}
