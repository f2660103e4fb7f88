use serde::{Deserialize, Serialize};

/// How a column is treated by the feature transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Every present cell parses as a finite number
    Numeric,
    /// Anything else; one-hot encoded
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
        }
    }
}

/// A single typed cell of a transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Type a raw CSV cell according to its column kind
    pub fn parse(raw: &str, kind: ColumnKind) -> Self {
        if raw.is_empty() {
            return FieldValue::Missing;
        }

        match kind {
            ColumnKind::Numeric => {
                if let Ok(i) = raw.parse::<i64>() {
                    FieldValue::Integer(i)
                } else {
                    match parse_number(raw) {
                        Some(x) => FieldValue::Number(x),
                        None => FieldValue::Text(raw.to_string()),
                    }
                }
            }
            ColumnKind::Categorical => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(x) => Some(*x),
            FieldValue::Text(s) => parse_number(s),
            FieldValue::Missing => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Integer(i) => serde_json::Value::from(*i),
            FieldValue::Number(x) => serde_json::Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
            FieldValue::Missing => serde_json::Value::Null,
        }
    }
}

/// Finite numbers only; "NaN" and "inf" stay text
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|x| x.is_finite())
}
