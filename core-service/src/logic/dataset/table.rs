use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use super::record::{parse_number, ColumnKind, FieldValue};
use crate::error::{CoreError, CoreResult};

/// Header-first table of transaction records.
///
/// Cells are kept as trimmed raw text so the fitted transformation can read
/// categorical values exactly as they were written at training time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    columns: Vec<String>,
    kinds: Vec<ColumnKind>,
    rows: Vec<Vec<String>>,
}

impl TransactionTable {
    /// Load a CSV file; a missing file is `NotFound`
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let table = Self::from_reader(open_csv(path)?)?;
        log::debug!(
            "Loaded {} rows x {} columns from {}",
            table.len(),
            table.columns.len(),
            path.display()
        );
        Ok(table)
    }

    /// First `limit` rows of a CSV file; later records are never read
    pub fn head_from_path(path: &Path, limit: usize) -> CoreResult<Self> {
        Self::from_reader_limited(open_csv(path)?, limit)
    }

    pub fn from_reader<R: Read>(reader: R) -> CoreResult<Self> {
        Self::from_reader_limited(reader, usize::MAX)
    }

    /// Parse at most `limit` records; kinds are inferred over those rows only
    pub fn from_reader_limited<R: Read>(reader: R, limit: usize) -> CoreResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records().take(limit) {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::from_rows(columns, rows))
    }

    /// Build from raw cells, inferring each column's kind over all rows
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let kinds = (0..columns.len())
            .map(|col| infer_kind(rows.iter().map(|r| r.get(col).map(String::as_str))))
            .collect();

        Self {
            columns,
            kinds,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column_index(name).map(|i| self.kinds[i])
    }

    /// Raw cell text; `None` for empty cells
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn value(&self, row: usize, col: usize) -> FieldValue {
        match self.cell(row, col) {
            Some(raw) => FieldValue::parse(raw, self.kinds[col]),
            None => FieldValue::Missing,
        }
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            kinds: self.kinds.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Rows at the given indices, in order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            kinds: self.kinds.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Drop columns that exist; names that are absent are ignored
    pub fn drop_columns(&self, names: &[&str]) -> Self {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i].as_str()))
            .collect();

        Self {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            kinds: keep.iter().map(|&i| self.kinds[i]).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row.get(i).cloned().unwrap_or_default()).collect())
                .collect(),
        }
    }

    /// Append a column of raw cells, re-inferring its kind
    pub fn push_column(&mut self, name: &str, values: Vec<String>) {
        let kind = infer_kind(values.iter().map(|v| Some(v.as_str())));
        self.columns.push(name.to_string());
        self.kinds.push(kind);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Row as an ordered JSON object
    pub fn record(&self, row: usize) -> Map<String, Value> {
        self.columns
            .iter()
            .enumerate()
            .map(|(col, name)| (name.clone(), self.value(row, col).to_json()))
            .collect()
    }
}

fn open_csv(path: &Path) -> CoreResult<File> {
    if !path.exists() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("transactions file");
        return Err(CoreError::NotFound(format!("{} not found.", name)));
    }
    Ok(File::open(path)?)
}

fn infer_kind<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> ColumnKind {
    let all_numeric = cells
        .flatten()
        .filter(|s| !s.is_empty())
        .all(|s| parse_number(s).is_some());

    if all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}
