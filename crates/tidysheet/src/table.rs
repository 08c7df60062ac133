//! The in-memory table every pipeline stage consumes and produces.
//!
//! A [`Table`] wraps a Polars `DataFrame`, which already guarantees unique
//! column names and equal column lengths. Stages never mutate a table they
//! were handed; they build and return a new one.

use crate::error::{PipelineError, Result};
use crate::utils::{any_value_to_json, is_numeric_dtype, is_numeric_string};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;
use std::fmt;

/// Value kind of a column, deciding eligibility for numeric-only operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Integer or float storage.
    Numeric,
    /// Text storage holding no numeric-looking values.
    Text,
    /// Text storage holding a mixture of numbers and other text.
    Mixed,
}

impl ColumnKind {
    /// Derive the kind of a stored column.
    pub fn of(column: &Column) -> Self {
        let dtype = column.dtype();
        if is_numeric_dtype(dtype) {
            return Self::Numeric;
        }
        if dtype == &DataType::String
            && let Ok(values) = column.as_materialized_series().str()
            && values.into_iter().flatten().any(is_numeric_string)
        {
            return Self::Mixed;
        }
        Self::Text
    }

    pub fn is_numeric(self) -> bool {
        self == Self::Numeric
    }
}

/// Per-column metadata for display next to a preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    /// Polars dtype, e.g. "Int64", "String".
    pub dtype: String,
    pub missing: usize,
}

/// A window of rows converted to JSON values, for a grid widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowWindow {
    pub rows: Vec<Vec<serde_json::Value>>,
    pub start: usize,
    pub total_rows: usize,
}

/// Ordered, named, equal-length columns of cells.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

assert_impl_all!(Table: Send, Sync);

impl Table {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    /// Kind of the named column.
    pub fn column_kind(&self, name: &str) -> Result<ColumnKind> {
        self.frame
            .column(name)
            .map(ColumnKind::of)
            .map_err(|_| PipelineError::UnknownColumn(name.to_string()))
    }

    /// Name, kind, dtype and missing count of every column.
    pub fn columns(&self) -> Vec<ColumnSummary> {
        self.frame
            .get_columns()
            .iter()
            .map(|col| ColumnSummary {
                name: col.name().to_string(),
                kind: ColumnKind::of(col),
                dtype: format!("{:?}", col.dtype()),
                missing: col.null_count(),
            })
            .collect()
    }

    /// Names of numeric-kind columns, in table order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|col| ColumnKind::of(col).is_numeric())
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Total number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.frame.get_columns().iter().map(|col| col.null_count()).sum()
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table::new(self.frame.head(Some(n)))
    }

    /// Rows `start..start + count` as JSON values, clamped to the table.
    pub fn rows(&self, start: usize, count: usize) -> RowWindow {
        let total_rows = self.frame.height();
        let start = start.min(total_rows);
        let count = count.min(total_rows - start);

        let sliced = self.frame.slice(start as i64, count);
        let rows = (0..sliced.height())
            .map(|row_idx| {
                sliced
                    .get_columns()
                    .iter()
                    .map(|col| {
                        col.get(row_idx)
                            .ok()
                            .map_or(serde_json::Value::Null, any_value_to_json)
                    })
                    .collect()
            })
            .collect();

        RowWindow {
            rows,
            start,
            total_rows,
        }
    }
}

impl From<DataFrame> for Table {
    fn from(frame: DataFrame) -> Self {
        Self::new(frame)
    }
}

/// Value-wise equality; missing cells compare equal to each other.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            df![
                "id" => [1i64, 2, 3],
                "score" => [Some(1.5), None, Some(2.5)],
                "name" => ["a", "b", "c"],
                "code" => [Some("7"), Some("x"), None],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_column_kinds() {
        let table = sample();
        assert_eq!(table.column_kind("id").unwrap(), ColumnKind::Numeric);
        assert_eq!(table.column_kind("score").unwrap(), ColumnKind::Numeric);
        assert_eq!(table.column_kind("name").unwrap(), ColumnKind::Text);
        assert_eq!(table.column_kind("code").unwrap(), ColumnKind::Mixed);
        assert!(matches!(
            table.column_kind("missing"),
            Err(PipelineError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_column_summaries() {
        let summaries = sample().columns();
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[1].name, "score");
        assert_eq!(summaries[1].missing, 1);
        assert_eq!(summaries[1].dtype, "Float64");
        assert_eq!(summaries[3].kind, ColumnKind::Mixed);
    }

    #[test]
    fn test_numeric_column_names() {
        assert_eq!(sample().numeric_column_names(), vec!["id", "score"]);
    }

    #[test]
    fn test_head_and_shape() {
        let table = sample();
        assert_eq!(table.height(), 3);
        assert_eq!(table.width(), 4);
        assert_eq!(table.head(2).height(), 2);
        assert_eq!(table.head(10).height(), 3);
        assert_eq!(table.missing_count(), 2);
    }

    #[test]
    fn test_rows_window_clamps() {
        let table = sample();

        let window = table.rows(1, 10);
        assert_eq!(window.start, 1);
        assert_eq!(window.total_rows, 3);
        assert_eq!(window.rows.len(), 2);
        assert_eq!(window.rows[0][0], serde_json::Value::from(2));
        assert_eq!(window.rows[0][1], serde_json::Value::Null);

        let beyond = table.rows(50, 5);
        assert!(beyond.rows.is_empty());
    }

    #[test]
    fn test_equality_treats_missing_as_equal() {
        assert_eq!(sample(), sample());
        let other = Table::new(df!["id" => [1i64, 2, 3]].unwrap());
        assert_ne!(sample(), other);
    }
}
