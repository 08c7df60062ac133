//! Column selection.

use crate::error::{PipelineError, Result};
use crate::table::Table;
use polars::prelude::DataFrame;
use std::collections::HashSet;
use tracing::debug;

/// Restrict a table to `columns`, in the order given.
///
/// Every name must exist in the table and appear at most once. An empty
/// selection yields a table with no columns and the same number of rows.
pub fn project<S: AsRef<str>>(table: &Table, columns: &[S]) -> Result<Table> {
    let mut seen = HashSet::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        if !table.has_column(name) {
            return Err(PipelineError::UnknownColumn(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(PipelineError::DuplicateColumn(name.to_string()));
        }
    }

    if columns.is_empty() {
        return Ok(Table::new(DataFrame::empty_with_height(table.height())));
    }

    let names: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    let frame = table.frame().select(names)?;
    debug!("Projected {} of {} columns", frame.width(), table.width());
    Ok(Table::new(frame))
}

/// The selection offered before the user picks: every column, in order.
pub fn default_selection(table: &Table) -> Vec<String> {
    table.column_names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn sample() -> Table {
        Table::new(
            df![
                "a" => [1i64, 2],
                "b" => ["x", "y"],
                "c" => [0.5, 1.5],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_project_reorders() {
        let projected = project(&sample(), &["c", "a"]).unwrap();

        let expected = Table::new(df!["c" => [0.5, 1.5], "a" => [1i64, 2]].unwrap());
        assert_eq!(projected, expected);
    }

    #[test]
    fn test_project_full_selection_is_identity() {
        let table = sample();
        let projected = project(&table, &default_selection(&table)).unwrap();
        assert_eq!(projected, table);
    }

    #[test]
    fn test_project_unknown_column() {
        let err = project(&sample(), &["a", "zzz"]).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownColumn(ref name) if name == "zzz"));
    }

    #[test]
    fn test_project_duplicate_column() {
        let err = project(&sample(), &["b", "b"]).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateColumn(ref name) if name == "b"));
    }

    #[test]
    fn test_project_empty_selection() {
        let table = sample();
        let projected = project::<&str>(&table, &[]).unwrap();
        assert_eq!(projected.width(), 0);
        assert_eq!(projected.height(), table.height());
    }
}
