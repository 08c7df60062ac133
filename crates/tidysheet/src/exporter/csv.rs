//! CSV serialization.

use crate::error::{PipelineError, Result};
use polars::prelude::*;

/// Header row, `,` separator, missing cells as empty fields.
pub(super) fn write_csv(df: &DataFrame) -> Result<Vec<u8>> {
    if df.width() == 0 {
        return Ok(Vec::new());
    }

    let mut df = df.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .map_err(|e| PipelineError::ExportFailed {
            format: "CSV".to_string(),
            reason: e.to_string(),
        })?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(df: &DataFrame) -> String {
        String::from_utf8(write_csv(df).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_cells_are_empty_fields() {
        let df = df![
            "id" => [1i64, 2],
            "name" => [Some("ann"), None],
        ]
        .unwrap();

        assert_eq!(to_string(&df), "id,name\n1,ann\n2,\n");
    }

    #[test]
    fn test_fields_with_separator_are_quoted() {
        let df = df!["note" => ["a,b", "plain"]].unwrap();
        assert_eq!(to_string(&df), "note\n\"a,b\"\nplain\n");
    }

    #[test]
    fn test_header_only_when_no_rows() {
        let df = df!["a" => Vec::<i64>::new(), "b" => Vec::<i64>::new()].unwrap();
        assert_eq!(to_string(&df), "a,b\n");
    }

    #[test]
    fn test_no_columns_gives_empty_output() {
        assert!(write_csv(&DataFrame::empty()).unwrap().is_empty());
    }
}
