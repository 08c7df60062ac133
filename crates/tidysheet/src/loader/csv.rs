//! CSV decoding.
//!
//! Polars reads every field as text (schema inference disabled, header row
//! read as data so the raw names survive); the shared inference pass then
//! types each column from all of its cells, not a sample.

use super::inference::{Cell, build_column, normalize_headers};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result, ResultExt};
use crate::table::Table;
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode delimited text with a header row into a table.
pub(crate) fn read_csv(bytes: &[u8], name: &str, config: &PipelineConfig) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let raw = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(config.csv_separator)
                .with_quote_char(Some(b'"')),
        )
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| PipelineError::LoadFailed {
            format: "CSV".to_string(),
            reason: e.to_string(),
        })?;

    if raw.height() == 0 {
        return Err(PipelineError::EmptyInput(name.to_string()));
    }
    debug!("Raw CSV shape (header included): {:?}", raw.shape());

    let mut headers = Vec::with_capacity(raw.width());
    let mut cells: Vec<Vec<Cell>> = Vec::with_capacity(raw.width());
    for (idx, col) in raw.get_columns().iter().enumerate() {
        let text = col
            .as_materialized_series()
            .cast(&DataType::String)
            .context(format!("reading CSV column {idx}"))?;
        let mut values = text.str()?.into_iter();
        headers.push(values.next().flatten().unwrap_or_default().to_string());
        cells.push(values.map(|value| Cell::from_text(value, config)).collect());
    }

    let columns: Vec<Column> = normalize_headers(headers)
        .iter()
        .zip(cells)
        .map(|(header, column)| build_column(header, column))
        .collect();

    Ok(Table::new(DataFrame::new(columns)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;

    fn load(text: &str) -> Table {
        read_csv(text.as_bytes(), "test.csv", &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_read_csv_infers_kinds() {
        let table = load("id,price,name,code\n1,2.5,apple,7\n2,,pear,x\n3,4,NA,\n");

        assert_eq!(table.column_names(), vec!["id", "price", "name", "code"]);
        assert_eq!(table.height(), 3);
        assert_eq!(table.frame().column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(table.frame().column("price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(table.column_kind("name").unwrap(), ColumnKind::Text);
        assert_eq!(table.column_kind("code").unwrap(), ColumnKind::Mixed);
        assert_eq!(table.frame().column("price").unwrap().null_count(), 1);
        assert_eq!(table.frame().column("name").unwrap().null_count(), 1);
    }

    #[test]
    fn test_read_csv_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"a,b\n1,2\n");
        let table = read_csv(&bytes, "bom.csv", &PipelineConfig::default()).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_read_csv_custom_separator() {
        let config = PipelineConfig::builder().csv_separator(b';').build().unwrap();
        let table = read_csv(b"a;b\n1;x\n", "semi.csv", &config).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.column_kind("a").unwrap(), ColumnKind::Numeric);
    }

    #[test]
    fn test_read_csv_header_only() {
        let table = load("a,b\n");
        assert_eq!(table.width(), 2);
        assert_eq!(table.height(), 0);
    }

    #[test]
    fn test_read_csv_all_missing_column_is_numeric() {
        let table = load("a,b\n1,\n2,\n");
        assert_eq!(table.column_kind("b").unwrap(), ColumnKind::Numeric);
        assert_eq!(table.frame().column("b").unwrap().null_count(), 2);
    }

    #[test]
    fn test_read_csv_normalizes_headers() {
        let table = load("a,a,\n1,2,3\n");
        assert_eq!(table.column_names(), vec!["a", "a.1", "Unnamed: 2"]);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_read_csv_keeps_quoted_header() {
        let table = load("\"x, y\",z\n1,2\n");
        assert_eq!(table.column_names(), vec!["x, y", "z"]);
    }
}
