//! XLSX decoding with calamine.
//!
//! One worksheet is read (the configured index, first sheet by default). The
//! first row of the used range is the header.

use super::inference::{Cell, build_column, normalize_headers};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::table::Table;
use calamine::{Data, DataType as _, Reader, Xlsx};
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

fn load_failed(reason: impl ToString) -> PipelineError {
    PipelineError::LoadFailed {
        format: "Excel".to_string(),
        reason: reason.to_string(),
    }
}

/// Decode a single-sheet spreadsheet with a header row into a table.
pub(crate) fn read_xlsx(bytes: &[u8], name: &str, config: &PipelineConfig) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec())).map_err(load_failed)?;

    let sheet_count = workbook.sheet_names().len();
    if sheet_count == 0 {
        return Err(PipelineError::EmptyInput(name.to_string()));
    }

    let range = workbook
        .worksheet_range_at(config.sheet_index)
        .ok_or_else(|| {
            load_failed(format!(
                "no worksheet at index {} ({} available)",
                config.sheet_index, sheet_count
            ))
        })?
        .map_err(load_failed)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(PipelineError::EmptyInput(name.to_string()));
    };

    let headers = normalize_headers(header_row.iter().map(header_text).collect());
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(row.get(col_idx).map_or(Cell::Missing, |c| cell_from_data(c, config)));
        }
    }

    debug!(
        "Read worksheet {}: {} columns, {} data rows",
        config.sheet_index,
        headers.len(),
        cells.first().map_or(0, Vec::len)
    );

    let columns: Vec<Column> = headers
        .iter()
        .zip(cells)
        .map(|(header, column)| build_column(header, column))
        .collect();

    Ok(Table::new(DataFrame::new(columns)?))
}

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INTEGER => {
            format!("{}", *f as i64)
        }
        other => other.to_string(),
    }
}

fn cell_from_data(cell: &Data, config: &PipelineConfig) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::Int(i) => Cell::from_i64(*i),
        Data::Float(f) if f.is_nan() => Cell::Missing,
        Data::Float(f) => Cell::from_f64(*f),
        Data::String(s) => Cell::from_text(Some(s), config),
        Data::Bool(b) => Cell::Text(b.to_string()),
        other => match other.as_datetime() {
            Some(dt) => Cell::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Cell::Text(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;
    use calamine::CellErrorType;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn workbook_bytes(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        build(sheet);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_read_xlsx_basic() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_string(0, 0, "name").unwrap();
            sheet.write_string(0, 1, "age").unwrap();
            sheet.write_string(0, 2, "score").unwrap();
            sheet.write_string(1, 0, "ann").unwrap();
            sheet.write_number(1, 1, 31).unwrap();
            sheet.write_number(1, 2, 1.5).unwrap();
            sheet.write_string(2, 0, "bob").unwrap();
            sheet.write_number(2, 2, 2.0).unwrap();
        });

        let table = read_xlsx(&bytes, "people.xlsx", &PipelineConfig::default()).unwrap();

        assert_eq!(table.column_names(), vec!["name", "age", "score"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.column_kind("name").unwrap(), ColumnKind::Text);
        assert_eq!(table.frame().column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(table.frame().column("age").unwrap().null_count(), 1);
        assert_eq!(table.frame().column("score").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_read_xlsx_duplicate_and_blank_headers() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_string(0, 0, "a").unwrap();
            sheet.write_string(0, 2, "a").unwrap();
            sheet.write_number(1, 0, 1).unwrap();
            sheet.write_number(1, 1, 2).unwrap();
            sheet.write_number(1, 2, 3).unwrap();
        });

        let table = read_xlsx(&bytes, "dup.xlsx", &PipelineConfig::default()).unwrap();
        assert_eq!(table.column_names(), vec!["a", "Unnamed: 1", "a.1"]);
    }

    #[test]
    fn test_read_xlsx_missing_sheet_index() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_string(0, 0, "a").unwrap();
        });
        let config = PipelineConfig::builder().sheet_index(3).build().unwrap();

        let err = read_xlsx(&bytes, "one.xlsx", &config).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_read_xlsx_rejects_garbage() {
        let err = read_xlsx(b"not a zip archive", "bad.xlsx", &PipelineConfig::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_read_xlsx_header_only_sheet() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_string(0, 0, "id").unwrap();
            sheet.write_string(0, 1, "name").unwrap();
        });

        let table = read_xlsx(&bytes, "headers.xlsx", &PipelineConfig::default()).unwrap();

        assert_eq!(table.column_names(), vec!["id", "name"]);
        assert_eq!(table.height(), 0);
    }

    #[test]
    fn test_read_xlsx_booleans_and_dates_as_text() {
        let date = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let bytes = workbook_bytes(|sheet| {
            sheet.write_string(0, 0, "active").unwrap();
            sheet.write_string(0, 1, "joined").unwrap();
            sheet.write_boolean(1, 0, true).unwrap();
            sheet
                .write_datetime_with_format(1, 1, &date, &date_format)
                .unwrap();
            sheet.write_boolean(2, 0, false).unwrap();
        });

        let table = read_xlsx(&bytes, "flags.xlsx", &PipelineConfig::default()).unwrap();

        let active = table.frame().column("active").unwrap();
        assert_eq!(active.dtype(), &DataType::String);
        assert_eq!(active.str().unwrap().get(0), Some("true"));
        assert_eq!(active.str().unwrap().get(1), Some("false"));

        let joined = table.frame().column("joined").unwrap();
        assert_eq!(joined.dtype(), &DataType::String);
        assert_eq!(joined.str().unwrap().get(0), Some("2024-03-15 00:00:00"));
        assert_eq!(joined.null_count(), 1);
    }

    #[test]
    fn test_error_cells_are_missing() {
        let config = PipelineConfig::default();
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::NA), &config),
            Cell::Missing
        );
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::Div0), &config),
            Cell::Missing
        );
        assert_eq!(cell_from_data(&Data::Float(f64::NAN), &config), Cell::Missing);
    }

    #[test]
    fn test_large_numeric_header_is_not_saturated() {
        let bytes = workbook_bytes(|sheet| {
            sheet.write_number(0, 0, 2024).unwrap();
            sheet.write_number(0, 1, 1e20).unwrap();
            sheet.write_number(1, 0, 1).unwrap();
            sheet.write_number(1, 1, 2).unwrap();
        });

        let table = read_xlsx(&bytes, "years.xlsx", &PipelineConfig::default()).unwrap();

        assert_eq!(table.column_names(), vec!["2024", "100000000000000000000"]);
    }
}
