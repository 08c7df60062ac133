//! XLSX serialization with rust_xlsxwriter.

use crate::error::{PipelineError, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

/// Rows per worksheet, header included.
const MAX_ROWS: usize = 1_048_576;
/// Columns per worksheet.
const MAX_COLS: usize = 16_384;

fn export_failed(reason: impl ToString) -> PipelineError {
    PipelineError::ExportFailed {
        format: "Excel".to_string(),
        reason: reason.to_string(),
    }
}

/// Single worksheet, bold header row, missing cells left blank.
pub(super) fn write_xlsx(df: &DataFrame, sheet_name: &str) -> Result<Vec<u8>> {
    if df.height() + 1 > MAX_ROWS {
        return Err(export_failed(format!(
            "{} rows exceed the worksheet limit of {}",
            df.height(),
            MAX_ROWS - 1
        )));
    }
    if df.width() > MAX_COLS {
        return Err(export_failed(format!(
            "{} columns exceed the worksheet limit of {}",
            df.width(),
            MAX_COLS
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(export_failed)?;

    let header = Format::new().set_bold();
    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col = col_idx as u16;
        worksheet
            .write_string_with_format(0, col, column.name().as_str(), &header)
            .map_err(export_failed)?;
        write_column(worksheet, col, column.as_materialized_series())?;
    }

    workbook.save_to_buffer().map_err(export_failed)
}

fn write_column(worksheet: &mut Worksheet, col: u16, series: &Series) -> Result<()> {
    // Data starts below the header.
    let row_of = |idx: usize| (idx + 1) as u32;

    if is_numeric_dtype(series.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        for (idx, value) in floats.f64()?.into_iter().enumerate() {
            if let Some(v) = value {
                write_cell(worksheet.write_number(row_of(idx), col, v))?;
            }
        }
    } else if series.dtype() == &DataType::Boolean {
        for (idx, value) in series.bool()?.into_iter().enumerate() {
            if let Some(v) = value {
                write_cell(worksheet.write_boolean(row_of(idx), col, v))?;
            }
        }
    } else {
        let text = series.cast(&DataType::String)?;
        for (idx, value) in text.str()?.into_iter().enumerate() {
            if let Some(v) = value {
                write_cell(worksheet.write_string(row_of(idx), col, v))?;
            }
        }
    }

    Ok(())
}

fn write_cell<T>(result: std::result::Result<T, XlsxError>) -> Result<()> {
    result.map(|_| ()).map_err(export_failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>) -> (Vec<String>, calamine::Range<Data>) {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        (names, range)
    }

    #[test]
    fn test_write_xlsx_cells() {
        let df = df![
            "name" => [Some("ann"), None],
            "score" => [Some(1.5), Some(3.0)],
            "count" => [Some(2i64), None],
        ]
        .unwrap();

        let (names, range) = read_back(write_xlsx(&df, "Sheet1").unwrap());

        assert_eq!(names, vec!["Sheet1".to_string()]);
        assert_eq!(range.get_value((0, 0)), Some(&Data::String("name".into())));
        assert_eq!(range.get_value((0, 2)), Some(&Data::String("count".into())));
        assert_eq!(range.get_value((1, 0)), Some(&Data::String("ann".into())));
        assert_eq!(range.get_value((1, 1)), Some(&Data::Float(1.5)));
        assert_eq!(range.get_value((1, 2)), Some(&Data::Float(2.0)));
        assert!(matches!(range.get_value((2, 0)), None | Some(Data::Empty)));
        assert!(matches!(range.get_value((2, 2)), None | Some(Data::Empty)));
    }

    #[test]
    fn test_write_xlsx_custom_sheet_name() {
        let df = df!["a" => [1i64]].unwrap();
        let (names, _) = read_back(write_xlsx(&df, "Cleaned").unwrap());
        assert_eq!(names, vec!["Cleaned".to_string()]);
    }

    #[test]
    fn test_write_xlsx_rejects_bad_sheet_name() {
        let df = df!["a" => [1i64]].unwrap();
        let err = write_xlsx(&df, "bad/name").unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_FAILED");
    }
}
