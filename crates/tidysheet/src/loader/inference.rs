//! Column type inference shared by the CSV and XLSX decoders.
//!
//! Decoders turn raw cells into [`Cell`]s; [`build_column`] then picks the
//! storage type. A column is numeric when every non-missing cell is a number.

use crate::config::PipelineConfig;
use crate::utils::{ParsedNumber, parse_number};
use polars::prelude::*;
use std::collections::HashSet;

/// A decoded cell before the column type is known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Missing,
    /// A number plus the text it was read from, kept for text columns.
    Number(ParsedNumber, String),
    Text(String),
}

impl Cell {
    /// Classify a raw text cell: blank and NA tokens are missing, numbers
    /// are numbers, everything else is kept verbatim.
    pub(crate) fn from_text(raw: Option<&str>, config: &PipelineConfig) -> Self {
        let Some(raw) = raw else {
            return Self::Missing;
        };
        if raw.trim().is_empty() || config.is_na_token(raw) || config.is_na_token(raw.trim()) {
            return Self::Missing;
        }
        match parse_number(raw) {
            Some(ParsedNumber::Float(f)) if f.is_nan() => Self::Missing,
            Some(number) => Self::Number(number, raw.to_string()),
            None => Self::Text(raw.to_string()),
        }
    }

    /// A number that did not come from text.
    pub(crate) fn from_f64(value: f64) -> Self {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0; // 2^53
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            let int = value as i64;
            Self::Number(ParsedNumber::Int(int), int.to_string())
        } else {
            Self::Number(ParsedNumber::Float(value), value.to_string())
        }
    }

    pub(crate) fn from_i64(value: i64) -> Self {
        Self::Number(ParsedNumber::Int(value), value.to_string())
    }

    fn into_text(self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Number(_, text) | Self::Text(text) => Some(text),
        }
    }
}

/// Storage type chosen for a column of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InferredType {
    Int64,
    Float64,
    Utf8,
}

/// Pick the storage type for a column of cells.
///
/// All-missing columns with at least one row are `Float64`, so they count
/// as numeric; zero-row columns are text.
pub(crate) fn infer_type(cells: &[Cell]) -> InferredType {
    if cells.is_empty() {
        return InferredType::Utf8;
    }

    let mut all_int = true;
    for cell in cells {
        match cell {
            Cell::Missing => {}
            Cell::Number(ParsedNumber::Int(_), _) => {}
            Cell::Number(ParsedNumber::Float(_), _) => all_int = false,
            Cell::Text(_) => return InferredType::Utf8,
        }
    }

    let has_values = cells.iter().any(|c| !matches!(c, Cell::Missing));
    if has_values && all_int {
        InferredType::Int64
    } else {
        InferredType::Float64
    }
}

/// Build a typed Polars column from decoded cells.
pub(crate) fn build_column(name: &str, cells: Vec<Cell>) -> Column {
    let series = match infer_type(&cells) {
        InferredType::Int64 => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Number(ParsedNumber::Int(i), _) => Some(*i),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        InferredType::Float64 => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Number(number, _) => Some(number.as_f64()),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), values)
        }
        InferredType::Utf8 => {
            let values: Vec<Option<String>> = cells.into_iter().map(Cell::into_text).collect();
            Series::new(name.into(), values)
        }
    };
    series.into_column()
}

/// Make header names unique the way spreadsheet users expect:
/// blanks become `Unnamed: <index>`, repeats get `.1`, `.2`, ... suffixes.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());

    for (idx, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 0;
        while seen.contains(&name) {
            suffix += 1;
            name = format!("{base}.{suffix}");
        }
        seen.insert(name.clone());
        names.push(name);
    }

    names
}
