//! Format registry: supported input and output formats, MIME types and
//! file-name extension handling.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MIME type of CSV output.
pub const CSV_MIME: &str = "text/csv";

/// MIME type of Excel Open XML workbooks.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Formats the loader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Csv,
    Xlsx,
}

impl InputFormat {
    /// All input formats, in display order.
    pub const ALL: [InputFormat; 2] = [InputFormat::Csv, InputFormat::Xlsx];

    /// Resolve a lowercase extension (`csv`, `xlsx`) to an input format.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(PipelineError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Formats the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "xlsx",
        }
    }

    /// MIME type announced with the exported bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Excel => XLSX_MIME,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Excel => "Excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            _ => Err(PipelineError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Formats accepted for upload.
pub fn list_supported_input_formats() -> Vec<InputFormat> {
    InputFormat::ALL.to_vec()
}

/// Lowercased final dot-segment of a file name.
///
/// Returns `None` when the name has no dot, or only a leading one
/// (`.csv` is a hidden file named "csv", not a CSV file without a stem).
pub fn extension_of(file_name: &str) -> Option<String> {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            Some(ext.to_ascii_lowercase())
        }
        _ => None,
    }
}

/// Replace the trailing extension of `file_name` with `extension`.
///
/// Only the final dot-segment is touched, so `csv_report.csv` becomes
/// `csv_report.xlsx`. A name without an extension gets one appended.
pub fn replace_extension(file_name: &str, extension: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => stem,
        _ => file_name.trim_end_matches('.'),
    };
    format!("{stem}.{extension}")
}
