//! Exporter: serializes a table into a downloadable file.

mod csv;
mod xlsx;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::format::{ExportFormat, replace_extension};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What to export and under which source name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    /// Name of the uploaded file the table came from.
    pub source_name: String,
}

impl ExportRequest {
    pub fn new(format: ExportFormat, source_name: impl Into<String>) -> Self {
        Self {
            format,
            source_name: source_name.into(),
        }
    }

    /// Source name with its extension swapped for the export format's.
    pub fn output_filename(&self) -> String {
        replace_extension(&self.source_name, self.format.extension())
    }
}

/// Serialized file content, ready for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportResult {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl ExportResult {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Serialize `table` in the requested format.
pub fn export(
    table: &Table,
    request: &ExportRequest,
    config: &PipelineConfig,
) -> Result<ExportResult> {
    let bytes = match request.format {
        ExportFormat::Csv => csv::write_csv(table.frame())?,
        ExportFormat::Excel => xlsx::write_xlsx(table.frame(), &config.excel_sheet_name)?,
    };

    let filename = request.output_filename();
    info!(
        "Exported {} rows to {} ({} bytes)",
        table.height(),
        filename,
        bytes.len()
    );

    Ok(ExportResult {
        bytes,
        mime_type: request.format.mime_type().to_string(),
        filename,
    })
}
