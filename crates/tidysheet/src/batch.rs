//! Multi-file processing with per-file failure isolation.
//!
//! Every uploaded file runs Loader → Cleaner → Projector → Exporter on its
//! own table. A failure ends that file's run and is recorded in its
//! [`FileOutcome`]; the remaining files are still processed, in input order.

use crate::chart::describe_numeric_columns;
use crate::cleaner::{CleaningOperation, CleaningSummary, apply_all};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::exporter::{ExportRequest, ExportResult, export};
use crate::format::ExportFormat;
use crate::loader::{UploadedFile, load_file};
use crate::projector::project;
use crate::table::{ColumnSummary, RowWindow, Table};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// The choices made for one file: what to clean, what to keep, what to export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRequest {
    /// Cleaning operations, applied in this order.
    pub operations: Vec<CleaningOperation>,
    /// Columns to keep; `None` keeps every column.
    pub columns: Option<Vec<String>>,
    /// Export target; `None` skips the export step.
    pub export: Option<ExportFormat>,
}

impl FileRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clean(mut self, operation: CleaningOperation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn export(mut self, format: ExportFormat) -> Self {
        self.export = Some(format);
        self
    }
}

/// Everything produced for a file that made it through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedFile {
    pub name: String,
    /// First rows of the table as loaded, before cleaning.
    pub preview: RowWindow,
    /// Columns of the projected table.
    pub columns: Vec<ColumnSummary>,
    /// The cleaned and projected table.
    #[serde(skip)]
    pub table: Table,
    /// Numeric columns offered to the chart.
    pub chart_columns: Vec<String>,
    pub cleaning: Vec<CleaningSummary>,
    pub messages: Vec<String>,
    pub export: Option<ExportResult>,
}

/// Result of one file in a batch.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Processed(Box<ProcessedFile>),
    Failed { name: String, error: PipelineError },
}

impl FileOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Processed(file) => &file.name,
            Self::Failed { name, .. } => name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed(_))
    }

    pub fn processed(&self) -> Option<&ProcessedFile> {
        match self {
            Self::Processed(file) => Some(file),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            Self::Processed(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Outcomes of a batch, one per uploaded file, in upload order.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// RFC 3339 timestamp of when the batch started.
    pub generated_at: String,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self {
            generated_at: Local::now().to_rfc3339(),
            files: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn get(&self, name: &str) -> Option<&FileOutcome> {
        self.files.iter().find(|f| f.name() == name)
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the whole pipeline on every file, isolating failures per file.
///
/// `request_for` supplies each file's [`FileRequest`].
pub fn process_batch<F>(
    files: &[UploadedFile],
    config: &PipelineConfig,
    mut request_for: F,
) -> BatchReport
where
    F: FnMut(&UploadedFile) -> FileRequest,
{
    info!("Processing {} uploaded files...", files.len());

    let mut report = BatchReport::new();
    for file in files {
        let request = request_for(file);
        let outcome = match process_file(file, &request, config) {
            Ok(processed) => FileOutcome::Processed(Box::new(processed)),
            Err(error) => {
                if error.is_recoverable() {
                    warn!("Skipping {}: {}", file.name, error);
                } else {
                    error!("Failed to process {}: {}", file.name, error);
                }
                FileOutcome::Failed {
                    name: file.name.clone(),
                    error,
                }
            }
        };
        report.files.push(outcome);
    }

    info!(
        "Batch finished: {} processed, {} failed",
        report.succeeded(),
        report.failed()
    );
    report
}

/// Run the pipeline on a single file.
pub fn process_file(
    file: &UploadedFile,
    request: &FileRequest,
    config: &PipelineConfig,
) -> Result<ProcessedFile> {
    let loaded = load_file(file, config)?;
    let preview = loaded.rows(0, config.preview_rows);

    let (cleaned, cleaning) = apply_all(loaded, &request.operations)?;
    let messages = cleaning
        .iter()
        .flat_map(|summary| summary.messages.iter().cloned())
        .collect();

    let table = match &request.columns {
        Some(columns) => project(&cleaned, columns.as_slice())?,
        None => cleaned,
    };

    let export = request
        .export
        .map(|format| export(&table, &ExportRequest::new(format, &file.name), config))
        .transpose()?;

    Ok(ProcessedFile {
        name: file.name.clone(),
        preview,
        columns: table.columns(),
        chart_columns: describe_numeric_columns(&table, config.chart_column_limit),
        table,
        cleaning,
        messages,
        export,
    })
}
