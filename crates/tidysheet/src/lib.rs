//! Tabular Cleaning & Conversion Pipeline
//!
//! Load uploaded CSV or Excel files into tables, clean them, keep a subset of
//! columns and export the result as CSV or Excel, built with Rust and Polars.
//!
//! # Overview
//!
//! Each stage takes a [`Table`] and hands a new one to the next:
//!
//! - **Loader**: decodes `csv` and `xlsx` bytes, inferring numeric columns
//! - **Cleaner**: removes duplicate rows or fills missing numeric cells with
//!   the column mean, one explicitly triggered [`CleaningOperation`] at a time
//! - **Projector**: restricts a table to the selected columns, in order
//! - **Exporter**: serializes to CSV or Excel with a MIME type and filename
//!
//! [`process_batch`] runs the stages over several uploaded files, isolating
//! failures per file.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tidysheet::{
//!     CleaningOperation, ExportFormat, ExportRequest, PipelineConfig, apply, export, load,
//!     project,
//! };
//!
//! let config = PipelineConfig::default();
//! let bytes = std::fs::read("sales.csv")?;
//!
//! let table = load(&bytes, "csv", &config)?;
//! let table = apply(table, CleaningOperation::RemoveDuplicates)?;
//! let table = apply(table, CleaningOperation::FillMissingNumeric)?;
//! let table = project(&table, &["region", "amount"])?;
//!
//! let result = export(&table, &ExportRequest::new(ExportFormat::Excel, "sales.csv"), &config)?;
//! assert_eq!(result.filename, "sales.xlsx");
//! ```
//!
//! # Batches
//!
//! ```rust,ignore
//! use tidysheet::{FileRequest, PipelineConfig, UploadedFile, process_batch};
//!
//! let files = vec![
//!     UploadedFile::new("a.csv", std::fs::read("a.csv")?),
//!     UploadedFile::new("notes.txt", std::fs::read("notes.txt")?),
//! ];
//!
//! let report = process_batch(&files, &PipelineConfig::default(), |_| FileRequest::new());
//! for outcome in &report.files {
//!     match outcome.error() {
//!         Some(e) => println!("{}: {}", outcome.name(), e),
//!         None => println!("{}: ok", outcome.name()),
//!     }
//! }
//! ```

pub mod batch;
pub mod chart;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod exporter;
pub mod format;
pub mod imputers;
pub mod loader;
pub mod projector;
pub mod table;
pub mod utils;

// Re-exports for convenient access
pub use batch::{BatchReport, FileOutcome, FileRequest, ProcessedFile, process_batch, process_file};
pub use chart::{ChartSeries, chart_data, describe_numeric_columns};
pub use cleaner::{CleaningOperation, CleaningSummary, apply, apply_all, apply_with_summary};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder};
pub use error::{PipelineError, Result as PipelineResult, ResultExt};
pub use exporter::{ExportRequest, ExportResult, export};
pub use format::{ExportFormat, InputFormat, list_supported_input_formats};
pub use imputers::StatisticalImputer;
pub use loader::{UploadedFile, load, load_file};
pub use projector::{default_selection, project};
pub use table::{ColumnKind, ColumnSummary, RowWindow, Table};
