//! Error types for the tabular cleaning and conversion pipeline.
//!
//! Every stage reports failures through [`PipelineError`], built with
//! `thiserror`. Errors are serializable as `{code, message}` so a hosting UI
//! can show a per-file message without parsing display strings.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input or output extension is neither `csv` nor `xlsx`.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// A requested column does not exist in the table.
    #[error("Column '{0}' not found in table")]
    UnknownColumn(String),

    /// A column was requested more than once in a selection.
    #[error("Column '{0}' selected more than once")]
    DuplicateColumn(String),

    /// The uploaded content holds no data at all.
    #[error("No data to load from '{0}'")]
    EmptyInput(String),

    /// The decoder rejected the uploaded bytes.
    #[error("Failed to load {format} data: {reason}")]
    LoadFailed { format: String, reason: String },

    /// Serialization to the target format failed.
    #[error("Failed to export {format} data: {reason}")]
    ExportFailed { format: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::UnknownColumn(_) => "UNKNOWN_COLUMN",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::ExportFailed { .. } => "EXPORT_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is an unsupported format, at any context depth.
    pub fn is_unsupported_format(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_) => true,
            Self::WithContext { source, .. } => source.is_unsupported_format(),
            _ => false,
        }
    }

    /// Check if this error is caused by user input rather than a fault in the
    /// pipeline. Such errors skip the offending file and leave the batch going.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_)
            | Self::UnknownColumn(_)
            | Self::DuplicateColumn(_)
            | Self::EmptyInput(_)
            | Self::LoadFailed { .. }
            | Self::InvalidConfig(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PipelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PipelineError::Polars(e).with_context(context))
    }
}
