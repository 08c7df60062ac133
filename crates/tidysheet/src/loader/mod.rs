//! Loader: decodes uploaded bytes into a [`Table`].
//!
//! Dispatch happens once, on the closed [`InputFormat`] resolved from the
//! file extension. Anything but `csv` and `xlsx` fails with
//! [`PipelineError::UnsupportedFormat`], which callers treat as a per-file
//! condition.

mod csv;
mod inference;
mod xlsx;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result, ResultExt};
use crate::format::{InputFormat, extension_of};
use crate::table::Table;
use tracing::info;

/// An uploaded file: a name plus its raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lowercased final dot-segment of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    /// Input format declared by the extension.
    pub fn format(&self) -> Result<InputFormat> {
        match self.extension() {
            Some(ext) => InputFormat::from_extension(&ext),
            None => Err(PipelineError::UnsupportedFormat(self.name.clone())),
        }
    }
}

/// Decode `bytes` according to a lowercase `extension`.
pub fn load(bytes: &[u8], extension: &str, config: &PipelineConfig) -> Result<Table> {
    let format = InputFormat::from_extension(extension)?;
    load_format(bytes, format, extension, config)
}

/// Decode an uploaded file, dispatching on its declared extension.
///
/// Errors carry the file name as context.
pub fn load_file(file: &UploadedFile, config: &PipelineConfig) -> Result<Table> {
    file.format()
        .and_then(|format| load_format(&file.bytes, format, &file.name, config))
        .context(&file.name)
}

fn load_format(
    bytes: &[u8],
    format: InputFormat,
    name: &str,
    config: &PipelineConfig,
) -> Result<Table> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput(name.to_string()));
    }

    let table = match format {
        InputFormat::Csv => csv::read_csv(bytes, name, config)?,
        InputFormat::Xlsx => xlsx::read_xlsx(bytes, name, config)?,
    };

    info!(
        "Loaded {} ({}): {} rows x {} columns",
        name,
        format,
        table.height(),
        table.width()
    );
    Ok(table)
}
