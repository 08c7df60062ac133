//! Configuration types for the cleaning and conversion pipeline.
//!
//! Every interaction passes a [`PipelineConfig`] explicitly; nothing is kept
//! in module-level state.

use serde::{Deserialize, Serialize};

/// Tokens read as missing values, in addition to blank cells.
pub const DEFAULT_NA_VALUES: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "none",
];

/// Characters Excel refuses in a worksheet name.
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Excel's worksheet name length limit.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Configuration for the pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tidysheet::config::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .csv_separator(b';')
///     .preview_rows(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Field separator used when reading CSV input.
    /// Default: `,`
    pub csv_separator: u8,

    /// Cell contents treated as missing values when loading.
    /// Default: [`DEFAULT_NA_VALUES`]
    pub na_values: Vec<String>,

    /// Zero-based index of the worksheet read from XLSX input.
    /// Default: 0 (first sheet)
    pub sheet_index: usize,

    /// Number of rows shown in a preview.
    /// Default: 5
    pub preview_rows: usize,

    /// Number of numeric columns handed to the chart collaborator.
    /// Default: 2
    pub chart_column_limit: usize,

    /// Worksheet name used for Excel exports.
    /// Default: "Sheet1"
    pub excel_sheet_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            csv_separator: b',',
            na_values: default_na_values(),
            sheet_index: 0,
            preview_rows: 5,
            chart_column_limit: 2,
            excel_sheet_name: "Sheet1".to_string(),
        }
    }
}

fn default_na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.preview_rows == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "preview_rows".to_string(),
                value: self.preview_rows,
            });
        }

        if self.chart_column_limit == 0 {
            return Err(ConfigValidationError::InvalidCount {
                field: "chart_column_limit".to_string(),
                value: self.chart_column_limit,
            });
        }

        if matches!(self.csv_separator, b'"' | b'\n' | b'\r') {
            return Err(ConfigValidationError::InvalidSeparator(
                self.csv_separator as char,
            ));
        }

        let name = &self.excel_sheet_name;
        if name.is_empty()
            || name.chars().count() > MAX_SHEET_NAME_LEN
            || name.contains(INVALID_SHEET_CHARS)
        {
            return Err(ConfigValidationError::InvalidSheetName(name.clone()));
        }

        Ok(())
    }

    /// Whether a raw cell value is one of the configured missing-value tokens.
    pub fn is_na_token(&self, value: &str) -> bool {
        self.na_values.iter().any(|token| token == value)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid CSV separator: {0:?}")]
    InvalidSeparator(char),

    #[error("Invalid worksheet name: '{0}' (1-31 characters, none of []:*?/\\)")]
    InvalidSheetName(String),
}

impl From<ConfigValidationError> for crate::error::PipelineError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::PipelineError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    csv_separator: Option<u8>,
    na_values: Option<Vec<String>>,
    sheet_index: Option<usize>,
    preview_rows: Option<usize>,
    chart_column_limit: Option<usize>,
    excel_sheet_name: Option<String>,
}

impl PipelineConfigBuilder {
    /// Set the field separator for CSV input.
    pub fn csv_separator(mut self, separator: u8) -> Self {
        self.csv_separator = Some(separator);
        self
    }

    /// Replace the list of missing-value tokens.
    ///
    /// Blank and whitespace-only cells are always missing, whatever the list.
    pub fn na_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Select the worksheet read from XLSX input.
    pub fn sheet_index(mut self, index: usize) -> Self {
        self.sheet_index = Some(index);
        self
    }

    /// Set the number of preview rows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set how many numeric columns are charted.
    pub fn chart_column_limit(mut self, limit: usize) -> Self {
        self.chart_column_limit = Some(limit);
        self
    }

    /// Set the worksheet name used for Excel exports.
    pub fn excel_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.excel_sheet_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            csv_separator: self.csv_separator.unwrap_or(b','),
            na_values: self.na_values.unwrap_or_else(default_na_values),
            sheet_index: self.sheet_index.unwrap_or(0),
            preview_rows: self.preview_rows.unwrap_or(5),
            chart_column_limit: self.chart_column_limit.unwrap_or(2),
            excel_sheet_name: self
                .excel_sheet_name
                .unwrap_or_else(|| "Sheet1".to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.csv_separator, b',');
        assert_eq!(config.sheet_index, 0);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.chart_column_limit, 2);
        assert_eq!(config.excel_sheet_name, "Sheet1");
        assert!(config.is_na_token("N/A"));
        assert!(!config.is_na_token("0"));
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PipelineConfig::builder()
            .csv_separator(b';')
            .na_values(["-", "?"])
            .sheet_index(2)
            .preview_rows(10)
            .chart_column_limit(3)
            .excel_sheet_name("Export")
            .build()
            .unwrap();

        assert_eq!(config.csv_separator, b';');
        assert!(config.is_na_token("?"));
        assert!(!config.is_na_token("NA"));
        assert_eq!(config.sheet_index, 2);
        assert_eq!(config.preview_rows, 10);
        assert_eq!(config.chart_column_limit, 3);
        assert_eq!(config.excel_sheet_name, "Export");
    }

    #[test]
    fn test_validation_zero_preview_rows() {
        let result = PipelineConfig::builder().preview_rows(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidCount { .. }
        ));
    }

    #[test]
    fn test_validation_sheet_name() {
        assert!(PipelineConfig::builder().excel_sheet_name("").build().is_err());
        assert!(
            PipelineConfig::builder()
                .excel_sheet_name("a/b")
                .build()
                .is_err()
        );
        assert!(
            PipelineConfig::builder()
                .excel_sheet_name("x".repeat(32))
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_validation_quote_separator() {
        let result = PipelineConfig::builder().csv_separator(b'"').build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidSeparator('"')
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "csv_separator": 59,
            "na_values": ["-"],
            "sheet_index": 1,
            "preview_rows": 3,
            "chart_column_limit": 1,
            "excel_sheet_name": "Data"
        }"#;

        let config: PipelineConfig =
            serde_json::from_str(json).expect("Should deserialize from frontend JSON");

        assert_eq!(config.csv_separator, b';');
        assert_eq!(config.na_values, vec!["-".to_string()]);
        assert_eq!(config.sheet_index, 1);
        assert_eq!(config.preview_rows, 3);
        assert_eq!(config.chart_column_limit, 1);
        assert_eq!(config.excel_sheet_name, "Data");
        assert!(config.validate().is_ok());
    }
}
