//! Data cleaning operations.
//!
//! Each [`CleaningOperation`] is triggered on its own and applied to exactly
//! one table. Operations are never chained automatically: removing duplicates
//! before or after filling missing values can give different tables, and the
//! caller's order is preserved.

mod dedup;

pub use dedup::remove_duplicates;

use crate::error::{PipelineError, Result};
use crate::imputers::{ColumnFill, StatisticalImputer};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// A stateless cleaning transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningOperation {
    /// Drop rows identical to an earlier row, keeping first occurrences.
    RemoveDuplicates,
    /// Replace missing numeric cells with their column's mean.
    FillMissingNumeric,
}

impl CleaningOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RemoveDuplicates => "remove-duplicates",
            Self::FillMissingNumeric => "fill-missing-numeric",
        }
    }
}

impl fmt::Display for CleaningOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleaningOperation {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "remove-duplicates" => Ok(Self::RemoveDuplicates),
            "fill-missing-numeric" => Ok(Self::FillMissingNumeric),
            other => Err(PipelineError::InvalidConfig(format!(
                "unknown cleaning operation '{other}'"
            ))),
        }
    }
}

/// What one cleaning operation did to a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub operation: CleaningOperation,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Columns filled by mean imputation.
    pub filled: Vec<ColumnFill>,
    /// Numeric columns left missing because they had no values to average.
    pub skipped_columns: Vec<String>,
    /// Human-readable confirmation messages.
    pub messages: Vec<String>,
}

impl CleaningSummary {
    pub fn rows_removed(&self) -> usize {
        self.rows_before - self.rows_after
    }

    pub fn cells_filled(&self) -> usize {
        self.filled.iter().map(|f| f.filled).sum()
    }
}

/// Apply one operation and return the cleaned table.
pub fn apply(table: Table, operation: CleaningOperation) -> Result<Table> {
    apply_with_summary(table, operation).map(|(table, _)| table)
}

/// Apply one operation, also reporting what changed.
pub fn apply_with_summary(
    table: Table,
    operation: CleaningOperation,
) -> Result<(Table, CleaningSummary)> {
    let rows_before = table.height();
    let mut messages = Vec::new();
    let mut filled = Vec::new();
    let mut skipped_columns = Vec::new();

    info!("Applying {}...", operation);

    let cleaned = match operation {
        CleaningOperation::RemoveDuplicates => {
            let frame = remove_duplicates(table.frame())?;
            let removed = rows_before - frame.height();
            if removed > 0 {
                let pct = (removed as f64 / rows_before as f64) * 100.0;
                messages.push(format!(
                    "Removed {} duplicate rows ({:.1}%)",
                    removed, pct
                ));
            } else {
                messages.push("No duplicate rows found".to_string());
            }
            debug!("Removed {} duplicate rows", removed);
            Table::new(frame)
        }
        CleaningOperation::FillMissingNumeric => {
            let (frame, report) =
                StatisticalImputer::fill_numeric_means(table.into_frame(), &mut messages)?;
            if report.filled.is_empty() && report.skipped.is_empty() {
                messages.push("No missing numeric values found".to_string());
            }
            debug!(
                "Filled {} cells across {} columns",
                report.cells_filled(),
                report.filled.len()
            );
            filled = report.filled;
            skipped_columns = report.skipped;
            Table::new(frame)
        }
    };

    let summary = CleaningSummary {
        operation,
        rows_before,
        rows_after: cleaned.height(),
        filled,
        skipped_columns,
        messages,
    };

    Ok((cleaned, summary))
}

/// Apply operations in the given order.
pub fn apply_all(
    table: Table,
    operations: &[CleaningOperation],
) -> Result<(Table, Vec<CleaningSummary>)> {
    let mut table = table;
    let mut summaries = Vec::with_capacity(operations.len());
    for &operation in operations {
        let (cleaned, summary) = apply_with_summary(table, operation)?;
        table = cleaned;
        summaries.push(summary);
    }
    Ok((table, summaries))
}
