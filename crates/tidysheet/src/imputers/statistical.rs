//! Statistical imputation methods.

use crate::error::Result;
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One column filled by imputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFill {
    pub column: String,
    /// Mean of the column's original non-missing values.
    pub mean: f64,
    /// Number of cells that were missing and now hold `mean`.
    pub filled: usize,
}

/// Outcome of a mean-imputation pass over a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImputationReport {
    pub filled: Vec<ColumnFill>,
    /// Numeric columns with no values at all; they are left missing.
    pub skipped: Vec<String>,
}

impl ImputationReport {
    pub fn cells_filled(&self) -> usize {
        self.filled.iter().map(|f| f.filled).sum()
    }
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing cells of every numeric column with that column's mean.
    ///
    /// All means are taken from the incoming frame before any cell is
    /// replaced. Text columns are untouched, as are numeric columns without
    /// missing cells (they keep their dtype). Filled columns become `Float64`.
    pub fn fill_numeric_means(
        df: DataFrame,
        processing_steps: &mut Vec<String>,
    ) -> Result<(DataFrame, ImputationReport)> {
        let mut df = df;
        let mut report = ImputationReport::default();

        let targets: Vec<(String, usize, Option<f64>)> = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()) && col.null_count() > 0)
            .map(|col| {
                (
                    col.name().to_string(),
                    col.null_count(),
                    col.as_materialized_series().mean(),
                )
            })
            .collect();

        for (col_name, missing, mean) in targets {
            let Some(mean) = mean else {
                processing_steps.push(format!(
                    "Left '{}' unchanged: no values to average",
                    col_name
                ));
                report.skipped.push(col_name);
                continue;
            };

            let filled = Self::fill_with_value(df.column(&col_name)?.as_materialized_series(), mean)?;
            df.replace(&col_name, filled)?;

            processing_steps.push(format!(
                "Filled '{}' with mean: {:.2}",
                col_name, mean
            ));
            report.filled.push(ColumnFill {
                column: col_name,
                mean,
                filled: missing,
            });
        }

        Ok((df, report))
    }

    /// Replace nulls in a numeric series with `fill_value`, as `Float64`.
    fn fill_with_value(series: &Series, fill_value: f64) -> PolarsResult<Series> {
        let floats = series.cast(&DataType::Float64)?;
        let values: Vec<f64> = floats
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(fill_value))
            .collect();
        Ok(Series::new(series.name().clone(), values))
    }
}
