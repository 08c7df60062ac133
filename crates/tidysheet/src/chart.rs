//! Numeric column selection for the bar-chart view.

use crate::error::Result;
use crate::table::Table;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One plottable column: a value per row, `None` where the cell is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Names of the first `limit` numeric columns, in table order.
pub fn describe_numeric_columns(table: &Table, limit: usize) -> Vec<String> {
    table
        .numeric_column_names()
        .into_iter()
        .take(limit)
        .collect()
}

/// Row values of the columns [`describe_numeric_columns`] picks.
pub fn chart_data(table: &Table, limit: usize) -> Result<Vec<ChartSeries>> {
    describe_numeric_columns(table, limit)
        .into_iter()
        .map(|name| -> Result<ChartSeries> {
            let floats = table
                .frame()
                .column(&name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            let values = floats.f64()?.into_iter().collect();
            Ok(ChartSeries { name, values })
        })
        .collect()
}
