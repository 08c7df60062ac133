//! Duplicate row removal.

use crate::error::Result;
use polars::prelude::*;

/// Drop rows fully identical to an earlier row.
///
/// Rows are compared value-wise across all columns, missing cells equal to
/// missing cells. First occurrences are kept in their original order.
pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame> {
    if df.width() == 0 || df.height() < 2 {
        return Ok(df.clone());
    }
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}
