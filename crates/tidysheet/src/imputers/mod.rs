//! Imputation module for handling missing values.
//!
//! Only mean imputation of numeric columns is offered; text columns keep
//! their missing cells.

mod statistical;

pub use statistical::{ColumnFill, ImputationReport, StatisticalImputer};
