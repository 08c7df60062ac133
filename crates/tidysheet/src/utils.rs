//! Shared helpers for cell parsing and value conversion.

use polars::prelude::*;
use serde_json::{Number, Value};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// A number parsed out of a text cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    Int(i64),
    Float(f64),
}

impl ParsedNumber {
    /// Value widened to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

/// Parse a text cell as a number.
///
/// Surrounding whitespace is ignored. Integers without a decimal point or
/// exponent stay integral; anything else `f64` accepts is a float.
pub fn parse_number(s: &str) -> Option<ParsedNumber> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(ParsedNumber::Int(i));
    }
    trimmed.parse::<f64>().ok().map(ParsedNumber::Float)
}

/// Check if a string can be parsed as a numeric value.
pub fn is_numeric_string(s: &str) -> bool {
    parse_number(s).is_some()
}

// =============================================================================
// Value Conversion Utilities
// =============================================================================

/// Converts a Polars `AnyValue` to a JSON `Value`.
///
/// NaN and infinite floats become `null`; temporal and nested values are
/// stringified.
pub fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),

        AnyValue::Int8(i) => Value::Number(i.into()),
        AnyValue::Int16(i) => Value::Number(i.into()),
        AnyValue::Int32(i) => Value::Number(i.into()),
        AnyValue::Int64(i) => Value::Number(i.into()),

        AnyValue::UInt8(u) => Value::Number(u.into()),
        AnyValue::UInt16(u) => Value::Number(u.into()),
        AnyValue::UInt32(u) => Value::Number(u.into()),
        AnyValue::UInt64(u) => Value::Number(u.into()),

        AnyValue::Float32(f) => Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AnyValue::Float64(f) => Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),

        AnyValue::String(s) => Value::String(s.to_string()),
        AnyValue::StringOwned(s) => Value::String(s.to_string()),

        _ => Value::String(format!("{}", value)),
    }
}

// =============================================================================
// Tests
// =============================================================================
