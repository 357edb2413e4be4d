//! Error types for line-map validation and per-field extraction.
//!
//! Two tiers exist. [`SchemaError`] is fatal: a line map that produces one is
//! never used for extraction. [`FieldError`] is recoverable: the orchestrator
//! records it against a single identifier and moves on to the next field.

use serde::Serialize;
use thiserror::Error;

use crate::value::CompositeValue;

/// A single structural problem found while validating a line map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("line map declares no fields")]
    EmptySchema,

    #[error("field #{index} has an empty identifier")]
    EmptyIdentifier { index: usize },

    #[error("identifier '{identifier}' is declared more than once (fields #{first} and #{second})")]
    DuplicateIdentifier {
        identifier: String,
        first: usize,
        second: usize,
    },

    #[error("field '{identifier}': line numbers are 1-based, got 0")]
    ZeroLine { identifier: String },

    #[error("field '{identifier}': columns are 1-based, got column_start 0")]
    ZeroColumn { identifier: String },

    #[error("field '{identifier}': column_start {column_start} is after column_end {column_end}")]
    InvertedColumns {
        identifier: String,
        column_start: usize,
        column_end: usize,
    },

    #[error(
        "fields '{first}' and '{second}' both read line {line}, columns {column_start}-{column_end}"
    )]
    IdenticalRange {
        first: String,
        second: String,
        line: usize,
        column_start: usize,
        column_end: usize,
    },

    #[error("composite field '{identifier}' has no sub-fields")]
    EmptyDecomposition { identifier: String },

    #[error("composite field '{identifier}' declares sub-field '{sub_identifier}' more than once")]
    DuplicateSubField {
        identifier: String,
        sub_identifier: String,
    },

    #[error("composite field '{identifier}': sub-field '{sub_identifier}' has invalid offsets {start}-{end}")]
    InvalidSubRange {
        identifier: String,
        sub_identifier: String,
        start: usize,
        end: usize,
    },

    #[error("composite field '{identifier}': pattern does not compile: {reason}")]
    InvalidPattern { identifier: String, reason: String },

    #[error("composite field '{identifier}': pattern has no capture group named '{sub_identifier}'")]
    UnknownCapture {
        identifier: String,
        sub_identifier: String,
    },

    #[error("declared max_line {declared} does not match the highest referenced line {actual}")]
    MaxLineMismatch { declared: usize, actual: usize },
}

/// Fatal validation failure carrying every violation found, in detection order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "line map '{source_name}' failed validation with {} violation(s){}",
    .violations.len(),
    render_violations(.violations)
)]
pub struct SchemaError {
    pub source_name: String,
    pub violations: Vec<Violation>,
}

fn render_violations(violations: &[Violation]) -> String {
    violations.iter().map(|v| format!("\n  - {v}")).collect()
}

/// What went wrong when converting raw text to a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionErrorKind {
    #[error("not numeric")]
    NotNumeric,
    #[error("not a timestamp")]
    BadTimestamp,
}

/// Coercion failure with the offending text preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: cannot coerce '{raw_text}'")]
pub struct CoercionError {
    pub kind: CoercionErrorKind,
    pub raw_text: String,
}

impl CoercionError {
    pub fn not_numeric(raw_text: impl Into<String>) -> Self {
        Self {
            kind: CoercionErrorKind::NotNumeric,
            raw_text: raw_text.into(),
        }
    }

    pub fn bad_timestamp(raw_text: impl Into<String>) -> Self {
        Self {
            kind: CoercionErrorKind::BadTimestamp,
            raw_text: raw_text.into(),
        }
    }
}

/// Recoverable, per-field extraction failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldError {
    /// The requested line or column range is not present in the record.
    #[error("line {line}, columns {column_start}-{column_end} not present in record")]
    Truncated {
        line: usize,
        column_start: usize,
        column_end: usize,
    },

    /// The decomposition rule expected more values than the slice held.
    #[error("missing sub-fields: {}", .missing.join(", "))]
    Incomplete {
        missing: Vec<String>,
        partial: CompositeValue,
    },

    #[error("not numeric{}: '{raw_text}'", sub_suffix(.sub_field))]
    NotNumeric {
        raw_text: String,
        sub_field: Option<String>,
    },

    #[error("not a timestamp{}: '{raw_text}'", sub_suffix(.sub_field))]
    BadTimestamp {
        raw_text: String,
        sub_field: Option<String>,
    },
}

impl FieldError {
    /// Wrap a coercion failure, naming the sub-field when it came from a composite.
    pub fn from_coercion(err: CoercionError, sub_field: Option<&str>) -> Self {
        let sub_field = sub_field.map(str::to_string);
        match err.kind {
            CoercionErrorKind::NotNumeric => FieldError::NotNumeric {
                raw_text: err.raw_text,
                sub_field,
            },
            CoercionErrorKind::BadTimestamp => FieldError::BadTimestamp {
                raw_text: err.raw_text,
                sub_field,
            },
        }
    }
}

fn sub_suffix(sub_field: &Option<String>) -> String {
    match sub_field {
        Some(s) => format!(" (sub-field '{s}')"),
        None => String::new(),
    }
}
