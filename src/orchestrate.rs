//! Extraction orchestrator.
//!
//! Drives reader, extractor, decomposer and coercer over every field of a
//! validated line map. A bad field never stops the run: its error is kept
//! under its identifier and the next field is attempted.

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::Serialize;

use crate::coerce::coerce;
use crate::decompose::decompose;
use crate::error::FieldError;
use crate::extract::extract_field;
use crate::record::RawRecord;
use crate::schema::{FieldDescriptor, LineMapSchema, TypeHint};
use crate::value::{CompositeValue, Value};

/// Typed result of applying one line map to one record.
///
/// Every identifier of the schema appears in exactly one of `values` and
/// `errors`. All three collections keep the schema's declared field order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExtractedRecord {
    pub source_name: String,
    pub values: IndexMap<String, Value>,
    pub errors: IndexMap<String, FieldError>,
    /// Fields whose range was only partly present; their value came from
    /// the part that exists.
    pub truncated: IndexSet<String>,
}

impl ExtractedRecord {
    pub fn value(&self, identifier: &str) -> Option<&Value> {
        self.values.get(identifier)
    }

    pub fn error(&self, identifier: &str) -> Option<&FieldError> {
        self.errors.get(identifier)
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// All identifiers that were attempted.
    pub fn identifiers(&self) -> BTreeSet<&str> {
        self.values
            .keys()
            .chain(self.errors.keys())
            .map(String::as_str)
            .collect()
    }
}

/// Apply `schema` to `record`.
pub fn extract(schema: &LineMapSchema, record: &RawRecord) -> ExtractedRecord {
    let mut out = ExtractedRecord {
        source_name: schema.source_name().to_string(),
        ..ExtractedRecord::default()
    };

    for descriptor in schema.fields() {
        let field = extract_field(record, descriptor);
        let id = descriptor.identifier.clone();

        let Some(text) = field.raw.text else {
            debug!("{id}: line {} not present", descriptor.line);
            out.errors.insert(
                id,
                FieldError::Truncated {
                    line: descriptor.line,
                    column_start: descriptor.column_start,
                    column_end: descriptor.column_end,
                },
            );
            continue;
        };
        if field.truncated {
            out.truncated.insert(id.clone());
        }

        match field_value(descriptor, text) {
            Ok(value) => {
                out.values.insert(id, value);
            }
            Err(err) => {
                debug!("{id}: {err}");
                out.errors.insert(id, err);
            }
        }
    }

    if !out.is_clean() {
        warn!(
            "{}: {} of {} field(s) failed",
            out.source_name,
            out.errors.len(),
            schema.len()
        );
    }
    out
}

fn field_value(descriptor: &FieldDescriptor, text: &str) -> Result<Value, FieldError> {
    match &descriptor.type_hint {
        TypeHint::Scalar(scalar) => coerce(Some(text), scalar, &descriptor.units)
            .map_err(|e| FieldError::from_coercion(e, None)),
        TypeHint::Composite(rule) => {
            let parts = decompose(Some(text), rule, &descriptor.units);
            let mut composite = CompositeValue::new();
            for part in &parts.parts {
                let sub = part.sub_field;
                let value = coerce(part.text, &sub.scalar, &descriptor.units)
                    .map_err(|e| FieldError::from_coercion(e, Some(&sub.identifier)))?;
                composite.push(sub.identifier.clone(), value);
            }
            let missing = parts.missing();
            if missing.is_empty() {
                Ok(Value::Composite(composite))
            } else {
                Err(FieldError::Incomplete {
                    missing,
                    partial: composite,
                })
            }
        }
    }
}
