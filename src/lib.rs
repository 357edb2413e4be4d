//! # linemaps-rs
//!
//! Line-map driven extraction of typed fields from fixed-column text records.
//!
//! Strong-motion instrument headers (and many other legacy formats) store
//! each value at a fixed line and column range. A *line map* describes
//! those positions declaratively; this crate applies any line map to raw
//! text and returns typed values.
//!
//! ## Overview
//!
//! - **Schema**: ordered field descriptors (line, inclusive column range,
//!   identifier, type hint), validated once and then frozen
//! - **Reader**: 1-based column slicing that tolerates short or missing lines
//! - **Decomposer**: splits composite fields (value + unit + time) into
//!   named sub-values
//! - **Coercer**: text, integer, real, directional real (`34.2S`) and
//!   timestamps, with an explicit `Absent` marker for blank input
//! - **Orchestrator**: runs every field, collecting per-field errors instead
//!   of stopping at the first one
//!
//! ## Example
//!
//! ```
//! use linemaps_rs::{FieldDescriptor, LineMapSchema, RawRecord, ScalarType, SchemaDraft, Value, extract};
//!
//! let draft = SchemaDraft::new("DEMO")
//!     .field(FieldDescriptor::new(1, 1, 10, "station_name"))
//!     .field(FieldDescriptor::new(1, 12, 18, "station_lat").with_scalar(ScalarType::DirectionalReal));
//! let schema = LineMapSchema::new(draft).unwrap();
//!
//! let record = RawRecord::from_text("Sylmar     34.326N");
//! let out = extract(&schema, &record);
//!
//! assert_eq!(out.value("station_name"), Some(&Value::Text("Sylmar".to_string())));
//! assert_eq!(out.value("station_lat"), Some(&Value::Real(34.326)));
//! assert!(out.is_clean());
//! ```

pub mod coerce;
pub mod decompose;
pub mod error;
pub mod extract;
pub mod orchestrate;
pub mod record;
pub mod schema;
pub mod validate;
pub mod value;

pub use coerce::coerce;
pub use decompose::{Decomposition, SubSlice, decompose};
pub use error::{CoercionError, CoercionErrorKind, FieldError, SchemaError, Violation};
pub use extract::{FieldResult, extract_field};
pub use orchestrate::{ExtractedRecord, extract};
pub use record::{RawRecord, RawSlice, line_range};
pub use schema::{
    CapturePattern, DecompositionRule, FieldDescriptor, LineMapSchema, OffsetSubField,
    ScalarType, SchemaDraft, Separator, SubField, TypeHint,
};
pub use validate::validate;
pub use value::{CompositeValue, Value};
