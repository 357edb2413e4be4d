//! Line-map loading for linemaps-rs.
//!
//! This crate sits between storage and the version-agnostic extraction
//! engine. It parses line-map documents (JSON or TOML), infers type hints
//! from identifier conventions, and selects a line map by
//! [`FormatVersion`]. The CSMIP Volume 2 header map ships built in.
//!
//! ```
//! use linemap_loader::{FormatVersion, SchemaSource};
//! use linemaps_rs::{RawRecord, extract};
//!
//! let schema = FormatVersion::CsmipV2.load().unwrap();
//! let record = RawRecord::from_text("CORRECTED ACCELEROGRAM  24278-S1743-94017.02     CHAN  1:  90 DEG");
//! let out = extract(&schema, &record);
//!
//! let title = out.value("vol2_title").and_then(|v| v.as_composite()).unwrap();
//! assert_eq!(title.get("record_id").and_then(|v| v.as_text()), Some("24278-S1743-94017.02"));
//! // every other line is missing from this one-line record
//! assert_eq!(out.errors.len(), schema.len() - 1);
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod format;
pub mod infer;

pub use document::{DecompositionEntry, EntryType, LineEntry, LineMapDocument, SubFieldEntry};
pub use error::LoadError;
pub use format::{CSMIP_V2_LINEMAP, FormatVersion, SchemaSource};
pub use infer::infer_scalar;
