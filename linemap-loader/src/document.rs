//! On-disk line-map documents.
//!
//! Document format (JSON shown; TOML files use the same keys):
//! ```text
//! {
//!   "source_name": "CSMIP_V2",
//!   "max_line": 17,
//!   "units": ["sec", "cm/sec"],
//!   "lines": [
//!     {"line": 6, "column_start": 21, "column_end": 27,
//!      "short_description": "station_lat",
//!      "long_description": "s t a t i o n   l a t i t u d e"}
//!   ]
//! }
//! ```
//!
//! - `short_description` is the field identifier
//! - `type` is optional; when omitted it is inferred from the identifier
//! - `units` on an entry replaces the document-level list for that entry
//! - composite entries carry a `decomposition` with a `strategy` of
//!   `tokens`, `offsets` or `pattern`

use std::fs;
use std::path::Path;

use linemaps_rs::{
    CapturePattern, DecompositionRule, FieldDescriptor, LineMapSchema, OffsetSubField,
    ScalarType, SchemaDraft, Separator, SubField, TypeHint,
};
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::infer::infer_scalar;

/// Top-level line-map document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineMapDocument {
    pub source_name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub max_line: Option<usize>,
    /// Default unit/label ignore-list for entries that declare none.
    #[serde(default)]
    pub units: Vec<String>,
    pub lines: Vec<LineEntry>,
}

/// One field entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineEntry {
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
    pub short_description: String,
    #[serde(default)]
    pub short_label: Option<String>,
    #[serde(default)]
    pub long_description: String,
    #[serde(default, rename = "type")]
    pub kind: Option<EntryType>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub units: Option<Vec<String>>,
    #[serde(default)]
    pub decomposition: Option<DecompositionEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Text,
    Integer,
    Real,
    DirectionalReal,
    Timestamp,
    Composite,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DecompositionEntry {
    Tokens {
        sub_fields: Vec<SubFieldEntry>,
        #[serde(default)]
        separator: Option<char>,
    },
    Offsets {
        sub_fields: Vec<SubFieldEntry>,
    },
    Pattern {
        pattern: String,
        sub_fields: Vec<SubFieldEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SubFieldEntry {
    pub identifier: String,
    #[serde(default, rename = "type")]
    pub kind: Option<EntryType>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

impl LineMapDocument {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a document, choosing TOML for `.toml` files and JSON otherwise.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }

    /// Convert entries into an unvalidated draft.
    pub fn to_draft(&self) -> Result<SchemaDraft, LoadError> {
        let fields = self
            .lines
            .iter()
            .map(|entry| entry.to_descriptor(&self.units))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SchemaDraft {
            source_name: self.source_name.clone(),
            version: self.version.clone(),
            declared_max_line: self.max_line,
            fields,
        })
    }

    /// Convert, validate and freeze.
    pub fn into_schema(self) -> Result<LineMapSchema, LoadError> {
        let schema = LineMapSchema::new(self.to_draft()?)?;
        info!(
            "loaded line map {} ({} fields, {} lines)",
            schema.source_name(),
            schema.len(),
            schema.max_line()
        );
        Ok(schema)
    }
}

impl LineEntry {
    fn to_descriptor(&self, default_units: &[String]) -> Result<FieldDescriptor, LoadError> {
        let id = &self.short_description;
        let kind = self.kind.unwrap_or_else(|| entry_type_of(&infer_scalar(id)));

        let type_hint = match (kind, &self.decomposition) {
            (EntryType::Composite, Some(decomposition)) => {
                TypeHint::Composite(decomposition.to_rule(id)?)
            }
            (EntryType::Composite, None) => {
                return Err(LoadError::entry(id, "composite entry needs a decomposition"));
            }
            (_, Some(_)) => {
                return Err(LoadError::entry(
                    id,
                    "decomposition is only allowed on composite entries",
                ));
            }
            (scalar, None) => TypeHint::Scalar(scalar_type(id, scalar, self.format.as_deref())?),
        };

        Ok(FieldDescriptor {
            line: self.line,
            column_start: self.column_start,
            column_end: self.column_end,
            identifier: id.clone(),
            short_label: self.short_label.clone().unwrap_or_else(|| id.clone()),
            description: self.long_description.clone(),
            type_hint,
            units: self
                .units
                .clone()
                .unwrap_or_else(|| default_units.to_vec()),
        })
    }
}

impl DecompositionEntry {
    fn to_rule(&self, parent: &str) -> Result<DecompositionRule, LoadError> {
        match self {
            DecompositionEntry::Tokens {
                sub_fields,
                separator,
            } => Ok(DecompositionRule::Tokens {
                sub_fields: sub_fields
                    .iter()
                    .map(|s| s.to_sub_field(parent))
                    .collect::<Result<_, _>>()?,
                separator: separator.map_or(Separator::Whitespace, Separator::Char),
            }),
            DecompositionEntry::Offsets { sub_fields } => {
                let parts = sub_fields
                    .iter()
                    .map(|s| {
                        let (Some(start), Some(end)) = (s.start, s.end) else {
                            return Err(LoadError::entry(
                                parent,
                                format!("offset sub-field '{}' needs start and end", s.identifier),
                            ));
                        };
                        Ok(OffsetSubField {
                            sub_field: s.to_sub_field(parent)?,
                            start,
                            end,
                        })
                    })
                    .collect::<Result<_, _>>()?;
                Ok(DecompositionRule::Offsets(parts))
            }
            DecompositionEntry::Pattern {
                pattern,
                sub_fields,
            } => Ok(DecompositionRule::Pattern {
                pattern: CapturePattern::new(pattern.as_str()),
                sub_fields: sub_fields
                    .iter()
                    .map(|s| s.to_sub_field(parent))
                    .collect::<Result<_, _>>()?,
            }),
        }
    }
}

impl SubFieldEntry {
    fn to_sub_field(&self, parent: &str) -> Result<SubField, LoadError> {
        let kind = self
            .kind
            .unwrap_or_else(|| entry_type_of(&infer_scalar(&self.identifier)));
        let label = format!("{parent}.{}", self.identifier);
        let scalar = scalar_type(&label, kind, self.format.as_deref())?;
        Ok(SubField::new(self.identifier.clone(), scalar))
    }
}

fn scalar_type(id: &str, kind: EntryType, format: Option<&str>) -> Result<ScalarType, LoadError> {
    match kind {
        EntryType::Text => Ok(ScalarType::Text),
        EntryType::Integer => Ok(ScalarType::Integer),
        EntryType::Real => Ok(ScalarType::Real),
        EntryType::DirectionalReal => Ok(ScalarType::DirectionalReal),
        EntryType::Timestamp => match format {
            Some(format) => Ok(ScalarType::Timestamp {
                format: format.to_string(),
            }),
            None => Err(LoadError::entry(id, "timestamp needs a format")),
        },
        EntryType::Composite => Err(LoadError::entry(id, "sub-fields cannot be composite")),
    }
}

fn entry_type_of(scalar: &ScalarType) -> EntryType {
    match scalar {
        ScalarType::Text => EntryType::Text,
        ScalarType::Integer => EntryType::Integer,
        ScalarType::Real => EntryType::Real,
        ScalarType::DirectionalReal => EntryType::DirectionalReal,
        ScalarType::Timestamp { .. } => EntryType::Timestamp,
    }
}
