//! Line-map schema model.
//!
//! A line map is an ordered set of [`FieldDescriptor`]s. Each descriptor
//! names one logical field by its 1-based line and inclusive 1-based column
//! range:
//!
//! ```text
//! line 6, columns 13-17: station_number  (integer)
//! line 6, columns 21-27: station_lat     (directional real, "34.218N")
//! line 6, columns 30-37: station_long    (directional real, "118.471W")
//! ```
//!
//! Schemas are built in two steps. A [`SchemaDraft`] is plain, mutable data
//! handed over by a loader. [`LineMapSchema::new`] validates the draft and
//! freezes it; there is no way to obtain a `LineMapSchema` that failed
//! validation, and no way to mutate one afterwards.

use regex::Regex;

use crate::error::SchemaError;
use crate::validate::validate;

/// Scalar target types a raw slice can be coerced into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarType {
    Text,
    Integer,
    Real,
    /// A number whose sign comes from a trailing N/S/E/W letter.
    DirectionalReal,
    /// A date or date-time in the given strftime-style format.
    Timestamp { format: String },
}

impl ScalarType {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Text => "text",
            ScalarType::Integer => "integer",
            ScalarType::Real => "real",
            ScalarType::DirectionalReal => "directional_real",
            ScalarType::Timestamp { .. } => "timestamp",
        }
    }
}

/// How a descriptor's slice is turned into a value.
#[derive(Debug, Clone)]
pub enum TypeHint {
    Scalar(ScalarType),
    /// Several values packed into one column span.
    Composite(DecompositionRule),
}

impl TypeHint {
    pub fn name(&self) -> &'static str {
        match self {
            TypeHint::Scalar(s) => s.name(),
            TypeHint::Composite(_) => "composite",
        }
    }

    pub fn rule(&self) -> Option<&DecompositionRule> {
        match self {
            TypeHint::Composite(rule) => Some(rule),
            TypeHint::Scalar(_) => None,
        }
    }
}

/// One named output of a composite field. Sub-fields are always scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubField {
    pub identifier: String,
    pub scalar: ScalarType,
}

impl SubField {
    pub fn new(identifier: impl Into<String>, scalar: ScalarType) -> Self {
        Self {
            identifier: identifier.into(),
            scalar,
        }
    }
}

/// A sub-field addressed by 1-based inclusive offsets inside the parent slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetSubField {
    pub sub_field: SubField,
    pub start: usize,
    pub end: usize,
}

/// Separator used by token decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    /// Runs of whitespace.
    #[default]
    Whitespace,
    /// A single character; each piece is trimmed and empty pieces dropped.
    Char(char),
}

/// A regular expression with named capture groups.
///
/// Compilation happens at construction; a pattern that fails to compile is
/// kept so validation can report it alongside every other violation.
#[derive(Debug, Clone)]
pub struct CapturePattern {
    source: String,
    compiled: Result<Regex, regex::Error>,
}

impl CapturePattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source);
        Self { source, compiled }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.compiled.as_ref().ok()
    }

    pub fn compile_error(&self) -> Option<&regex::Error> {
        self.compiled.as_ref().err()
    }
}

/// Declarative rule for splitting a composite field into sub-values.
#[derive(Debug, Clone)]
pub enum DecompositionRule {
    /// Fixed relative sub-ranges.
    Offsets(Vec<OffsetSubField>),
    /// Tokens assigned left to right after dropping the field's ignore-list.
    Tokens {
        sub_fields: Vec<SubField>,
        separator: Separator,
    },
    /// Named capture groups; each sub-field takes the like-named group.
    Pattern {
        pattern: CapturePattern,
        sub_fields: Vec<SubField>,
    },
}

impl DecompositionRule {
    pub fn tokens(sub_fields: Vec<SubField>) -> Self {
        DecompositionRule::Tokens {
            sub_fields,
            separator: Separator::Whitespace,
        }
    }

    /// Sub-fields in rule order.
    pub fn sub_fields(&self) -> Vec<&SubField> {
        match self {
            DecompositionRule::Offsets(parts) => parts.iter().map(|p| &p.sub_field).collect(),
            DecompositionRule::Tokens { sub_fields, .. }
            | DecompositionRule::Pattern { sub_fields, .. } => sub_fields.iter().collect(),
        }
    }
}

/// One logical field of a line map.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
    pub identifier: String,
    pub short_label: String,
    /// Opaque documentation; never parsed.
    pub description: String,
    pub type_hint: TypeHint,
    /// Unit and label tokens ignored during coercion and token decomposition.
    pub units: Vec<String>,
}

impl FieldDescriptor {
    /// A text field with no label, description or units.
    pub fn new(
        line: usize,
        column_start: usize,
        column_end: usize,
        identifier: impl Into<String>,
    ) -> Self {
        let identifier = identifier.into();
        Self {
            line,
            column_start,
            column_end,
            short_label: identifier.clone(),
            identifier,
            description: String::new(),
            type_hint: TypeHint::Scalar(ScalarType::Text),
            units: Vec::new(),
        }
    }

    pub fn with_type(mut self, type_hint: TypeHint) -> Self {
        self.type_hint = type_hint;
        self
    }

    pub fn with_scalar(self, scalar: ScalarType) -> Self {
        self.with_type(TypeHint::Scalar(scalar))
    }

    pub fn with_units<I, S>(mut self, units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.units = units.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Unvalidated line map as produced by a loader.
#[derive(Debug, Clone, Default)]
pub struct SchemaDraft {
    pub source_name: String,
    pub version: Option<String>,
    /// Highest line the document claims to reference, if it says so.
    pub declared_max_line: Option<usize>,
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDraft {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Highest line number referenced by any field.
    pub fn referenced_max_line(&self) -> usize {
        self.fields.iter().map(|f| f.line).max().unwrap_or(0)
    }
}

/// A validated, immutable line map.
#[derive(Debug, Clone)]
pub struct LineMapSchema {
    source_name: String,
    version: Option<String>,
    max_line: usize,
    fields: Vec<FieldDescriptor>,
}

impl LineMapSchema {
    /// Validate a draft and freeze it.
    pub fn new(draft: SchemaDraft) -> Result<Self, SchemaError> {
        validate(&draft)?;
        let max_line = draft.referenced_max_line();
        Ok(Self {
            source_name: draft.source_name,
            version: draft.version,
            max_line,
            fields: draft.fields,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Highest line referenced by any field, recomputed at construction.
    pub fn max_line(&self) -> usize {
        self.max_line
    }

    /// Fields in declared order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, identifier: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.identifier == identifier)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<SchemaDraft> for LineMapSchema {
    type Error = SchemaError;

    fn try_from(draft: SchemaDraft) -> Result<Self, Self::Error> {
        LineMapSchema::new(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_line_is_recomputed() {
        let draft = SchemaDraft::new("T")
            .field(FieldDescriptor::new(3, 1, 10, "a"))
            .field(FieldDescriptor::new(7, 1, 10, "b"))
            .field(FieldDescriptor::new(2, 1, 10, "c"));
        let schema = LineMapSchema::new(draft).unwrap();
        assert_eq!(schema.max_line(), 7);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_fields_keep_declared_order() {
        let draft = SchemaDraft::new("T")
            .field(FieldDescriptor::new(9, 1, 10, "z"))
            .field(FieldDescriptor::new(1, 1, 10, "a"));
        let schema = LineMapSchema::new(draft).unwrap();
        let ids: Vec<&str> = schema.identifiers().collect();
        assert_eq!(ids, vec!["z", "a"]);
        assert_eq!(schema.field("a").map(|f| f.line), Some(1));
    }

    #[test]
    fn test_capture_pattern_keeps_compile_error() {
        let good = CapturePattern::new(r"(?P<timestep>\.\d+)\s*sec");
        assert!(good.regex().is_some());
        let bad = CapturePattern::new(r"(?P<open");
        assert!(bad.regex().is_none());
        assert!(bad.compile_error().is_some());
        assert_eq!(bad.as_str(), "(?P<open");
    }

    #[test]
    fn test_sub_fields_in_rule_order() {
        let rule = DecompositionRule::Offsets(vec![
            OffsetSubField {
                sub_field: SubField::new("value", ScalarType::Real),
                start: 1,
                end: 8,
            },
            OffsetSubField {
                sub_field: SubField::new("time", ScalarType::Real),
                start: 10,
                end: 16,
            },
        ]);
        let ids: Vec<&str> = rule
            .sub_fields()
            .iter()
            .map(|s| s.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["value", "time"]);
    }
}
