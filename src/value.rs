//! Typed values produced by extraction.

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A typed field value.
///
/// `Absent` marks a field that was blank or missing in the source. It is
/// never collapsed into a zero so callers can tell "recorded as 0" apart
/// from "not recorded".
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Absent,
    Text(String),
    Integer(i64),
    Real(f64),
    Timestamp(NaiveDateTime),
    Composite(CompositeValue),
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Real value, widening integers.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(x) => Some(*x),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeValue> {
        match self {
            Value::Composite(c) => Some(c),
            _ => None,
        }
    }
}

/// Sub-values of a composite field, kept in decomposition-rule order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeValue {
    entries: Vec<(String, Value)>,
}

impl CompositeValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sub_identifier: impl Into<String>, value: Value) {
        self.entries.push((sub_identifier.into(), value));
    }

    pub fn get(&self, sub_identifier: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(id, _)| id == sub_identifier)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CompositeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
