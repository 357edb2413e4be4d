//! Composite-field decomposition.
//!
//! A composite field packs several values into one column span, e.g.
//!
//! ```text
//! Peak acceleration =  -296.14 cm/sec/sec  at   8.340 sec
//! ```
//!
//! holds a magnitude, its unit and the time of the peak. A
//! [`DecompositionRule`] splits such a slice into named sub-slices. Only one
//! level of splitting exists; sub-fields are scalar.

use log::debug;

use crate::coerce::is_unit;
use crate::schema::{DecompositionRule, Separator, SubField};

/// One sub-field and the text found for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubSlice<'r, 'a> {
    pub sub_field: &'r SubField,
    pub text: Option<&'a str>,
}

/// Result of applying a rule to a slice, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition<'r, 'a> {
    pub parts: Vec<SubSlice<'r, 'a>>,
}

impl<'r, 'a> Decomposition<'r, 'a> {
    /// Sub-identifiers that received no text.
    pub fn missing(&self) -> Vec<String> {
        self.parts
            .iter()
            .filter(|p| p.text.is_none())
            .map(|p| p.sub_field.identifier.clone())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.parts.iter().all(|p| p.text.is_some())
    }

    pub fn get(&self, sub_identifier: &str) -> Option<&'a str> {
        self.parts
            .iter()
            .find(|p| p.sub_field.identifier == sub_identifier)
            .and_then(|p| p.text)
    }
}

/// Split `raw` by `rule`. `units` is the field's ignore-list for token rules.
///
/// An absent slice yields every sub-field as missing.
pub fn decompose<'r, 'a>(
    raw: Option<&'a str>,
    rule: &'r DecompositionRule,
    units: &[String],
) -> Decomposition<'r, 'a> {
    let parts = match (raw, rule) {
        (None, _) => rule
            .sub_fields()
            .into_iter()
            .map(|sub_field| SubSlice {
                sub_field,
                text: None,
            })
            .collect(),
        (Some(raw), DecompositionRule::Offsets(offsets)) => offsets
            .iter()
            .map(|o| SubSlice {
                sub_field: &o.sub_field,
                text: relative_range(raw, o.start, o.end),
            })
            .collect(),
        (
            Some(raw),
            DecompositionRule::Tokens {
                sub_fields,
                separator,
            },
        ) => assign_tokens(raw, sub_fields, *separator, units),
        (
            Some(raw),
            DecompositionRule::Pattern {
                pattern,
                sub_fields,
            },
        ) => {
            let captures = pattern.regex().and_then(|re| re.captures(raw));
            sub_fields
                .iter()
                .map(|sub_field| SubSlice {
                    sub_field,
                    text: captures
                        .as_ref()
                        .and_then(|c| c.name(&sub_field.identifier))
                        .map(|m| m.as_str()),
                })
                .collect()
        }
    };
    Decomposition { parts }
}

/// Tokens of `raw` that survive the ignore-list, in order.
pub fn tokenize<'a>(raw: &'a str, separator: Separator, units: &[String]) -> Vec<&'a str> {
    let pieces: Vec<&str> = match separator {
        Separator::Whitespace => raw.split_whitespace().collect(),
        Separator::Char(c) => raw
            .split(c)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect(),
    };
    pieces.into_iter().filter(|t| !is_unit(t, units)).collect()
}

fn assign_tokens<'r, 'a>(
    raw: &'a str,
    sub_fields: &'r [SubField],
    separator: Separator,
    units: &[String],
) -> Vec<SubSlice<'r, 'a>> {
    let tokens = tokenize(raw, separator, units);
    if tokens.len() > sub_fields.len() {
        debug!(
            "dropping {} surplus token(s): {:?}",
            tokens.len() - sub_fields.len(),
            &tokens[sub_fields.len()..]
        );
    }
    sub_fields
        .iter()
        .enumerate()
        .map(|(i, sub_field)| SubSlice {
            sub_field,
            text: tokens.get(i).copied(),
        })
        .collect()
}

/// 1-based inclusive sub-range of `raw`; a range starting past the end is
/// missing, one ending past the end keeps what exists.
fn relative_range(raw: &str, start: usize, end: usize) -> Option<&str> {
    if start == 0 || start > end {
        return None;
    }
    let mut indices = raw.char_indices().map(|(i, _)| i).chain([raw.len()]);
    let from = indices.nth(start - 1)?;
    if from == raw.len() {
        return None;
    }
    let to = indices.nth(end - start).unwrap_or(raw.len());
    Some(&raw[from..to])
}
