//! Type coercion of raw slices into typed values.
//!
//! Trimming happens here, never in the reader. Blank numeric input coerces
//! to [`Value::Absent`]; only non-blank text that fails to parse is an
//! error.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::CoercionError;
use crate::schema::ScalarType;
use crate::value::Value;

/// Coerce an optional raw slice. `None` means the text was not in the record.
pub fn coerce(
    raw: Option<&str>,
    scalar: &ScalarType,
    units: &[String],
) -> Result<Value, CoercionError> {
    let Some(raw) = raw else {
        return Ok(Value::Absent);
    };
    match scalar {
        ScalarType::Text => Ok(Value::Text(raw.trim().to_string())),
        ScalarType::Integer => coerce_integer(raw, units),
        ScalarType::Real => coerce_real(raw, units),
        ScalarType::DirectionalReal => coerce_directional(raw, units),
        ScalarType::Timestamp { format } => coerce_timestamp(raw, format),
    }
}

/// Parse an integer, accepting a leading sign and one trailing unit token.
pub fn coerce_integer(raw: &str, units: &[String]) -> Result<Value, CoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Absent);
    }
    let number = strip_unit(trimmed, units);
    number
        .parse::<i64>()
        .map(Value::Integer)
        .map_err(|_| CoercionError::not_numeric(trimmed))
}

/// Parse a finite real, accepting a leading sign and one trailing unit token.
pub fn coerce_real(raw: &str, units: &[String]) -> Result<Value, CoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Absent);
    }
    parse_real(strip_unit(trimmed, units))
        .map(Value::Real)
        .ok_or_else(|| CoercionError::not_numeric(trimmed))
}

/// Parse a real whose sign may come from a trailing N/S/E/W.
///
/// `S` and `W` negate the magnitude. A missing letter leaves it unsigned.
pub fn coerce_directional(raw: &str, units: &[String]) -> Result<Value, CoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Absent);
    }

    let (magnitude, sign) = match trimmed.chars().last().map(|c| c.to_ascii_uppercase()) {
        Some('N') | Some('E') => (&trimmed[..trimmed.len() - 1], 1.0),
        Some('S') | Some('W') => (&trimmed[..trimmed.len() - 1], -1.0),
        _ => (trimmed, 1.0),
    };
    let magnitude = magnitude.trim_end().trim_end_matches(',').trim();

    parse_real(strip_unit(magnitude, units))
        .map(|x| Value::Real(sign * x))
        .ok_or_else(|| CoercionError::not_numeric(trimmed))
}

/// Parse a date or date-time with a strftime-style format.
///
/// Internal whitespace runs are collapsed to one space first. A date-only
/// format yields midnight.
pub fn coerce_timestamp(raw: &str, format: &str) -> Result<Value, CoercionError> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Ok(Value::Absent);
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(&normalized, format) {
        return Ok(Value::Timestamp(ts));
    }
    NaiveDate::parse_from_str(&normalized, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(Value::Timestamp)
        .ok_or_else(|| CoercionError::bad_timestamp(raw.trim()))
}

/// Remove one trailing unit, either as its own token or attached to the number.
///
/// Matching is case-insensitive. Longer units are tried first so `cm/sec`
/// wins over `sec`.
pub fn strip_unit<'a>(text: &'a str, units: &[String]) -> &'a str {
    if units.is_empty() {
        return text;
    }

    if let Some((head, last)) = text.rsplit_once(char::is_whitespace)
        && is_unit(last, units)
    {
        return head.trim_end();
    }

    let mut by_length: Vec<&String> = units.iter().collect();
    by_length.sort_by_key(|u| std::cmp::Reverse(u.len()));
    for unit in by_length {
        if unit.is_empty() || text.len() <= unit.len() {
            continue;
        }
        let split = text.len() - unit.len();
        if text.is_char_boundary(split) && text[split..].eq_ignore_ascii_case(unit) {
            return text[..split].trim_end();
        }
    }
    text
}

/// Case-insensitive membership test against an ignore-list.
pub fn is_unit(token: &str, units: &[String]) -> bool {
    units.iter().any(|u| u.eq_ignore_ascii_case(token))
}

fn parse_real(text: &str) -> Option<f64> {
    let plausible = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && text.chars().any(|c| c.is_ascii_digit());
    if !plausible {
        return None;
    }
    text.parse::<f64>().ok().filter(|x| x.is_finite())
}
