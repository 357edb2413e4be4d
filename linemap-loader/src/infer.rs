//! Type-hint inference from identifier naming conventions.
//!
//! Used only when a line-map entry does not state its `type`. Descriptions
//! are never consulted: historical line maps were transcribed from printed
//! format documents and their free text is not reliable.

use linemaps_rs::ScalarType;

const DIRECTIONAL_SUFFIXES: &[&str] = &["_lat", "_latitude", "_long", "_lon", "_longitude"];
const INTEGER_SUFFIXES: &[&str] = &["_num", "_number", "_count"];
const INTEGER_PREFIXES: &[&str] = &["num_of_", "total_num_"];
const REAL_SUFFIXES: &[&str] = &["_period", "_pga", "_rms", "_length", "_damping"];
const REAL_NAMES: &[&str] = &["damping", "sensitivity"];

/// Scalar type implied by an identifier.
pub fn infer_scalar(identifier: &str) -> ScalarType {
    let id = identifier.to_ascii_lowercase();
    if DIRECTIONAL_SUFFIXES.iter().any(|s| id.ends_with(s)) {
        ScalarType::DirectionalReal
    } else if INTEGER_SUFFIXES.iter().any(|s| id.ends_with(s))
        || INTEGER_PREFIXES.iter().any(|p| id.starts_with(p))
    {
        ScalarType::Integer
    } else if REAL_SUFFIXES.iter().any(|s| id.ends_with(s)) || REAL_NAMES.contains(&id.as_str()) {
        ScalarType::Real
    } else {
        ScalarType::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directional() {
        assert_eq!(infer_scalar("station_lat"), ScalarType::DirectionalReal);
        assert_eq!(infer_scalar("station_long"), ScalarType::DirectionalReal);
        assert_eq!(infer_scalar("Epicenter_Longitude"), ScalarType::DirectionalReal);
    }

    #[test]
    fn test_integer() {
        assert_eq!(infer_scalar("station_number"), ScalarType::Integer);
        assert_eq!(infer_scalar("instrument_serial_num"), ScalarType::Integer);
        assert_eq!(infer_scalar("num_of_channels"), ScalarType::Integer);
        assert_eq!(infer_scalar("total_num_channels"), ScalarType::Integer);
    }

    #[test]
    fn test_real() {
        assert_eq!(infer_scalar("transducer_period"), ScalarType::Real);
        assert_eq!(infer_scalar("vol1_pga"), ScalarType::Real);
        assert_eq!(infer_scalar("damping"), ScalarType::Real);
        assert_eq!(infer_scalar("sensitivity"), ScalarType::Real);
    }

    #[test]
    fn test_everything_else_is_text() {
        assert_eq!(infer_scalar("eq_name"), ScalarType::Text);
        assert_eq!(infer_scalar("eq_origin_time"), ScalarType::Text);
        assert_eq!(infer_scalar("latitude_note"), ScalarType::Text);
    }
}
