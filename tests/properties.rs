//! Property tests for the extraction engine.

use std::collections::BTreeSet;

use linemaps_rs::{
    DecompositionRule, FieldDescriptor, FieldError, LineMapSchema, RawRecord, ScalarType,
    SchemaDraft, SubField, TypeHint, Value, extract,
};
use proptest::prelude::*;

/// Up to 8 fields on lines 1..=6, columns within 1..=40, unique identifiers
/// and no identical ranges.
fn arb_schema() -> impl Strategy<Value = LineMapSchema> {
    prop::collection::vec((1usize..=6, 1usize..=40, 0usize..=12, 0u8..4), 1..8).prop_map(
        |specs| {
            let mut draft = SchemaDraft::new("PROP");
            let mut ranges = BTreeSet::new();
            for (i, (line, start, width, kind)) in specs.into_iter().enumerate() {
                let end = start + width;
                if !ranges.insert((line, start, end)) {
                    continue;
                }
                let scalar = match kind {
                    0 => ScalarType::Text,
                    1 => ScalarType::Integer,
                    2 => ScalarType::Real,
                    _ => ScalarType::DirectionalReal,
                };
                draft = draft.field(FieldDescriptor::new(line, start, end, format!("f{i}")).with_scalar(scalar));
            }
            LineMapSchema::new(draft).unwrap()
        },
    )
}

fn arb_record() -> impl Strategy<Value = RawRecord> {
    prop::collection::vec("[ 0-9.NSEWa-z-]{0,50}", 0..8).prop_map(RawRecord::new)
}

proptest! {
    /// Every field is attempted and lands in exactly one of values/errors.
    #[test]
    fn test_every_identifier_attempted(schema in arb_schema(), record in arb_record()) {
        let out = extract(&schema, &record);
        let expected: BTreeSet<&str> = schema.identifiers().collect();
        prop_assert_eq!(out.identifiers(), expected);
        for id in schema.identifiers() {
            prop_assert!(out.value(id).is_some() != out.error(id).is_some());
        }
    }

    #[test]
    fn test_extraction_is_deterministic(schema in arb_schema(), record in arb_record()) {
        prop_assert_eq!(extract(&schema, &record), extract(&schema, &record));
    }

    /// Removing the last line changes only fields on that line.
    #[test]
    fn test_truncation_monotonicity(schema in arb_schema(), record in arb_record()) {
        prop_assume!(record.line_count() > 0);
        let removed = record.line_count();
        let full = extract(&schema, &record);
        let short = extract(&schema, &record.without_trailing_lines(1));

        for field in schema.fields() {
            let id = field.identifier.as_str();
            if field.line == removed {
                let is_truncated = matches!(short.error(id), Some(FieldError::Truncated { .. }));
                prop_assert!(is_truncated);
            } else {
                prop_assert_eq!(full.value(id), short.value(id));
                prop_assert_eq!(full.error(id), short.error(id));
            }
        }
    }

    /// A trailing S or W negates, N or E or nothing keeps the sign.
    #[test]
    fn test_directional_sign(magnitude in 0.0f64..180.0, letter in prop::sample::select(vec!["N", "S", "E", "W", ""]), gap in 0usize..3) {
        let text = format!("{magnitude}{}{letter}", " ".repeat(gap));
        let draft = SchemaDraft::new("P").field(
            FieldDescriptor::new(1, 1, text.len().max(1), "coord").with_scalar(ScalarType::DirectionalReal),
        );
        let schema = LineMapSchema::new(draft).unwrap();
        let out = extract(&schema, &RawRecord::new(vec![text]));

        let expected = if letter == "S" || letter == "W" { -magnitude } else { magnitude };
        prop_assert_eq!(out.value("coord"), Some(&Value::Real(expected)));
    }

    /// Joining token sub-values in rule order with the unit reinserted
    /// reproduces the numeric content of the slice.
    #[test]
    fn test_composite_round_trip(value in -1000.0f64..1000.0, time in 0.0f64..100.0, pad in 1usize..4) {
        let sep = " ".repeat(pad);
        let text = format!("{value}{sep}cm/sec{sep}{time}{sep}sec");
        let rule = DecompositionRule::tokens(vec![
            SubField::new("value", ScalarType::Real),
            SubField::new("unit", ScalarType::Text),
            SubField::new("time", ScalarType::Real),
        ]);
        let draft = SchemaDraft::new("P").field(
            FieldDescriptor::new(1, 1, text.len(), "peak")
                .with_type(TypeHint::Composite(rule))
                .with_units(["sec"]),
        );
        let schema = LineMapSchema::new(draft).unwrap();
        let out = extract(&schema, &RawRecord::new(vec![text.clone()]));

        let composite = out.value("peak").and_then(Value::as_composite).unwrap();
        let rejoined = composite
            .iter()
            .map(|(_, v)| match v {
                Value::Real(x) => x.to_string(),
                Value::Text(s) => s.clone(),
                other => format!("{other:?}"),
            })
            .chain(["sec".to_string()])
            .collect::<Vec<_>>()
            .join(" ");
        let original = text.split_whitespace().collect::<Vec<_>>().join(" ");
        prop_assert_eq!(rejoined, original);
    }
}

#[test]
fn test_station_lat_scenario() {
    let draft = SchemaDraft::new("S").field(
        FieldDescriptor::new(6, 21, 27, "station_lat").with_scalar(ScalarType::DirectionalReal),
    );
    let schema = LineMapSchema::new(draft).unwrap();

    let mut lines = vec![String::new(); 5];
    lines.push(format!("{:20}34.5  N", ""));
    let out = extract(&schema, &RawRecord::new(lines));
    assert_eq!(out.value("station_lat"), Some(&Value::Real(34.5)));
    assert!(out.is_clean());

    let out = extract(&schema, &RawRecord::from_text("1\n2\n3"));
    assert_eq!(out.value("station_lat"), None);
    assert!(matches!(
        out.error("station_lat"),
        Some(FieldError::Truncated { line: 6, .. })
    ));
}
