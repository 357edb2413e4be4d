//! Structural validation of line-map drafts.
//!
//! Every check runs to completion so a broken document is reported in one
//! pass. Overlapping column ranges on a line are permitted; only identical
//! ranges and repeated identifiers are rejected.

use std::collections::{HashMap, HashSet};

use crate::error::{SchemaError, Violation};
use crate::schema::{DecompositionRule, FieldDescriptor, SchemaDraft};

/// Check a draft, returning every violation found.
pub fn validate(draft: &SchemaDraft) -> Result<(), SchemaError> {
    let violations = collect_violations(draft);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(SchemaError {
            source_name: draft.source_name.clone(),
            violations,
        })
    }
}

/// Every violation in the draft, fields in declared order then schema-level checks.
pub fn collect_violations(draft: &SchemaDraft) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen_ids: HashMap<&str, usize> = HashMap::new();
    let mut seen_ranges: HashMap<(usize, usize, usize), &str> = HashMap::new();

    for (index, field) in draft.fields.iter().enumerate() {
        let id = field.identifier.as_str();

        if id.is_empty() {
            violations.push(Violation::EmptyIdentifier { index });
        } else if let Some(&first) = seen_ids.get(id) {
            violations.push(Violation::DuplicateIdentifier {
                identifier: id.to_string(),
                first,
                second: index,
            });
        } else {
            seen_ids.insert(id, index);
        }

        check_position(field, &mut violations);

        let range = (field.line, field.column_start, field.column_end);
        if let Some(&first) = seen_ranges.get(&range) {
            violations.push(Violation::IdenticalRange {
                first: first.to_string(),
                second: id.to_string(),
                line: field.line,
                column_start: field.column_start,
                column_end: field.column_end,
            });
        } else {
            seen_ranges.insert(range, id);
        }

        if let Some(rule) = field.type_hint.rule() {
            check_rule(id, rule, &mut violations);
        }
    }

    if draft.fields.is_empty() {
        violations.push(Violation::EmptySchema);
    }

    if let Some(declared) = draft.declared_max_line {
        let actual = draft.referenced_max_line();
        if declared != actual {
            violations.push(Violation::MaxLineMismatch { declared, actual });
        }
    }

    violations
}

fn check_position(field: &FieldDescriptor, violations: &mut Vec<Violation>) {
    if field.line == 0 {
        violations.push(Violation::ZeroLine {
            identifier: field.identifier.clone(),
        });
    }
    if field.column_start == 0 {
        violations.push(Violation::ZeroColumn {
            identifier: field.identifier.clone(),
        });
    }
    if field.column_start > field.column_end {
        violations.push(Violation::InvertedColumns {
            identifier: field.identifier.clone(),
            column_start: field.column_start,
            column_end: field.column_end,
        });
    }
}

fn check_rule(identifier: &str, rule: &DecompositionRule, violations: &mut Vec<Violation>) {
    let sub_fields = rule.sub_fields();
    if sub_fields.is_empty() {
        violations.push(Violation::EmptyDecomposition {
            identifier: identifier.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for sub in &sub_fields {
        if !seen.insert(sub.identifier.as_str()) {
            violations.push(Violation::DuplicateSubField {
                identifier: identifier.to_string(),
                sub_identifier: sub.identifier.clone(),
            });
        }
    }

    match rule {
        DecompositionRule::Offsets(parts) => {
            for part in parts {
                if part.start == 0 || part.start > part.end {
                    violations.push(Violation::InvalidSubRange {
                        identifier: identifier.to_string(),
                        sub_identifier: part.sub_field.identifier.clone(),
                        start: part.start,
                        end: part.end,
                    });
                }
            }
        }
        DecompositionRule::Tokens { .. } => {}
        DecompositionRule::Pattern {
            pattern,
            sub_fields,
        } => match pattern.regex() {
            Some(regex) => {
                let names: HashSet<&str> = regex.capture_names().flatten().collect();
                for sub in sub_fields {
                    if !names.contains(sub.identifier.as_str()) {
                        violations.push(Violation::UnknownCapture {
                            identifier: identifier.to_string(),
                            sub_identifier: sub.identifier.clone(),
                        });
                    }
                }
            }
            None => violations.push(Violation::InvalidPattern {
                identifier: identifier.to_string(),
                reason: pattern
                    .compile_error()
                    .map(|e| e.to_string())
                    .unwrap_or_default(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CapturePattern, OffsetSubField, ScalarType, SubField, TypeHint};

    fn field(line: usize, start: usize, end: usize, id: &str) -> FieldDescriptor {
        FieldDescriptor::new(line, start, end, id)
    }

    #[test]
    fn test_duplicate_identifier_rejected() {
        let draft = SchemaDraft::new("T")
            .field(field(1, 1, 10, "station_name"))
            .field(field(2, 1, 10, "station_name"));
        let err = validate(&draft).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::DuplicateIdentifier {
                identifier: "station_name".to_string(),
                first: 0,
                second: 1,
            }]
        );
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let draft = SchemaDraft::new("T")
            .field(field(1, 1, 10, "station_name"))
            .field(field(1, 12, 18, ""));
        let err = validate(&draft).unwrap_err();
        assert_eq!(err.violations, vec![Violation::EmptyIdentifier { index: 1 }]);
        assert!(err.to_string().contains("field #1 has an empty identifier"));
    }

    #[test]
    fn test_overlapping_ranges_with_distinct_ids_accepted() {
        let draft = SchemaDraft::new("T")
            .field(field(10, 1, 45, "eq_hypocenter"))
            .field(field(10, 45, 80, "eq_magnitude"));
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_identical_range_rejected() {
        let draft = SchemaDraft::new("T")
            .field(field(4, 1, 30, "accelerogram_id"))
            .field(field(4, 1, 30, "record_id"));
        let err = validate(&draft).unwrap_err();
        assert!(matches!(
            err.violations[0],
            Violation::IdenticalRange { line: 4, .. }
        ));
    }

    #[test]
    fn test_reports_every_violation_not_just_first() {
        let mut draft = SchemaDraft::new("T")
            .field(field(0, 1, 10, "a"))
            .field(field(2, 12, 5, "b"))
            .field(field(3, 0, 5, "c"));
        draft.declared_max_line = Some(9);
        let err = validate(&draft).unwrap_err();
        assert_eq!(err.violations.len(), 4);
        assert!(matches!(err.violations[0], Violation::ZeroLine { .. }));
        assert!(matches!(
            err.violations[1],
            Violation::InvertedColumns {
                column_start: 12,
                column_end: 5,
                ..
            }
        ));
        assert!(matches!(err.violations[2], Violation::ZeroColumn { .. }));
        assert_eq!(
            err.violations[3],
            Violation::MaxLineMismatch {
                declared: 9,
                actual: 3
            }
        );
    }

    #[test]
    fn test_declared_max_line_consistent() {
        let mut draft = SchemaDraft::new("T").field(field(5, 1, 10, "a"));
        draft.declared_max_line = Some(5);
        assert!(validate(&draft).is_ok());
    }

    #[test]
    fn test_empty_schema_rejected() {
        let err = validate(&SchemaDraft::new("T")).unwrap_err();
        assert_eq!(err.violations, vec![Violation::EmptySchema]);
    }

    #[test]
    fn test_duplicate_sub_field_rejected() {
        let rule = DecompositionRule::tokens(vec![
            SubField::new("value", ScalarType::Real),
            SubField::new("value", ScalarType::Real),
        ]);
        let draft = SchemaDraft::new("T")
            .field(field(14, 1, 80, "pga").with_type(TypeHint::Composite(rule)));
        let err = validate(&draft).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::DuplicateSubField {
                identifier: "pga".to_string(),
                sub_identifier: "value".to_string(),
            }]
        );
    }

    #[test]
    fn test_bad_sub_range_rejected() {
        let rule = DecompositionRule::Offsets(vec![OffsetSubField {
            sub_field: SubField::new("value", ScalarType::Real),
            start: 9,
            end: 3,
        }]);
        let draft =
            SchemaDraft::new("T").field(field(1, 1, 20, "x").with_type(TypeHint::Composite(rule)));
        let err = validate(&draft).unwrap_err();
        assert!(matches!(
            err.violations[0],
            Violation::InvalidSubRange { start: 9, end: 3, .. }
        ));
    }

    #[test]
    fn test_pattern_checks() {
        let broken = DecompositionRule::Pattern {
            pattern: CapturePattern::new("(?P<timestep"),
            sub_fields: vec![SubField::new("timestep", ScalarType::Real)],
        };
        let unnamed = DecompositionRule::Pattern {
            pattern: CapturePattern::new(r"(?P<timestep>\.\d+)"),
            sub_fields: vec![
                SubField::new("timestep", ScalarType::Real),
                SubField::new("unit", ScalarType::Text),
            ],
        };
        let draft = SchemaDraft::new("T")
            .field(field(13, 1, 40, "a").with_type(TypeHint::Composite(broken)))
            .field(field(13, 41, 80, "b").with_type(TypeHint::Composite(unnamed)));
        let err = validate(&draft).unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(matches!(err.violations[0], Violation::InvalidPattern { .. }));
        assert_eq!(
            err.violations[1],
            Violation::UnknownCapture {
                identifier: "b".to_string(),
                sub_identifier: "unit".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_decomposition_rejected() {
        let draft = SchemaDraft::new("T").field(
            field(1, 1, 20, "x").with_type(TypeHint::Composite(DecompositionRule::tokens(vec![]))),
        );
        let err = validate(&draft).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::EmptyDecomposition {
                identifier: "x".to_string()
            }]
        );
    }
}
