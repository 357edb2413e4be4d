//! Field extraction: one descriptor applied to one record.

use crate::record::{RawRecord, RawSlice, line_range};
use crate::schema::FieldDescriptor;

/// Raw text read for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldResult<'a> {
    pub raw: RawSlice<'a>,
    pub truncated: bool,
}

/// Read a descriptor's column range out of a record.
///
/// Pure: descriptors may read overlapping or identical columns and the
/// result depends only on the arguments.
pub fn extract_field<'a>(record: &'a RawRecord, descriptor: &FieldDescriptor) -> FieldResult<'a> {
    let raw = line_range(
        record,
        descriptor.line,
        descriptor.column_start,
        descriptor.column_end,
    );
    FieldResult {
        raw,
        truncated: raw.truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_10: &str = "Hypocenter: 34.213N, 118.537W, H=18km         ML: 6.4  MW: 6.7";

    #[test]
    fn test_shared_boundary_column() {
        let record = RawRecord::from_text(&format!("{}\n", "x\n".repeat(9) + LINE_10));
        let hypocenter = FieldDescriptor::new(10, 1, 45, "eq_hypocenter");
        let magnitude = FieldDescriptor::new(10, 45, 80, "eq_magnitude");

        let h = extract_field(&record, &hypocenter);
        let m = extract_field(&record, &magnitude);
        assert!(!h.truncated);
        assert_eq!(h.raw.text.map(str::len), Some(45));
        assert!(m.truncated);
        assert_eq!(m.raw.text, Some("  ML: 6.4  MW: 6.7"));
        // column 45 is read by both
        assert_eq!(h.raw.text.and_then(|t| t.chars().last()), Some(' '));
        assert!(m.raw.text.unwrap().starts_with(' '));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let record = RawRecord::from_text(LINE_10);
        let d = FieldDescriptor::new(1, 13, 19, "lat");
        assert_eq!(extract_field(&record, &d), extract_field(&record, &d));
        assert_eq!(extract_field(&record, &d).raw.text, Some("34.213N"));
    }

    #[test]
    fn test_missing_line_flags_truncated() {
        let record = RawRecord::from_text("one\ntwo\nthree");
        let d = FieldDescriptor::new(6, 21, 27, "station_lat");
        let result = extract_field(&record, &d);
        assert!(result.truncated);
        assert!(result.raw.is_absent());
    }
}
