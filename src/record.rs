//! Raw fixed-column records and column-range slicing.
//!
//! Lines and columns are 1-based and column ranges are inclusive on both
//! ends, matching how line maps are written. Columns count characters, so a
//! multi-byte character occupies one column.
//!
//! Real headers are often right-trimmed or cut short. Reading past the end
//! of a line or past the last line is not an error: the reader returns what
//! exists and flags the slice as truncated.

/// One instance of fixed-column text, e.g. one accelerogram header.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    lines: Vec<String>,
}

impl RawRecord {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split a text blob into lines, dropping a trailing `\r` from each.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
                .collect(),
        }
    }

    /// Number of physical lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line by 1-based number.
    pub fn line(&self, line_number: usize) -> Option<&str> {
        line_number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// A copy of this record without its last `n` lines.
    pub fn without_trailing_lines(&self, n: usize) -> Self {
        let keep = self.lines.len().saturating_sub(n);
        Self {
            lines: self.lines[..keep].to_vec(),
        }
    }

    /// Slice 1-based inclusive columns of a 1-based line.
    pub fn line_range(&self, line_number: usize, col_start: usize, col_end: usize) -> RawSlice<'_> {
        line_range(self, line_number, col_start, col_end)
    }
}

impl From<&str> for RawRecord {
    fn from(text: &str) -> Self {
        RawRecord::from_text(text)
    }
}

/// Text read from a column range.
///
/// `text` is `None` when nothing of the range exists in the record. When
/// `truncated` is set and `text` is `Some`, only a leading part of the range
/// was present. Whitespace is preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSlice<'a> {
    pub text: Option<&'a str>,
    pub truncated: bool,
}

impl<'a> RawSlice<'a> {
    pub fn full(text: &'a str) -> Self {
        Self {
            text: Some(text),
            truncated: false,
        }
    }

    pub fn partial(text: &'a str) -> Self {
        Self {
            text: Some(text),
            truncated: true,
        }
    }

    pub fn absent() -> Self {
        Self {
            text: None,
            truncated: true,
        }
    }

    pub fn is_absent(&self) -> bool {
        self.text.is_none()
    }
}

/// Read columns `col_start..=col_end` of line `line_number` (all 1-based).
pub fn line_range(
    record: &RawRecord,
    line_number: usize,
    col_start: usize,
    col_end: usize,
) -> RawSlice<'_> {
    let Some(line) = record.line(line_number) else {
        return RawSlice::absent();
    };
    if col_start == 0 || col_start > col_end {
        return RawSlice::absent();
    }

    let start = col_start - 1;
    let width = col_end - start;
    let Some(start_byte) = char_to_byte(line, start) else {
        return RawSlice::absent();
    };

    let tail = &line[start_byte..];
    if tail.is_empty() {
        return RawSlice::absent();
    }
    match char_to_byte(tail, width) {
        Some(end_byte) => RawSlice::full(&tail[..end_byte]),
        None => RawSlice::partial(tail),
    }
}

/// Byte offset of the `n`th character, or of the end when `n` equals the
/// character count. `None` when the string is shorter than `n` characters.
fn char_to_byte(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    match s.char_indices().nth(n) {
        Some((i, _)) => Some(i),
        None if s.chars().count() == n => Some(s.len()),
        None => None,
    }
}
