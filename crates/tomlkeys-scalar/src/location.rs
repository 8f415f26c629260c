//! Source locations reported by the grammar front end.

use std::ops::Range;

/// A line/column range in the source text.
///
/// Lines and columns are 1-based. `last_column` is exclusive, so a location
/// with equal first and last positions is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Line of the first character.
    pub first_line: u32,
    /// Column of the first character.
    pub first_column: u32,
    /// Line of the last character.
    pub last_line: u32,
    /// Column just past the last character.
    pub last_column: u32,
}

impl Location {
    /// Create a location from its four coordinates.
    #[inline]
    pub fn new(first_line: u32, first_column: u32, last_line: u32, last_column: u32) -> Self {
        debug_assert!((first_line, first_column) <= (last_line, last_column));
        Self {
            first_line,
            first_column,
            last_line,
            last_column,
        }
    }

    /// An empty location at the start of `line`.
    #[inline]
    pub fn at_line(line: u32) -> Self {
        Self::new(line, 1, line, 1)
    }

    /// The line this location starts on.
    #[inline]
    pub fn line(&self) -> u32 {
        self.first_line
    }

    /// Whether this location covers no characters.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first_line == self.last_line && self.first_column == self.last_column
    }

    /// Smallest location covering both `self` and `other`.
    pub fn extend(&self, other: Location) -> Location {
        let first = (self.first_line, self.first_column).min((other.first_line, other.first_column));
        let last = (self.last_line, self.last_column).max((other.last_line, other.last_column));
        Location::new(first.0, first.1, last.0, last.1)
    }

    /// Byte range of this location inside `source`.
    ///
    /// Coordinates past the end of a line clamp to the line end. An empty
    /// location widens to the rest of its line so that it stays visible in
    /// rendered reports.
    pub fn byte_range(&self, source: &str) -> Range<usize> {
        let start = offset_of(source, self.first_line, self.first_column);
        if self.is_empty() {
            let line_end = source[start..]
                .find('\n')
                .map_or(source.len(), |n| start + n);
            return start..line_end;
        }
        let end = offset_of(source, self.last_line, self.last_column).max(start);
        start..end
    }
}

fn offset_of(source: &str, line: u32, column: u32) -> usize {
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line as usize {
            let content = text.strip_suffix('\n').unwrap_or(text);
            let column_bytes = content
                .char_indices()
                .nth(column.saturating_sub(1) as usize)
                .map_or(content.len(), |(byte, _)| byte);
            return offset + column_bytes;
        }
        offset += text.len();
    }
    source.len()
}
