//! Source spans and line/column lookup.
//!
//! Tokens carry a `SourceSpan` of byte offsets into the escape-decoded
//! query. `LineIndex` turns an offset back into a human position for
//! error messages.

use serde::{Deserialize, Serialize};

/// A span in the source text, identified by byte offsets.
///
/// Spans are inclusive of start and exclusive of end: `[start, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// Byte offset of the start (inclusive)
    pub start: usize,
    /// Byte offset of the end (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a new span from start to end byte offsets.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The length of this span in bytes.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The text covered by this span, or `""` if it is out of range.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

impl From<std::ops::Range<usize>> for SourceSpan {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// A 1-indexed line/column position; columns count characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Line start offsets of a source text.
#[derive(Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            source,
            line_starts,
        }
    }

    /// Position of a byte offset. Offsets past the end map to the last line.
    pub fn locate(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.source.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let col = self
            .source
            .get(line_start..offset)
            .map_or(0, |s| s.chars().count());
        LineCol {
            line: line as u32 + 1,
            col: col as u32 + 1,
        }
    }

    /// Text of a 1-indexed line without its line terminator.
    pub fn line_text(&self, line: u32) -> &'a str {
        let idx = line.saturating_sub(1) as usize;
        let Some(&start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.source.len());
        self.source[start..end].trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_slice() {
        let src = "SELECT ?x";
        assert_eq!(SourceSpan::new(7, 9).slice(src), "?x");
        assert_eq!(SourceSpan::new(7, 99).slice(src), "");
        assert_eq!(SourceSpan::from(0..6).len(), 6);
        assert!(SourceSpan::new(3, 3).is_empty());
    }

    #[test]
    fn test_locate_counts_characters() {
        let src = "SELECT ?x\nWHERE { ?x <\u{e9}> ~ }";
        let index = LineIndex::new(src);
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.locate(0), LineCol { line: 1, col: 1 });
        assert_eq!(index.locate(10), LineCol { line: 2, col: 1 });
        let tilde = src.find('~').unwrap();
        assert_eq!(index.locate(tilde), LineCol { line: 2, col: 16 });
    }

    #[test]
    fn test_line_text() {
        let index = LineIndex::new("a\r\nbc\n");
        assert_eq!(index.line_text(1), "a");
        assert_eq!(index.line_text(2), "bc");
        assert_eq!(index.line_text(3), "");
        assert_eq!(index.line_text(9), "");
    }
}
