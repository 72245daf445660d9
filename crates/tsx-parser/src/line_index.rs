//! Byte offset to line/column conversion for diagnostics.

/// A 1-indexed line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column (bytes from the start of the line, plus one).
    pub column: u32,
}

impl LineCol {
    /// Creates a new line/column position.
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Offsets of every line start, for O(log n) lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Builds the index for `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(offset, _)| offset + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Returns the number of lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset into a position. Offsets past the end clamp to
    /// the end of the text.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let column = offset - self.line_starts[line];
        LineCol::new(line as u32 + 1, column as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("const a = 1;");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(0), LineCol::new(1, 1));
        assert_eq!(index.line_col(6), LineCol::new(1, 7));
    }

    #[test]
    fn test_multiple_lines() {
        let index = LineIndex::new("a\nbc\n\nd");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(2), LineCol::new(2, 1));
        assert_eq!(index.line_col(3), LineCol::new(2, 2));
        assert_eq!(index.line_col(5), LineCol::new(3, 1));
        assert_eq!(index.line_col(6), LineCol::new(4, 1));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.line_col(100), LineCol::new(2, 3));
    }
}
