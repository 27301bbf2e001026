//! Line cursor over the chart source.

use std::ops::Range;

/// A cursor which walks the source text line by line, remembering where each line is.
pub struct LineCursor<'a> {
    /// The line position of the next line, starts with 1.
    line: usize,
    /// The index position of the next line.
    index: usize,
    /// The source str.
    source: &'a str,
}

impl<'a> LineCursor<'a> {
    /// Creates a cursor at the head of `source`.
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self {
            line: 1,
            index: 0,
            source,
        }
    }

    /// Returns whether the cursor consumed all the source.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.index >= self.source.len()
    }

    /// Determines the end of the current line and handles CRLF (\r\n) correctly.
    ///
    /// Returns a tuple `(consumed_end, line_end_index)` where:
    /// - `consumed_end` is the absolute index just after the line feed, or the source length.
    /// - `line_end_index` is the absolute index where the line content ends (exclusive), excluding a trailing `\r`.
    fn current_line_bounds(&self) -> (usize, usize) {
        let rest = &self.source[self.index..];
        let (content_end, consumed_end) = rest.find('\n').map_or_else(
            || (self.source.len(), self.source.len()),
            |lf| (self.index + lf, self.index + lf + 1),
        );
        let line_end_index = if self.source[self.index..content_end].ends_with('\r') {
            content_end - 1
        } else {
            content_end
        };
        (consumed_end, line_end_index)
    }

    /// Moves the cursor through the next line, and returns its line number, byte range and content.
    pub fn next_line(&mut self) -> Option<(usize, Range<usize>, &'a str)> {
        if self.is_end() {
            return None;
        }
        let (consumed_end, line_end_index) = self.current_line_bounds();
        let range = self.index..line_end_index;
        let line = self.line;
        self.index = consumed_end;
        self.line += 1;
        Some((line, range.clone(), &self.source[range]))
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = (usize, Range<usize>, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}
