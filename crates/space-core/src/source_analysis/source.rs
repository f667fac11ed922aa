// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The source buffer shared by every pipeline stage.
//!
//! A [`SourceBuffer`] owns the program text together with the file name it
//! was read from and resolves byte offsets to 1-based line/column pairs for
//! diagnostics. The buffer is created once by the driver and passed by
//! shared reference to the lexer, the parser and the diagnostic renderer;
//! no stage mutates it.

use ecow::EcoString;

use super::Span;

/// Program text plus the file name it came from.
///
/// # Examples
///
/// ```
/// use space_core::source_analysis::SourceBuffer;
///
/// let buffer = SourceBuffer::new("main.spc", "var x = 1;\nvar y = 2;\n");
/// assert_eq!(buffer.line_col(11), (2, 1));
/// assert_eq!(buffer.line_text(2), "var y = 2;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    name: EcoString,
    text: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
}

impl SourceBuffer {
    /// Creates a buffer from a file name and its contents.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0u32];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "source files over 4GB are not supported"
                )]
                line_starts.push(offset as u32 + 1);
            }
        }
        Self {
            name: name.into(),
            text,
            line_starts,
        }
    }

    /// Returns the file name the buffer was read from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the source bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Returns the buffer length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the text covered by a span.
    ///
    /// Out-of-range spans yield the empty string rather than panicking.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.as_range()).unwrap_or("")
    }

    /// Resolves a byte offset to a 1-based `(line, column)` pair.
    #[must_use]
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        #[expect(
            clippy::cast_possible_truncation,
            reason = "line count is bounded by the 4GB buffer limit"
        )]
        let line = line_idx as u32 + 1;
        let column = offset - self.line_starts[line_idx] + 1;
        (line, column)
    }

    /// Returns the contents of a 1-based line, without its terminator.
    #[must_use]
    pub fn line_text(&self, line: u32) -> &str {
        let Some(&start) = self.line_starts.get(line as usize - 1) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line as usize)
            .map_or(self.text.len(), |&next| next as usize - 1);
        self.text.get(start as usize..end).unwrap_or("").trim_end_matches('\r')
    }

    /// Returns the number of lines in the buffer.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_at_line_boundaries() {
        let buffer = SourceBuffer::new("t.spc", "ab\ncd\nef");
        assert_eq!(buffer.line_col(0), (1, 1));
        assert_eq!(buffer.line_col(1), (1, 2));
        assert_eq!(buffer.line_col(3), (2, 1));
        assert_eq!(buffer.line_col(6), (3, 1));
        assert_eq!(buffer.line_col(7), (3, 2));
    }

    #[test]
    fn line_text_without_terminator() {
        let buffer = SourceBuffer::new("t.spc", "first\nsecond\nthird");
        assert_eq!(buffer.line_text(1), "first");
        assert_eq!(buffer.line_text(2), "second");
        assert_eq!(buffer.line_text(3), "third");
        assert_eq!(buffer.line_text(9), "");
    }

    #[test]
    fn slice_out_of_range_is_empty() {
        let buffer = SourceBuffer::new("t.spc", "short");
        assert_eq!(buffer.slice(Span::new(0, 5)), "short");
        assert_eq!(buffer.slice(Span::new(3, 99)), "");
    }

    #[test]
    fn empty_buffer() {
        let buffer = SourceBuffer::new("t.spc", "");
        assert!(buffer.is_empty());
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_col(0), (1, 1));
    }
}
