//! Offset ↔ position translation.
//!
//! The tree seam locates nodes with byte [`Span`]s; the editor seam
//! speaks zero-based line/character [`Position`]s. `LineIndex` is the
//! single translation layer between the two.

use crate::{Position, Selection, Span};

/// Per-buffer table of line start offsets.
///
/// Character columns are byte columns; the engine operates on the raw
/// buffer the host handed over and never re-encodes it.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of each line. Always starts
    /// with 0.
    line_starts: Vec<u32>,
    /// Total buffer length in bytes.
    len: u32,
}

impl LineIndex {
    /// Build the index for a buffer.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        LineIndex {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Number of lines in the buffer (a trailing newline starts a last,
    /// empty line).
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Length of `line` in bytes, excluding its line break. Zero for
    /// out-of-range lines.
    pub fn line_len(&self, line: u32) -> u32 {
        let Some(&start) = self.line_starts.get(line as usize) else {
            return 0;
        };
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map_or(self.len, |&next| next - 1);
        end - start
    }

    /// Translate a byte offset (clamped to the buffer) to a position.
    pub fn position_of(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        Position::new(line as u32, offset - self.line_starts[line])
    }

    /// Translate a position to a byte offset. `None` if the position
    /// lies beyond its line or beyond the buffer.
    pub fn offset_of(&self, position: Position) -> Option<u32> {
        let start = *self.line_starts.get(position.line as usize)?;
        if position.character > self.line_len(position.line) {
            return None;
        }
        Some(start + position.character)
    }

    /// Translate a node span to an editor selection.
    pub fn selection_of(&self, span: Span) -> Selection {
        Selection::new(self.position_of(span.start), self.position_of(span.end))
    }

    /// Translate an editor selection to a byte span.
    pub fn span_of(&self, selection: Selection) -> Option<Span> {
        let start = self.offset_of(selection.start())?;
        let end = self.offset_of(selection.end())?;
        Some(Span::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "const a = 1;\nconsole.log(a);\n";

    #[test]
    fn position_of_offsets() {
        let index = LineIndex::new(TEXT);
        assert_eq!(index.position_of(0), Position::new(0, 0));
        assert_eq!(index.position_of(6), Position::new(0, 6));
        assert_eq!(index.position_of(13), Position::new(1, 0));
        assert_eq!(index.position_of(21), Position::new(1, 8));
    }

    #[test]
    fn offset_of_positions() {
        let index = LineIndex::new(TEXT);
        assert_eq!(index.offset_of(Position::new(0, 0)), Some(0));
        assert_eq!(index.offset_of(Position::new(1, 8)), Some(21));
        // End of line 0 (before the newline) is a valid cursor slot.
        assert_eq!(index.offset_of(Position::new(0, 12)), Some(12));
        // Beyond the line is not.
        assert_eq!(index.offset_of(Position::new(0, 13)), None);
        assert_eq!(index.offset_of(Position::new(9, 0)), None);
    }

    #[test]
    fn line_lengths() {
        let index = LineIndex::new(TEXT);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_len(0), 12);
        assert_eq!(index.line_len(1), 15);
        assert_eq!(index.line_len(2), 0);
    }

    #[test]
    fn span_selection_round_trip() {
        let index = LineIndex::new(TEXT);
        let span = Span::new(6, 21);
        let selection = index.selection_of(span);
        assert_eq!(selection, Selection::from_coords(0, 6, 1, 8));
        assert_eq!(index.span_of(selection), Some(span));
    }

    #[test]
    fn no_trailing_newline() {
        let index = LineIndex::new("a = 1");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_len(0), 5);
        assert_eq!(index.position_of(99), Position::new(0, 5));
    }
}
