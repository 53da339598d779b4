//! Editor selections.
//!
//! A selection is an ordered pair of [`Position`]s. Independently
//! computed selections denoting the same range must be interchangeable,
//! so equality is structural.

use std::fmt;

use crate::{LineIndex, Position};

/// A selection in a buffer: `start <= end` always holds.
///
/// A cursor is a zero-width selection. All operations return new
/// values; a `Selection` is never mutated.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Selection {
    start: Position,
    end: Position,
}

impl Selection {
    /// Create a selection, swapping the endpoints if given backwards.
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Selection {
                start: end,
                end: start,
            }
        } else {
            Selection { start, end }
        }
    }

    /// Create from raw line/character coordinates.
    pub fn from_coords(
        start_line: u32,
        start_character: u32,
        end_line: u32,
        end_character: u32,
    ) -> Self {
        Selection::new(
            Position::new(start_line, start_character),
            Position::new(end_line, end_character),
        )
    }

    /// A zero-width selection at `position`.
    pub const fn cursor_at(position: Position) -> Self {
        Selection {
            start: position,
            end: position,
        }
    }

    #[inline]
    pub const fn start(&self) -> Position {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> Position {
        self.end
    }

    /// Number of line breaks the selection crosses.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.end.line - self.start.line
    }

    #[inline]
    pub const fn is_multi_lines(&self) -> bool {
        self.height() > 0
    }

    /// Check whether this selection lies entirely within `other`.
    #[inline]
    pub fn is_inside(&self, other: &Selection) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    #[inline]
    pub fn starts_before(&self, other: &Selection) -> bool {
        self.start <= other.start
    }

    /// Move the start to character 0 of its line.
    #[must_use]
    pub fn extend_to_start_of_line(self) -> Selection {
        Selection {
            start: self.start.at_start_of_line(),
            end: self.end,
        }
    }

    /// Move the end to the last character of its line.
    #[must_use]
    pub fn extend_to_end_of_line(self, index: &LineIndex) -> Selection {
        Selection {
            start: self.start,
            end: Position::new(self.end.line, index.line_len(self.end.line)),
        }
    }

    /// Move the end to the start of the following line, swallowing the
    /// line break.
    #[must_use]
    pub fn extend_to_start_of_next_line(self) -> Selection {
        Selection {
            start: self.start,
            end: self.end.at_start_of_next_line(),
        }
    }

    /// Pull the start back to `other`'s start. Only ever enlarges.
    #[must_use]
    pub fn extend_start_to_selection(self, other: &Selection) -> Selection {
        Selection {
            start: self.start.min(other.start),
            end: self.end,
        }
    }

    /// Push the end out to `other`'s end. Only ever enlarges.
    #[must_use]
    pub fn extend_end_to_selection(self, other: &Selection) -> Selection {
        Selection {
            start: self.start,
            end: self.end.max(other.end),
        }
    }

    /// Shift the whole selection down by `count` lines.
    #[must_use]
    pub fn add_lines(self, count: u32) -> Selection {
        Selection {
            start: self.start.add_lines(count),
            end: self.end.add_lines(count),
        }
    }

    /// Shift the whole selection up by `count` lines, saturating at
    /// line 0.
    #[must_use]
    pub fn remove_lines(self, count: u32) -> Selection {
        Selection {
            start: self.start.remove_lines(count),
            end: self.end.remove_lines(count),
        }
    }

    /// Re-anchor this selection after `replaced` was rewritten by text
    /// whose line count differs by `line_delta`.
    ///
    /// Rules:
    /// - wholly inside the replaced range: collapse to a point at the
    ///   range's start;
    /// - starting at or after the replaced range's end: shift by the
    ///   line delta;
    /// - otherwise (starts before the edit): unchanged.
    #[must_use]
    pub fn reanchored_after(self, replaced: &Selection, line_delta: i32) -> Selection {
        if self.is_inside(replaced) {
            return Selection::cursor_at(replaced.start);
        }
        if self.start >= replaced.end {
            return match u32::try_from(line_delta) {
                Ok(down) => self.add_lines(down),
                Err(_) => self.remove_lines(line_delta.unsigned_abs()),
            };
        }
        self
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}]", self.start, self.end)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_normalizes_backwards_endpoints() {
        let sel = Selection::new(Position::new(3, 2), Position::new(1, 5));
        assert_eq!(sel.start(), Position::new(1, 5));
        assert_eq!(sel.end(), Position::new(3, 2));
    }

    #[test]
    fn independently_computed_selections_compare_equal() {
        let a = Selection::from_coords(1, 2, 3, 4);
        let b = Selection::new(Position::new(1, 2), Position::new(3, 4));
        assert_eq!(a, b);
    }

    #[test]
    fn height_and_multi_lines() {
        assert_eq!(Selection::from_coords(1, 0, 4, 2).height(), 3);
        assert!(Selection::from_coords(1, 0, 4, 2).is_multi_lines());
        assert!(!Selection::from_coords(2, 0, 2, 9).is_multi_lines());
    }

    #[test]
    fn is_inside_boundaries() {
        let outer = Selection::from_coords(1, 0, 5, 0);
        assert!(Selection::from_coords(1, 0, 5, 0).is_inside(&outer));
        assert!(Selection::from_coords(2, 3, 2, 8).is_inside(&outer));
        assert!(!Selection::from_coords(0, 9, 2, 0).is_inside(&outer));
        assert!(!Selection::from_coords(4, 0, 5, 1).is_inside(&outer));
    }

    #[test]
    fn extend_ops_only_enlarge() {
        let sel = Selection::from_coords(2, 4, 2, 9);
        let wider = Selection::from_coords(1, 0, 4, 0);
        let narrower = Selection::from_coords(2, 6, 2, 7);

        assert_eq!(
            sel.extend_start_to_selection(&wider),
            Selection::from_coords(1, 0, 2, 9)
        );
        assert_eq!(sel.extend_start_to_selection(&narrower), sel);
        assert_eq!(
            sel.extend_end_to_selection(&wider),
            Selection::from_coords(2, 4, 4, 0)
        );
        assert_eq!(sel.extend_end_to_selection(&narrower), sel);
    }

    #[test]
    fn extend_line_anchors() {
        let sel = Selection::from_coords(2, 4, 2, 9);
        assert_eq!(
            sel.extend_to_start_of_line(),
            Selection::from_coords(2, 0, 2, 9)
        );
        assert_eq!(
            sel.extend_to_start_of_next_line(),
            Selection::from_coords(2, 4, 3, 0)
        );
    }

    #[test]
    fn extend_to_end_of_line_uses_line_length() {
        let index = LineIndex::new("const a = 1;\nsend(a);\n");
        let sel = Selection::from_coords(0, 6, 0, 7);
        assert_eq!(
            sel.extend_to_end_of_line(&index),
            Selection::from_coords(0, 6, 0, 12)
        );
    }

    #[test]
    fn reanchor_collapses_inside_replaced_range() {
        let replaced = Selection::from_coords(2, 0, 4, 0);
        let inner = Selection::from_coords(3, 1, 3, 5);
        assert_eq!(
            inner.reanchored_after(&replaced, -1),
            Selection::cursor_at(Position::new(2, 0))
        );
    }

    #[test]
    fn reanchor_shifts_trailing_selection_by_line_delta() {
        let replaced = Selection::from_coords(2, 0, 4, 0);
        let trailing = Selection::from_coords(6, 2, 6, 8);
        assert_eq!(
            trailing.reanchored_after(&replaced, 2),
            Selection::from_coords(8, 2, 8, 8)
        );
        assert_eq!(
            trailing.reanchored_after(&replaced, -2),
            Selection::from_coords(4, 2, 4, 8)
        );
    }

    #[test]
    fn reanchor_keeps_leading_selection() {
        let replaced = Selection::from_coords(2, 0, 4, 0);
        let leading = Selection::from_coords(0, 0, 1, 3);
        assert_eq!(leading.reanchored_after(&replaced, 5), leading);
    }

    proptest! {
        #[test]
        fn add_then_remove_lines_round_trips(
            start_line in 0u32..1000,
            start_char in 0u32..200,
            extra_lines in 0u32..10,
            end_char in 0u32..200,
            n in 0u32..100,
        ) {
            let sel = Selection::from_coords(
                start_line,
                start_char,
                start_line + extra_lines,
                end_char,
            );
            prop_assert_eq!(sel.add_lines(n).remove_lines(n), sel);
        }
    }
}
