//! Text and selection of a text field

use crate::boundary;
use std::ops::Range;

/// Direction of a cursor move or deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Backward,
    Forward,
}

/// Unit of a cursor move or deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Character,
    Word,
    /// To the start or end of the current line
    Line,
}

/// Text plus selection.
///
/// `selection_base` is the anchor, `selection_extent` the moving end; either
/// may be the larger. Both always lie in `[0, len]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditingState {
    text: Vec<char>,
    selection_base: usize,
    selection_extent: usize,
}

fn clamp_offset(offset: i64, len: usize) -> usize {
    usize::try_from(offset.max(0)).map_or(len, |offset| offset.min(len))
}

impl EditingState {
    /// Builds a state, clamping both selection ends into the text.
    pub fn new(text: &str, selection_base: i64, selection_extent: i64) -> Self {
        let text: Vec<char> = text.chars().collect();
        let len = text.len();
        Self {
            text,
            selection_base: clamp_offset(selection_base, len),
            selection_extent: clamp_offset(selection_extent, len),
        }
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn selection_base(&self) -> usize {
        self.selection_base
    }

    pub fn selection_extent(&self) -> usize {
        self.selection_extent
    }

    /// True when base and extent coincide (a caret).
    pub fn is_collapsed(&self) -> bool {
        self.selection_base == self.selection_extent
    }

    /// Selected offsets, ordered.
    pub fn selection_range(&self) -> Range<usize> {
        let start = self.selection_base.min(self.selection_extent);
        let end = self.selection_base.max(self.selection_extent);
        start..end
    }

    pub fn selected_text(&self) -> String {
        self.text[self.selection_range()].iter().collect()
    }

    pub(crate) fn set_selection(&mut self, base: usize, extent: usize) {
        let len = self.text.len();
        self.selection_base = base.min(len);
        self.selection_extent = extent.min(len);
    }

    pub(crate) fn collapse_to(&mut self, offset: usize) {
        self.set_selection(offset, offset);
    }

    /// Replaces the selection with `insert`, leaving a caret after it.
    pub(crate) fn replace_selection(&mut self, insert: &[char]) {
        let range = self.selection_range();
        let caret = range.start + insert.len();
        self.text.splice(range, insert.iter().copied());
        self.collapse_to(caret);
    }

    /// Removes `range` (clamped) and leaves a caret at its start.
    pub(crate) fn delete_range(&mut self, range: Range<usize>) {
        let len = self.text.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        self.text.drain(start..end);
        self.collapse_to(start);
    }

    /// Offset reached by travelling from `from` by one `granularity` unit.
    pub(crate) fn target(&self, from: usize, direction: Direction, granularity: Granularity) -> usize {
        let from = from.min(self.text.len());
        match (direction, granularity) {
            (Direction::Backward, Granularity::Character) => from.saturating_sub(1),
            (Direction::Forward, Granularity::Character) => (from + 1).min(self.text.len()),
            (Direction::Backward, Granularity::Word) => {
                boundary::previous_word_boundary(&self.text, from)
            }
            (Direction::Forward, Granularity::Word) => boundary::next_word_boundary(&self.text, from),
            (Direction::Backward, Granularity::Line) => boundary::line_start(&self.text, from),
            (Direction::Forward, Granularity::Line) => boundary::line_end(&self.text, from),
        }
    }
}
