//! Direction-agnostic text ranges.
//!
//! Every constructor normalizes its endpoints so `left_bound <= right_bound` no
//! matter which endpoint a motion produced first. Backward motions hand their
//! destination in as `to` and rely on this.

use crate::{Position, TextContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    left: Position,
    right: Position,
}

impl TextRange {
    /// Half-open range between two positions in either order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { left: a, right: b }
        } else {
            Self { left: b, right: a }
        }
    }

    pub fn exclusive(from: Position, to: Position) -> Self {
        Self::new(from, to)
    }

    /// Closed range: the larger endpoint is widened by one character, clamped to
    /// the end of the text.
    pub fn inclusive(content: &dyn TextContent, from: Position, to: Position) -> Self {
        let base = Self::new(from, to);
        let widened = (base.right.offset() + 1).min(content.text_length());
        Self {
            left: base.left,
            right: base.right.with_offset(widened.max(base.right.offset())),
        }
    }

    /// Whole lines spanned by both endpoints, including the terminator of the last
    /// line when it has one.
    pub fn lines(content: &dyn TextContent, from: Position, to: Position) -> Self {
        let base = Self::new(from, to);
        let first = content.line_information_of_offset(base.left.offset());
        let last = content.line_information_of_offset(base.right.offset());
        Self {
            left: Position::new(first.begin_offset()),
            right: Position::new(content.next_line_begin(last.number())),
        }
    }

    pub const fn left_bound(&self) -> Position {
        self.left
    }

    pub const fn right_bound(&self) -> Position {
        self.right
    }

    pub const fn model_length(&self) -> usize {
        self.right.offset() - self.left.offset()
    }

    pub const fn is_empty(&self) -> bool {
        self.model_length() == 0
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.left <= pos && pos < self.right
    }
}
