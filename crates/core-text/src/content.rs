//! Text-content service contract consumed by motions, text objects and operators.

use crate::TextRange;

/// Location of one line: number, first character offset and length without the
/// line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInformation {
    number: usize,
    begin_offset: usize,
    length: usize,
}

impl LineInformation {
    pub const fn new(number: usize, begin_offset: usize, length: usize) -> Self {
        Self {
            number,
            begin_offset,
            length,
        }
    }

    pub const fn number(&self) -> usize {
        self.number
    }

    pub const fn begin_offset(&self) -> usize {
        self.begin_offset
    }

    pub const fn length(&self) -> usize {
        self.length
    }

    /// Offset just past the last content character (where the terminator starts).
    pub const fn end_offset(&self) -> usize {
        self.begin_offset + self.length
    }

    /// Offset of the last content character, or the line start on an empty line.
    pub const fn last_char_offset(&self) -> usize {
        if self.length == 0 {
            self.begin_offset
        } else {
            self.end_offset() - 1
        }
    }
}

/// Host text storage as seen by the interpreter. All offsets are character offsets
/// and implementations clamp out-of-range arguments instead of panicking.
pub trait TextContent {
    fn line_information(&self, line: usize) -> LineInformation;
    fn line_information_of_offset(&self, offset: usize) -> LineInformation;
    fn number_of_lines(&self) -> usize;
    fn text_length(&self) -> usize;
    fn text(&self, start: usize, len: usize) -> String;
    fn replace(&mut self, start: usize, len: usize, text: &str);

    fn char_at(&self, offset: usize) -> Option<char> {
        self.text(offset, 1).chars().next()
    }

    fn text_in(&self, range: TextRange) -> String {
        self.text(range.left_bound().offset(), range.model_length())
    }

    /// Offset where the line after `line` begins, or the text end for the last line.
    fn next_line_begin(&self, line: usize) -> usize {
        if line + 1 < self.number_of_lines() {
            self.line_information(line + 1).begin_offset()
        } else {
            self.text_length()
        }
    }
}
