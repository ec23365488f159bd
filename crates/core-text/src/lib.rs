//! Rope-based text buffer plus the offset position / range model shared by the
//! command interpreter.
//!
//! Offsets are character offsets into the whole document. The interpreter never
//! assumes a concrete storage: it talks to [`TextContent`], which [`Buffer`]
//! implements on top of `ropey` for hosts (and tests) without their own storage.

use anyhow::Result;
use ropey::Rope;

pub mod content;
pub mod policy;
pub mod range;

pub use content::{LineInformation, TextContent};
pub use policy::{BorderPolicy, ContentType, StickyColumnPolicy};
pub use range::TextRange;

/// Immutable absolute character offset into a document.
///
/// Arithmetic produces new values; a `Position` is never adjusted in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    offset: usize,
}

impl Position {
    pub const fn new(offset: usize) -> Self {
        Self { offset }
    }

    pub const fn origin() -> Self {
        Self { offset: 0 }
    }

    pub const fn offset(self) -> usize {
        self.offset
    }

    /// Shift by a signed delta, saturating at the document start.
    #[must_use]
    pub fn add_offset(self, delta: isize) -> Self {
        Self {
            offset: self.offset.saturating_add_signed(delta),
        }
    }

    #[must_use]
    pub const fn with_offset(self, offset: usize) -> Self {
        Self { offset }
    }
}

impl From<usize> for Position {
    fn from(offset: usize) -> Self {
        Self::new(offset)
    }
}

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Ok(Self {
            rope: Rope::from_str(content),
            name: name.into(),
        })
    }

    /// Entire buffer contents as an owned string.
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Character length of line `idx` without its terminator.
    fn line_content_len(&self, idx: usize) -> usize {
        let line = self.rope.line(idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        } else if len > 0 && line.char(len - 1) == '\r' {
            len -= 1;
        }
        len
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("name", &self.name)
            .field("chars", &self.rope.len_chars())
            .field("lines", &self.rope.len_lines())
            .finish()
    }
}

impl TextContent for Buffer {
    fn line_information(&self, line: usize) -> LineInformation {
        let line = line.min(self.rope.len_lines().saturating_sub(1));
        LineInformation::new(
            line,
            self.rope.line_to_char(line),
            self.line_content_len(line),
        )
    }

    fn line_information_of_offset(&self, offset: usize) -> LineInformation {
        let offset = offset.min(self.rope.len_chars());
        self.line_information(self.rope.char_to_line(offset))
    }

    fn number_of_lines(&self) -> usize {
        self.rope.len_lines()
    }

    fn text_length(&self) -> usize {
        self.rope.len_chars()
    }

    fn text(&self, start: usize, len: usize) -> String {
        let total = self.rope.len_chars();
        let start = start.min(total);
        let end = start.saturating_add(len).min(total);
        self.rope.slice(start..end).to_string()
    }

    fn replace(&mut self, start: usize, len: usize, text: &str) {
        let total = self.rope.len_chars();
        let start = start.min(total);
        let end = start.saturating_add(len).min(total);
        if end > start {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.rope.len_chars()).then(|| self.rope.char(offset))
    }
}
