//! Word motions (`w b e`, `W B E`) and the run motions behind `iw` / `aw`.
//!
//! Characters fall into three classes: whitespace, word characters
//! (alphanumerics and `_`) and punctuation. A word is a maximal run of one
//! non-whitespace class; with `big` set every non-whitespace character is one
//! class. An empty line counts as a word.

use super::{Motion, count_or_one};
use crate::editor::EditorContext;
use crate::error::CommandResult;
use core_text::{BorderPolicy, Position, TextContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    Word,
    Punctuation,
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn char_class(c: char, big: bool) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if big || is_word_char(c) {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// `w`: start of the next word.
    Forward,
    /// `b`: start of the current or previous word.
    Backward,
    /// `e`: end of the current or next word.
    End,
    /// Start of the run under the cursor (whitespace runs included).
    RunStart,
    /// End of the run under the cursor; each extra count takes the next run.
    RunEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordMotion {
    pub kind: WordKind,
    pub big: bool,
}

impl WordMotion {
    pub const FORWARD: Self = Self::new(WordKind::Forward, false);
    pub const BACKWARD: Self = Self::new(WordKind::Backward, false);
    pub const END: Self = Self::new(WordKind::End, false);

    pub const fn new(kind: WordKind, big: bool) -> Self {
        Self { kind, big }
    }
}

struct Scanner<'a> {
    content: &'a dyn TextContent,
    len: usize,
    big: bool,
}

impl Scanner<'_> {
    fn ch(&self, p: usize) -> char {
        self.content.char_at(p).unwrap_or('\n')
    }

    fn class(&self, p: usize) -> CharClass {
        char_class(self.ch(p), self.big)
    }

    /// Both characters belong to the same run and neither ends a line.
    fn same_run(&self, a: usize, b: usize) -> bool {
        let (ca, cb) = (self.ch(a), self.ch(b));
        ca != '\n' && cb != '\n' && char_class(ca, self.big) == char_class(cb, self.big)
    }

    fn forward(&self, mut p: usize) -> usize {
        if p >= self.len {
            return self.len;
        }
        let cls = self.class(p);
        if cls != CharClass::Whitespace {
            while p < self.len && self.class(p) == cls {
                p += 1;
            }
        }
        while p < self.len && self.class(p) == CharClass::Whitespace {
            if self.ch(p) == '\n' && p + 1 < self.len && self.ch(p + 1) == '\n' {
                return p + 1;
            }
            p += 1;
        }
        p
    }

    fn backward(&self, p: usize) -> usize {
        if p == 0 {
            return 0;
        }
        let mut p = p.min(self.len) - 1;
        while p > 0 && self.class(p) == CharClass::Whitespace {
            if self.ch(p) == '\n' && self.ch(p - 1) == '\n' {
                return p;
            }
            p -= 1;
        }
        let cls = self.class(p);
        if cls == CharClass::Whitespace {
            return p;
        }
        while p > 0 && self.class(p - 1) == cls {
            p -= 1;
        }
        p
    }

    fn end(&self, p: usize) -> usize {
        if self.len == 0 {
            return 0;
        }
        let mut p = p + 1;
        while p < self.len && self.class(p) == CharClass::Whitespace {
            p += 1;
        }
        if p >= self.len {
            return self.len - 1;
        }
        let cls = self.class(p);
        while p + 1 < self.len && self.class(p + 1) == cls {
            p += 1;
        }
        p
    }

    fn run_start(&self, mut p: usize) -> usize {
        p = p.min(self.len.saturating_sub(1));
        while p > 0 && self.same_run(p - 1, p) {
            p -= 1;
        }
        p
    }

    fn run_end(&self, mut p: usize) -> usize {
        while p + 1 < self.len && self.same_run(p, p + 1) {
            p += 1;
        }
        p
    }
}

/// `w` from `from`, applied once. Reaches the text end when no word follows.
pub(crate) fn word_forward(content: &dyn TextContent, from: usize) -> usize {
    WordMotion::FORWARD.step(content, from)
}

pub(crate) fn word_backward(content: &dyn TextContent, from: usize) -> usize {
    WordMotion::BACKWARD.step(content, from)
}

pub(crate) fn word_end(content: &dyn TextContent, from: usize) -> usize {
    WordMotion::END.step(content, from)
}

impl WordMotion {
    fn step(&self, content: &dyn TextContent, from: usize) -> usize {
        let s = Scanner {
            content,
            len: content.text_length(),
            big: self.big,
        };
        match self.kind {
            WordKind::Forward => s.forward(from),
            WordKind::Backward => s.backward(from),
            WordKind::End => s.end(from),
            WordKind::RunStart => s.run_start(from),
            WordKind::RunEnd => s.run_end(from),
        }
    }
}

impl Motion for WordMotion {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        let content = editor.content();
        let mut p = from.offset();
        match self.kind {
            WordKind::RunStart => p = self.step(content, p),
            WordKind::RunEnd => {
                let len = content.text_length();
                for i in 0..count_or_one(count) {
                    if i > 0 {
                        if p + 1 >= len {
                            break;
                        }
                        p += 1;
                    }
                    p = self.step(content, p);
                }
            }
            _ => {
                for _ in 0..count_or_one(count) {
                    p = self.step(content, p);
                }
            }
        }
        Ok(Position::new(p))
    }

    fn border_policy(&self) -> BorderPolicy {
        match self.kind {
            WordKind::End | WordKind::RunEnd => BorderPolicy::Inclusive,
            _ => BorderPolicy::Exclusive,
        }
    }

    fn name(&self) -> &'static str {
        match (self.kind, self.big) {
            (WordKind::Forward, false) => "w",
            (WordKind::Forward, true) => "W",
            (WordKind::Backward, false) => "b",
            (WordKind::Backward, true) => "B",
            (WordKind::End, false) => "e",
            (WordKind::End, true) => "E",
            (WordKind::RunStart, _) => "word-start",
            (WordKind::RunEnd, _) => "word-end",
        }
    }
}
