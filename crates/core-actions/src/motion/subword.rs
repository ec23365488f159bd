//! Sub-word motions (`\b \w \e`) and text objects (`i\ a\`).
//!
//! Each step takes the text between the ordinary word motion's destination
//! and the current offset as a window, then looks for camelCase and
//! snake_case boundaries inside it. Without a boundary the motion behaves like
//! the ordinary word motion.

use super::word::{is_word_char, word_backward, word_end, word_forward};
use super::{Motion, count_or_one};
use crate::editor::EditorContext;
use crate::error::CommandResult;
use crate::text_object::TextObject;
use core_text::{BorderPolicy, ContentType, Position, TextContent, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubwordLimit {
    /// `\b`
    Back,
    /// `\e`
    End,
    /// `\w`
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubwordMotion {
    limit: SubwordLimit,
}

fn lower_or_digit(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// `$` semantics of a window: its end, or just before a final line terminator.
fn at_window_end(w: &[char], p: usize) -> bool {
    match &w[p..] {
        [] | ['\n'] | ['\r'] | ['\r', '\n'] => true,
        _ => false,
    }
}

/// Start of each uppercase run that follows a lowercase letter or digit and is
/// itself followed by one (or by the window end).
fn camel_starts(w: &[char]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut p = 1;
    while p < w.len() {
        if lower_or_digit(w[p - 1]) && w[p].is_ascii_uppercase() {
            let mut q = p;
            while q < w.len() && w[q].is_ascii_uppercase() {
                q += 1;
            }
            if at_window_end(w, q) {
                out.push(p);
                p = q.max(p + 1);
                continue;
            }
            if lower_or_digit(w[q]) {
                out.push(p);
                p = q + 1;
                continue;
            }
        }
        p += 1;
    }
    out
}

/// Lowercase letter or digit right before such an uppercase run.
fn camel_ends(w: &[char]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut p = 0;
    while p + 1 < w.len() {
        if lower_or_digit(w[p]) && w[p + 1].is_ascii_uppercase() {
            let mut q = p + 1;
            while q < w.len() && w[q].is_ascii_uppercase() {
                q += 1;
            }
            if at_window_end(w, q) {
                out.push(p);
                p = q;
                continue;
            }
            if lower_or_digit(w[q]) {
                out.push(p);
                p = q + 1;
                continue;
            }
        }
        p += 1;
    }
    out
}

/// First alphanumeric after each underscore run.
fn snake_starts(w: &[char]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut p = 0;
    while p < w.len() {
        if w[p] == '_' {
            let mut q = p;
            while q < w.len() && w[q] == '_' {
                q += 1;
            }
            if q < w.len() && w[q].is_ascii_alphanumeric() {
                out.push(q);
                p = q + 1;
                continue;
            }
        }
        p += 1;
    }
    out
}

/// Alphanumeric directly before an underscore.
fn snake_ends(w: &[char]) -> Vec<usize> {
    let mut out = Vec::new();
    let mut p = 0;
    while p + 1 < w.len() {
        if w[p].is_ascii_alphanumeric() && w[p + 1] == '_' {
            out.push(p);
            p += 2;
        } else {
            p += 1;
        }
    }
    out
}

impl SubwordMotion {
    pub const BACK: Self = Self {
        limit: SubwordLimit::Back,
    };
    pub const END: Self = Self {
        limit: SubwordLimit::End,
    };
    pub const WORD: Self = Self {
        limit: SubwordLimit::Word,
    };

    pub fn limit(&self) -> SubwordLimit {
        self.limit
    }

    /// Boundary in the window spanned by the ordinary word motion from `from`
    /// and `offset`.
    fn locate(&self, content: &dyn TextContent, from: usize, offset: usize) -> usize {
        let word_dest = match self.limit {
            SubwordLimit::Back => word_backward(content, from),
            SubwordLimit::End => word_end(content, from),
            SubwordLimit::Word => word_forward(content, from),
        };
        let window = TextRange::new(Position::new(word_dest), Position::new(offset));
        let chars: Vec<char> = content.text_in(window).chars().collect();
        let text: String = chars.iter().collect();
        let end = self.limit == SubwordLimit::End;

        let mut matches = Vec::new();
        if text.contains('_') {
            matches = if end {
                snake_ends(&chars)
            } else {
                snake_starts(&chars)
            };
        }
        if text != text.to_lowercase() && text != text.to_uppercase() {
            let both = !matches.is_empty();
            matches.extend(if end {
                camel_ends(&chars)
            } else {
                camel_starts(&chars)
            });
            if both {
                matches.sort_unstable();
            }
        }

        let rel = match self.limit {
            SubwordLimit::Back => matches.last().copied().unwrap_or(0),
            _ => matches.first().copied().unwrap_or(chars.len()),
        };
        window.left_bound().offset() + rel
    }
}

impl Motion for SubwordMotion {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        let content = editor.content();
        let origin = from.offset();
        let mut to = origin;
        for _ in 0..count_or_one(count) {
            let before = to;
            to = self.locate(content, origin, to);
            if self.limit == SubwordLimit::End && to == before && to < content.text_length() {
                // Matched on itself; look one further.
                to = self.locate(content, origin, to + 1);
            }
        }
        Ok(Position::new(to))
    }

    fn border_policy(&self) -> BorderPolicy {
        match self.limit {
            SubwordLimit::End => BorderPolicy::Inclusive,
            _ => BorderPolicy::Exclusive,
        }
    }

    fn name(&self) -> &'static str {
        match self.limit {
            SubwordLimit::Back => "\\b",
            SubwordLimit::End => "\\e",
            SubwordLimit::Word => "\\w",
        }
    }
}

/// `i\` (inner) and `a\` (outer, keeps the trailing `_`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubwordTextObject {
    outer: bool,
}

impl SubwordTextObject {
    pub const INNER: Self = Self { outer: false };
    pub const OUTER: Self = Self { outer: true };
}

impl TextObject for SubwordTextObject {
    fn region(&self, editor: &EditorContext, count: Option<usize>) -> CommandResult<TextRange> {
        let content = editor.content();
        let cursor = editor.position().offset();

        let at_word_start = cursor > 0
            && content.char_at(cursor - 1).is_some_and(|c| !is_word_char(c))
            && content.char_at(cursor).is_some_and(is_word_char);
        let start = if at_word_start {
            cursor
        } else {
            SubwordMotion::BACK.locate(content, cursor, cursor + 1)
        };

        let word_end_offset = word_end(content, cursor);
        let last = if self.outer {
            SubwordMotion::WORD
        } else {
            SubwordMotion::END
        };
        let mut end = cursor;
        let mut hit_word_end = false;
        for i in (1..=count_or_one(count)).rev() {
            let step = if i > 1 { SubwordMotion::WORD } else { last };
            end = step.locate(content, cursor, end);
            if end > word_end_offset {
                end = word_end_offset;
                hit_word_end = true;
                break;
            }
        }
        if !self.outer || hit_word_end {
            end += 1;
        }
        Ok(TextRange::new(Position::new(start), Position::new(end)))
    }

    fn content_type(&self) -> ContentType {
        ContentType::Text
    }

    fn name(&self) -> &'static str {
        if self.outer { "a\\" } else { "i\\" }
    }
}
