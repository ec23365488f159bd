//! Operators (`d y c`) applied to a range, and put (`p P`).
//!
//! Every edit is computed in full before the buffer is touched, so a failing
//! text object leaves the text unchanged.

use crate::editor::EditorContext;
use crate::error::{CommandError, CommandResult};
use crate::modes::INSERT;
use crate::motion::{first_non_blank, last_line};
use crate::text_object::TextObject;
use core_state::RegisterContent;
use core_text::{ContentType, Position, StickyColumnPolicy, TextContent, TextRange};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Yank,
    Change,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(Operator::Delete),
            'y' => Some(Operator::Yank),
            'c' => Some(Operator::Change),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Operator::Delete => 'd',
            Operator::Yank => 'y',
            Operator::Change => 'c',
        }
    }

    /// Evaluate `object` at the cursor and apply the operator to its range.
    pub fn apply_text_object(
        self,
        editor: &mut EditorContext,
        object: &dyn TextObject,
        count: Option<usize>,
        register: Option<char>,
    ) -> CommandResult<()> {
        let range = object.region(editor, count)?;
        self.apply(editor, range, object.content_type(), register)
    }

    pub fn apply(
        self,
        editor: &mut EditorContext,
        range: TextRange,
        kind: ContentType,
        register: Option<char>,
    ) -> CommandResult<()> {
        let text = register_text(editor.content(), range, kind);
        debug!(target: "actions.command", op = %self.as_char(), left = range.left_bound().offset(), right = range.right_bound().offset(), ?kind, ?register, "operator");
        match self {
            Operator::Yank => {
                editor
                    .registers_mut()
                    .write_yank(register, RegisterContent::new(text, kind));
                let dest = match kind {
                    ContentType::Text => range.left_bound(),
                    ContentType::Lines => same_column_on(editor, range.left_bound()),
                };
                editor.set_position(dest, StickyColumnPolicy::OnChange);
            }
            Operator::Delete => {
                editor
                    .registers_mut()
                    .write_delete(register, RegisterContent::new(text, kind));
                let removed = removal_range(editor.content(), range, kind);
                editor.content_mut().replace(
                    removed.left_bound().offset(),
                    removed.model_length(),
                    "",
                );
                let dest = match kind {
                    ContentType::Text => removed.left_bound(),
                    ContentType::Lines => line_start_after_edit(editor.content(), removed.left_bound()),
                };
                editor.set_position(dest, StickyColumnPolicy::OnChange);
            }
            Operator::Change => {
                editor
                    .registers_mut()
                    .write_delete(register, RegisterContent::new(text, kind));
                let left = range.left_bound().offset();
                // Changing lines keeps one (now empty) line to type into.
                let keep = match kind {
                    ContentType::Lines if editor.content().text_in(range).ends_with('\n') => "\n",
                    _ => "",
                };
                editor.content_mut().replace(left, range.model_length(), keep);
                editor.set_position(Position::new(left), StickyColumnPolicy::OnChange);
                editor.change_mode(INSERT, Vec::new());
            }
        }
        Ok(())
    }
}

/// Register payload for a range. Line-wise content always ends with a line
/// terminator.
fn register_text(content: &dyn TextContent, range: TextRange, kind: ContentType) -> String {
    let mut text = content.text_in(range);
    if kind == ContentType::Lines && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// Deleting the last lines of a text without a trailing terminator also takes
/// the terminator before them.
fn removal_range(content: &dyn TextContent, range: TextRange, kind: ContentType) -> TextRange {
    let left = range.left_bound().offset();
    let right = range.right_bound().offset();
    let unterminated = !content.text_in(range).ends_with('\n');
    if kind == ContentType::Lines && unterminated && right == content.text_length() && left > 0 {
        TextRange::new(Position::new(left - 1), range.right_bound())
    } else {
        range
    }
}

fn line_start_after_edit(content: &dyn TextContent, at: Position) -> Position {
    let mut line = content.line_information_of_offset(at.offset());
    if line.number() > last_line(content) {
        line = content.line_information(last_line(content));
    }
    Position::new(first_non_blank(content, &line))
}

/// The cursor column carried over to the line containing `target`.
fn same_column_on(editor: &EditorContext, target: Position) -> Position {
    let content = editor.content();
    let here = editor.position().offset();
    let col = here - content.line_information_of_offset(here).begin_offset();
    let line = content.line_information_of_offset(target.offset());
    Position::new((line.begin_offset() + col).min(line.last_char_offset()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PastePlacement {
    /// `p`
    After,
    /// `P`
    Before,
}

/// Put register contents `count` times next to the cursor.
pub fn paste(
    editor: &mut EditorContext,
    register: Option<char>,
    count: usize,
    placement: PastePlacement,
) -> CommandResult<()> {
    let content = editor
        .registers()
        .register(register)
        .ok_or(CommandError::EmptyRegister(register.unwrap_or('"')))?;
    let payload = content.text.repeat(count.max(1));
    if payload.is_empty() {
        return Err(CommandError::EmptyRegister(register.unwrap_or('"')));
    }
    let cursor = editor.position().offset();
    let text = editor.content();
    let line = text.line_information_of_offset(cursor);
    debug!(target: "actions.command", ?register, count, ?placement, kind = ?content.kind, "paste");
    match content.kind {
        ContentType::Text => {
            let at = match placement {
                PastePlacement::Before => cursor,
                PastePlacement::After if line.length() == 0 => cursor,
                PastePlacement::After => (cursor + 1).min(line.end_offset()),
            };
            let inserted = payload.chars().count();
            editor.content_mut().replace(at, 0, &payload);
            editor.set_position(Position::new(at + inserted - 1), StickyColumnPolicy::OnChange);
        }
        ContentType::Lines => {
            let at = match placement {
                PastePlacement::Before => line.begin_offset(),
                PastePlacement::After => text.next_line_begin(line.number()),
            };
            let first_line_begin = if placement == PastePlacement::After
                && line.end_offset() == text.text_length()
            {
                // Current line has no terminator: open a line first.
                let body = payload.strip_suffix('\n').unwrap_or(&payload);
                let insert = format!("\n{body}");
                editor.content_mut().replace(at, 0, &insert);
                at + 1
            } else {
                editor.content_mut().replace(at, 0, &payload);
                at
            };
            let content = editor.content();
            let line = content.line_information_of_offset(first_line_begin);
            let dest = first_non_blank(content, &line);
            editor.set_position(Position::new(dest), StickyColumnPolicy::OnChange);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::BasicMotion;
    use crate::text_object::{MotionTextObject, inner_word};
    use crate::test_support::editor_at;

    fn contents(e: &EditorContext) -> String {
        e.content().text(0, e.content().text_length())
    }

    #[test]
    fn delete_writes_register_and_moves_cursor() {
        let mut e = editor_at("foo bar", 5);
        Operator::Delete
            .apply_text_object(&mut e, &inner_word(false), None, None)
            .unwrap();
        assert_eq!(contents(&e), "foo ");
        assert_eq!(e.position().offset(), 4);
        assert_eq!(e.registers().register(None).unwrap().text, "bar");
    }

    #[test]
    fn delete_last_line_takes_previous_terminator() {
        let mut e = editor_at("a\n  b", 3);
        let lines = MotionTextObject::new(BasicMotion::CurrentLines);
        Operator::Delete
            .apply_text_object(&mut e, &lines, None, Some('x'))
            .unwrap();
        assert_eq!(contents(&e), "a");
        let reg = e.registers().register(Some('x')).unwrap();
        assert_eq!(reg, RegisterContent::lines("  b\n"));
        assert_eq!(e.position().offset(), 0);
    }

    #[test]
    fn change_lines_keeps_an_empty_line() {
        let mut e = editor_at("one\ntwo\nthree", 5);
        let lines = MotionTextObject::new(BasicMotion::CurrentLines);
        Operator::Change
            .apply_text_object(&mut e, &lines, None, None)
            .unwrap();
        assert_eq!(contents(&e), "one\n\nthree");
        assert_eq!(e.position().offset(), 4);
        assert_eq!(e.next_mode_request().unwrap().name, INSERT);
    }

    #[test]
    fn yank_leaves_text_alone() {
        let mut e = editor_at("abc def", 6);
        let r = TextRange::new(Position::new(4), Position::new(7));
        Operator::Yank.apply(&mut e, r, ContentType::Text, Some('a')).unwrap();
        assert_eq!(contents(&e), "abc def");
        assert_eq!(e.position().offset(), 4);
        assert_eq!(e.registers().register(Some('a')).unwrap().text, "def");
    }

    #[test]
    fn paste_text_and_lines() {
        let mut e = editor_at("ab\ncd", 0);
        e.registers_mut().write_yank(None, RegisterContent::text("XY"));
        paste(&mut e, None, 2, PastePlacement::After).unwrap();
        assert_eq!(contents(&e), "aXYXYb\ncd");
        assert_eq!(e.position().offset(), 4);

        e.registers_mut().write_yank(None, RegisterContent::lines("new\n"));
        paste(&mut e, None, 1, PastePlacement::After).unwrap();
        assert_eq!(contents(&e), "aXYXYb\nnew\ncd");
        assert_eq!(e.position().offset(), 7);

        paste(&mut e, None, 1, PastePlacement::Before).unwrap();
        assert_eq!(contents(&e), "aXYXYb\nnew\nnew\ncd");
    }

    #[test]
    fn paste_lines_after_unterminated_last_line() {
        let mut e = editor_at("ab", 1);
        e.registers_mut().write_yank(None, RegisterContent::lines("cd\n"));
        paste(&mut e, None, 1, PastePlacement::After).unwrap();
        assert_eq!(contents(&e), "ab\ncd");
        assert_eq!(e.position().offset(), 3);
    }

    #[test]
    fn paste_from_empty_register_fails() {
        let mut e = editor_at("ab", 0);
        assert_eq!(
            paste(&mut e, Some('q'), 1, PastePlacement::After),
            Err(CommandError::EmptyRegister('q'))
        );
    }
}
