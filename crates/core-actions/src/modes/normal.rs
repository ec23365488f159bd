//! Normal mode: `["x][count]operator[count](motion|text-object)`,
//! `[count]motion` and the single-key commands.
//!
//! Parser state:
//! * Idle: optional prefix count and register.
//! * Operator pending (`d`, `y`, `c`): a second count may follow; a leading
//!   `0` after the operator is the `0` motion, not a count. Repeating the
//!   operator key (`dd`) applies it to whole lines. Counts multiply (`2d3w`
//!   acts on six words).
//! * Awaiting a character (`r`, `f`, `t`, `"`): the key map is switched off so
//!   the character arrives untranslated.
//!
//! `<Esc>` cancels whatever is pending.

use super::motion_keys::{MotionKeys, MotionStep, move_to, special_key_motion};
use super::{
    COMMAND, EditorMode, INSERT, LINEWISE_VISUAL, NORMAL, REPLACE, SEARCH, VISUAL,
    push_count_digit, report,
};
use crate::editor::{EditorContext, ModeArg};
use crate::error::{CommandError, CommandResult};
use crate::motion::{
    BasicMotion, Motion, SubwordTextObject, WordKind, WordMotion, first_non_blank,
    normalize_normal_position,
};
use crate::operator::{Operator, PastePlacement, paste};
use crate::text_object::{MotionTextObject, TextObject, chars_on_line, inner_word, outer_word};
use core_events::{KeyCode, KeyStroke};
use core_keymap::NORMAL_MAP;
use core_text::{ContentType, Position, StickyColumnPolicy, TextRange};
use tracing::{debug, trace};

#[derive(Debug, Default)]
pub struct NormalMode {
    count: Option<usize>,
    register: Option<char>,
    awaiting_register: bool,
    operator: Option<Operator>,
    post_op_count: Option<usize>,
    /// `Some(outer)` after `i` / `a` while an operator is pending.
    object: Option<bool>,
    replace_char: bool,
    motions: MotionKeys,
}

impl NormalMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.count = None;
        self.register = None;
        self.awaiting_register = false;
        self.operator = None;
        self.post_op_count = None;
        self.object = None;
        self.replace_char = false;
        self.motions.reset();
    }

    /// Whether a command is partially typed.
    pub fn is_pending(&self) -> bool {
        self.count.is_some()
            || self.register.is_some()
            || self.awaiting_register
            || self.operator.is_some()
            || self.object.is_some()
            || self.replace_char
            || self.motions.is_pending()
    }

    /// Product of the prefix and post-operator counts; `None` when neither was typed.
    fn take_count(&mut self) -> Option<usize> {
        match (self.count.take(), self.post_op_count.take()) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(1).saturating_mul(b.unwrap_or(1)).min(999_999)),
        }
    }

    fn dispatch(&mut self, editor: &mut EditorContext, key: KeyStroke) -> CommandResult<bool> {
        if key.code == KeyCode::Esc {
            self.reset();
            return Ok(true);
        }
        let Some(c) = key.as_char() else {
            return self.special_key(editor, key);
        };

        if self.awaiting_register {
            self.awaiting_register = false;
            if c.is_ascii_alphanumeric() || c == '"' || c == '_' {
                self.register = Some(c);
            }
            return Ok(true);
        }
        if self.replace_char {
            self.replace_char = false;
            let count = self.take_count().unwrap_or(1);
            return replace_chars(editor, c, count).map(|_| true);
        }
        if let Some(outer) = self.object.take() {
            return self.apply_object(editor, outer, c);
        }
        if self.motions.is_pending() {
            return self.motion_step(editor, c);
        }

        if c == '"' && self.operator.is_none() {
            self.awaiting_register = true;
            return Ok(true);
        }
        if let Some(d) = c.to_digit(10) {
            let started = match self.operator {
                Some(_) => self.post_op_count.is_some(),
                None => self.count.is_some(),
            };
            if d != 0 || started {
                match self.operator {
                    Some(_) => self.post_op_count = Some(push_count_digit(self.post_op_count, d)),
                    None => self.count = Some(push_count_digit(self.count, d)),
                }
                return Ok(true);
            }
        }
        if let Some(op) = self.operator {
            if c == op.as_char() {
                return self.apply_lines(editor, op);
            }
            if c == 'i' || c == 'a' {
                self.object = Some(c == 'a');
                return Ok(true);
            }
        } else if let Some(op) = Operator::from_char(c) {
            self.operator = Some(op);
            return Ok(true);
        }
        self.motion_step(editor, c)
    }

    fn motion_step(&mut self, editor: &mut EditorContext, c: char) -> CommandResult<bool> {
        let had_prefix = self.motions.is_pending();
        match self.motions.feed(editor, c)? {
            MotionStep::Pending => Ok(true),
            MotionStep::Motion(motion) => self.run_motion(editor, motion, None),
            MotionStep::Word(word) => self.run_motion(editor, Box::new(word), Some(word)),
            MotionStep::NotAMotion if self.operator.is_some() || had_prefix => {
                self.reset();
                Ok(false)
            }
            MotionStep::NotAMotion => self.command(editor, c),
        }
    }

    fn special_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> CommandResult<bool> {
        if key == KeyStroke::code(KeyCode::Delete) && self.operator.is_none() {
            return self.command(editor, 'x');
        }
        match special_key_motion(key) {
            Some(motion) => self.run_motion(editor, motion, None),
            None => {
                self.reset();
                Ok(false)
            }
        }
    }

    /// `word` is the same motion as `motion` when it is a word motion.
    fn run_motion(
        &mut self,
        editor: &mut EditorContext,
        motion: Box<dyn Motion>,
        word: Option<WordMotion>,
    ) -> CommandResult<bool> {
        let count = self.take_count();
        let register = self.register.take();
        let operator = self.operator.take();
        self.reset();
        match operator {
            None => move_to(editor, motion.as_ref(), count)?,
            Some(op) => {
                let forward = word.filter(|w| w.kind == WordKind::Forward);
                let (motion, stop_at_line_end) = match forward {
                    Some(w) if change_to_word_end(editor, op) => {
                        (Box::new(WordMotion::new(WordKind::End, w.big)) as Box<dyn Motion>, false)
                    }
                    Some(_) => (motion, true),
                    None => (motion, false),
                };
                let object = MotionTextObject::new(motion);
                let mut range = object.region(editor, count)?;
                if stop_at_line_end {
                    range = stop_word_at_line_end(editor, range);
                }
                op.apply(editor, range, object.content_type(), register)?;
                settle_after(editor, op);
            }
        }
        Ok(true)
    }

    /// `dd`, `yy`, `cc`.
    fn apply_lines(&mut self, editor: &mut EditorContext, op: Operator) -> CommandResult<bool> {
        let count = self.take_count();
        let register = self.register.take();
        self.reset();
        let lines = MotionTextObject::new(BasicMotion::CurrentLines);
        op.apply_text_object(editor, &lines, count, register)?;
        settle_after(editor, op);
        Ok(true)
    }

    fn apply_object(
        &mut self,
        editor: &mut EditorContext,
        outer: bool,
        c: char,
    ) -> CommandResult<bool> {
        let count = self.take_count();
        let register = self.register.take();
        let Some(op) = self.operator.take() else {
            self.reset();
            return Ok(false);
        };
        self.reset();
        let object: Box<dyn TextObject> = match (c, outer) {
            ('w', false) => Box::new(inner_word(false)),
            ('W', false) => Box::new(inner_word(true)),
            ('w', true) => Box::new(outer_word(false)),
            ('W', true) => Box::new(outer_word(true)),
            ('\\', false) => Box::new(SubwordTextObject::INNER),
            ('\\', true) => Box::new(SubwordTextObject::OUTER),
            _ => return Ok(false),
        };
        op.apply_text_object(editor, object.as_ref(), count, register)?;
        settle_after(editor, op);
        Ok(true)
    }

    fn command(&mut self, editor: &mut EditorContext, c: char) -> CommandResult<bool> {
        let count = self.take_count();
        let register = self.register.take();
        self.reset();
        let n = count.unwrap_or(1);
        let cursor = editor.position();
        let line = editor.content().line_information_of_offset(cursor.offset());
        debug!(target: "actions.mode", mode = NORMAL, command = %c, ?count, ?register, "command");
        match c {
            'x' | 's' => {
                let range = chars_on_line(editor, cursor, n);
                let op = if c == 'x' { Operator::Delete } else { Operator::Change };
                if range.is_empty() && op == Operator::Delete {
                    return Ok(true);
                }
                op.apply(editor, range, ContentType::Text, register)?;
                settle_after(editor, op);
            }
            'X' => {
                let left = cursor.offset().saturating_sub(n).max(line.begin_offset());
                let range = TextRange::new(Position::new(left), cursor);
                if !range.is_empty() {
                    Operator::Delete.apply(editor, range, ContentType::Text, register)?;
                    settle_after(editor, Operator::Delete);
                }
            }
            'D' | 'C' => {
                let op = if c == 'D' { Operator::Delete } else { Operator::Change };
                let object = MotionTextObject::new(BasicMotion::LineEnd);
                op.apply_text_object(editor, &object, count, register)?;
                settle_after(editor, op);
            }
            'p' => paste(editor, register, n, PastePlacement::After)?,
            'P' => paste(editor, register, n, PastePlacement::Before)?,
            'r' => {
                self.count = count;
                self.register = register;
                self.replace_char = true;
            }
            'i' => editor.change_mode(INSERT, Vec::new()),
            'a' => {
                let dest = (cursor.offset() + 1).min(line.end_offset());
                editor.set_position(Position::new(dest), StickyColumnPolicy::OnChange);
                editor.change_mode(INSERT, Vec::new());
            }
            'I' => {
                let dest = first_non_blank(editor.content(), &line);
                editor.set_position(Position::new(dest), StickyColumnPolicy::OnChange);
                editor.change_mode(INSERT, Vec::new());
            }
            'A' => {
                editor.set_position(Position::new(line.end_offset()), StickyColumnPolicy::OnChange);
                editor.change_mode(INSERT, Vec::new());
            }
            'o' => {
                editor.content_mut().replace(line.end_offset(), 0, "\n");
                editor.set_position(Position::new(line.end_offset() + 1), StickyColumnPolicy::OnChange);
                editor.change_mode(INSERT, Vec::new());
            }
            'O' => {
                editor.content_mut().replace(line.begin_offset(), 0, "\n");
                editor.set_position(Position::new(line.begin_offset()), StickyColumnPolicy::OnChange);
                editor.change_mode(INSERT, Vec::new());
            }
            'R' => editor.change_mode(REPLACE, Vec::new()),
            'v' => editor.change_mode(VISUAL, Vec::new()),
            'V' => editor.change_mode(LINEWISE_VISUAL, Vec::new()),
            ':' => editor.change_mode(COMMAND, Vec::new()),
            '/' => editor.change_mode(SEARCH, Vec::new()),
            '?' => editor.change_mode(SEARCH, vec![ModeArg::SearchBackward]),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// `cw` on a word changes to the word end, like `ce`.
fn change_to_word_end(editor: &EditorContext, op: Operator) -> bool {
    let on_blank = editor
        .content()
        .char_at(editor.position().offset())
        .is_none_or(char::is_whitespace);
    op == Operator::Change && !on_blank
}

/// An operator with `w` that crosses into a later line stops at the end of
/// the line before it.
fn stop_word_at_line_end(editor: &EditorContext, range: TextRange) -> TextRange {
    let content = editor.content();
    let left = range.left_bound().offset();
    let first = content.line_information_of_offset(left);
    let last = content.line_information_of_offset(range.right_bound().offset());
    if last.number() <= first.number() {
        return range;
    }
    let end = content.line_information(last.number() - 1).end_offset().max(left);
    TextRange::new(range.left_bound(), Position::new(end))
}

/// Keep the cursor on a character after an operator that stays in Normal mode.
fn settle_after(editor: &mut EditorContext, op: Operator) {
    if op != Operator::Change {
        let pos = normalize_normal_position(editor.content(), editor.position());
        editor.set_position(pos, StickyColumnPolicy::OnChange);
    }
}

/// `r<char>`: overwrite `count` characters, all of which must be on the line.
fn replace_chars(editor: &mut EditorContext, c: char, count: usize) -> CommandResult<()> {
    let cursor = editor.position().offset();
    let line = editor.content().line_information_of_offset(cursor);
    if cursor + count > line.end_offset() {
        return Err(CommandError::PastLineEnd("replace"));
    }
    let replacement: String = std::iter::repeat_n(c, count).collect();
    editor.content_mut().replace(cursor, count, &replacement);
    editor.set_position(Position::new(cursor + count - 1), StickyColumnPolicy::OnChange);
    Ok(())
}

impl EditorMode for NormalMode {
    fn name(&self) -> &'static str {
        NORMAL
    }

    fn display_name(&self) -> &'static str {
        "NORMAL"
    }

    fn enter_mode(&mut self, editor: &mut EditorContext, _args: &[ModeArg]) -> CommandResult<()> {
        self.reset();
        let pos = normalize_normal_position(editor.content(), editor.position());
        editor.set_position(pos, StickyColumnPolicy::Never);
        Ok(())
    }

    fn leave_mode(&mut self, _editor: &mut EditorContext) {
        self.reset();
    }

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        trace!(target: "actions.mode", mode = NORMAL, ?key, "key");
        match self.dispatch(editor, key) {
            Ok(handled) => handled,
            Err(err) => {
                self.reset();
                report(editor, NORMAL, &err);
                true
            }
        }
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        if self.awaiting_register || self.replace_char || self.motions.awaits_literal() {
            None
        } else {
            Some(NORMAL_MAP)
        }
    }
}
