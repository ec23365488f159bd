//! Characterwise (`v`) and linewise (`V`) Visual mode.
//!
//! The selection anchor stays where Visual mode was entered and the head
//! follows the cursor. Operators act on the selection and return to Normal
//! mode (or Insert, for `c`).

use super::motion_keys::{MotionKeys, MotionStep, move_to, special_key_motion};
use super::{COMMAND, EditorMode, LINEWISE_VISUAL, NORMAL, VISUAL, push_count_digit, report};
use crate::editor::{EditorContext, ModeArg};
use crate::error::CommandResult;
use crate::motion::normalize_normal_position;
use crate::operator::Operator;
use crate::text_object::{SelectionTextObject, TextObject};
use core_events::{KeyCode, KeyStroke};
use core_keymap::VISUAL_MAP;
use core_state::{Selection, SelectionKind};
use core_text::{ContentType, StickyColumnPolicy, TextRange};
use tracing::{debug, trace};

/// State shared by both Visual flavors.
#[derive(Debug)]
struct VisualState {
    kind: SelectionKind,
    count: Option<usize>,
    register: Option<char>,
    awaiting_register: bool,
    motions: MotionKeys,
}

impl VisualState {
    fn new(kind: SelectionKind) -> Self {
        Self {
            kind,
            count: None,
            register: None,
            awaiting_register: false,
            motions: MotionKeys::default(),
        }
    }

    fn mode_name(&self) -> &'static str {
        match self.kind {
            SelectionKind::Characterwise => VISUAL,
            SelectionKind::Linewise => LINEWISE_VISUAL,
        }
    }

    fn reset(&mut self) {
        self.count = None;
        self.register = None;
        self.awaiting_register = false;
        self.motions.reset();
    }

    fn enter(&mut self, editor: &mut EditorContext, args: &[ModeArg]) {
        self.reset();
        let head = editor.position();
        let anchor = args
            .iter()
            .find_map(|arg| match arg {
                ModeArg::Anchor(p) => Some(*p),
                _ => None,
            })
            .unwrap_or(head);
        editor.set_selection(Some(Selection::new(anchor, head, self.kind)));
    }

    fn leave(&mut self, editor: &mut EditorContext) {
        self.reset();
        editor.set_selection(None);
    }

    /// Re-point the selection head at the cursor.
    fn follow_cursor(&self, editor: &mut EditorContext) {
        let head = editor.position();
        let anchor = editor.selection().map_or(head, |s| s.anchor);
        editor.set_selection(Some(Selection::new(anchor, head, self.kind)));
    }

    fn dispatch(&mut self, editor: &mut EditorContext, key: KeyStroke) -> CommandResult<bool> {
        if key.code == KeyCode::Esc {
            editor.change_mode(NORMAL, Vec::new());
            return Ok(true);
        }
        let Some(c) = key.as_char() else {
            let Some(motion) = special_key_motion(key) else {
                return Ok(false);
            };
            let count = self.count.take();
            move_to(editor, motion.as_ref(), count)?;
            self.follow_cursor(editor);
            return Ok(true);
        };
        if self.awaiting_register {
            self.awaiting_register = false;
            if c.is_ascii_alphanumeric() || c == '"' || c == '_' {
                self.register = Some(c);
            }
            return Ok(true);
        }
        if !self.motions.is_pending() {
            if c == '"' {
                self.awaiting_register = true;
                return Ok(true);
            }
            if let Some(d) = c.to_digit(10)
                && (d != 0 || self.count.is_some())
            {
                self.count = Some(push_count_digit(self.count, d));
                return Ok(true);
            }
        }
        let had_prefix = self.motions.is_pending();
        match self.motions.feed(editor, c)? {
            MotionStep::Pending => Ok(true),
            MotionStep::Word(word) => {
                let count = self.count.take();
                move_to(editor, &word, count)?;
                self.follow_cursor(editor);
                Ok(true)
            }
            MotionStep::Motion(motion) => {
                let count = self.count.take();
                move_to(editor, motion.as_ref(), count)?;
                self.follow_cursor(editor);
                Ok(true)
            }
            MotionStep::NotAMotion if had_prefix => {
                self.reset();
                Ok(false)
            }
            MotionStep::NotAMotion => self.command(editor, c),
        }
    }

    fn command(&mut self, editor: &mut EditorContext, c: char) -> CommandResult<bool> {
        let register = self.register.take();
        self.count = None;
        debug!(target: "actions.mode", mode = self.mode_name(), command = %c, ?register, "command");
        let (op, linewise) = match c {
            'd' | 'x' => (Operator::Delete, false),
            'D' | 'X' => (Operator::Delete, true),
            'y' => (Operator::Yank, false),
            'Y' => (Operator::Yank, true),
            'c' | 's' => (Operator::Change, false),
            'C' | 'S' | 'R' => (Operator::Change, true),
            'o' => {
                if let Some(sel) = editor.selection() {
                    editor.set_selection(Some(Selection::new(sel.head, sel.anchor, sel.kind)));
                    editor.set_position(sel.anchor, StickyColumnPolicy::OnChange);
                }
                return Ok(true);
            }
            'v' | 'V' => {
                let target = if c == 'v' {
                    SelectionKind::Characterwise
                } else {
                    SelectionKind::Linewise
                };
                if target == self.kind {
                    editor.change_mode(NORMAL, Vec::new());
                } else {
                    let name = if c == 'v' { VISUAL } else { LINEWISE_VISUAL };
                    let anchor = editor.selection().map_or(editor.position(), |s| s.anchor);
                    editor.change_mode(name, vec![ModeArg::Anchor(anchor)]);
                }
                return Ok(true);
            }
            ':' => {
                editor.change_mode(COMMAND, Vec::new());
                return Ok(true);
            }
            _ => return Ok(false),
        };
        let (range, kind) = self.selected(editor, linewise)?;
        op.apply(editor, range, kind, register)?;
        if op != Operator::Change {
            let pos = normalize_normal_position(editor.content(), editor.position());
            editor.set_position(pos, StickyColumnPolicy::OnChange);
            editor.change_mode(NORMAL, Vec::new());
        }
        Ok(true)
    }

    fn selected(
        &self,
        editor: &EditorContext,
        force_lines: bool,
    ) -> CommandResult<(TextRange, ContentType)> {
        let mut kind = SelectionTextObject::content_type_for(editor);
        let mut range = SelectionTextObject.region(editor, None)?;
        if force_lines && kind == ContentType::Text {
            let last = range.right_bound().add_offset(-1).max(range.left_bound());
            range = TextRange::lines(editor.content(), range.left_bound(), last);
            kind = ContentType::Lines;
        }
        Ok((range, kind))
    }

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        let mode = self.mode_name();
        trace!(target: "actions.mode", mode, ?key, "key");
        match self.dispatch(editor, key) {
            Ok(handled) => handled,
            Err(err) => {
                self.reset();
                report(editor, mode, &err);
                true
            }
        }
    }

    fn key_map(&self) -> Option<&'static str> {
        if self.awaiting_register || self.motions.awaits_literal() {
            None
        } else {
            Some(VISUAL_MAP)
        }
    }
}

#[derive(Debug)]
pub struct VisualMode {
    state: VisualState,
}

impl VisualMode {
    pub fn new() -> Self {
        Self {
            state: VisualState::new(SelectionKind::Characterwise),
        }
    }
}

impl Default for VisualMode {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorMode for VisualMode {
    fn name(&self) -> &'static str {
        VISUAL
    }

    fn display_name(&self) -> &'static str {
        "VISUAL"
    }

    fn enter_mode(&mut self, editor: &mut EditorContext, args: &[ModeArg]) -> CommandResult<()> {
        self.state.enter(editor, args);
        Ok(())
    }

    fn leave_mode(&mut self, editor: &mut EditorContext) {
        self.state.leave(editor);
    }

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        self.state.handle_key(editor, key)
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        self.state.key_map()
    }
}

#[derive(Debug)]
pub struct LinewiseVisualMode {
    state: VisualState,
}

impl LinewiseVisualMode {
    pub fn new() -> Self {
        Self {
            state: VisualState::new(SelectionKind::Linewise),
        }
    }
}

impl Default for LinewiseVisualMode {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorMode for LinewiseVisualMode {
    fn name(&self) -> &'static str {
        LINEWISE_VISUAL
    }

    fn display_name(&self) -> &'static str {
        "VISUAL LINE"
    }

    fn enter_mode(&mut self, editor: &mut EditorContext, args: &[ModeArg]) -> CommandResult<()> {
        self.state.enter(editor, args);
        Ok(())
    }

    fn leave_mode(&mut self, editor: &mut EditorContext) {
        self.state.leave(editor);
    }

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        self.state.handle_key(editor, key)
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        self.state.key_map()
    }
}
