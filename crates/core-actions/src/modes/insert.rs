//! Insert and Replace mode.
//!
//! Both type literal text. Recognized control keys: `<Esc>` (back to Normal,
//! cursor one left), `<CR>`, `<BS>`, `<Del>`, `<Tab>`, `<C-w>` (delete the
//! word before the cursor), `<C-u>` (delete what was typed on this line),
//! `<C-x>` (line completion) and the arrow keys. In Insert mode the cursor may
//! rest just past the last character of a line.

use super::{EditorMode, INSERT, INSERT_EXPAND, NORMAL, REPLACE};
use crate::editor::{EditorContext, ModeArg};
use crate::error::CommandResult;
use crate::motion::{BasicMotion, Motion, WordMotion};
use core_events::{KeyCode, KeyModifiers, KeyStroke};
use core_keymap::INSERT_MAP;
use core_text::{Position, StickyColumnPolicy};
use tracing::trace;

/// What a control key asks the mode to do.
enum Control {
    Handled,
    NotControl,
}

fn insert_text(editor: &mut EditorContext, text: &str) {
    let at = editor.position().offset();
    editor.content_mut().replace(at, 0, text);
    let len = text.chars().count();
    editor.set_position(Position::new(at + len), StickyColumnPolicy::OnChange);
}

/// Leave for Normal mode; the cursor steps back onto the last typed character.
fn escape(editor: &mut EditorContext) {
    let at = editor.position().offset();
    let line = editor.content().line_information_of_offset(at);
    if at > line.begin_offset() {
        editor.set_position(Position::new(at - 1), StickyColumnPolicy::OnChange);
    }
    editor.change_mode(NORMAL, Vec::new());
}

/// Arrow keys move without the Normal-mode end-of-line clamp.
fn arrow(editor: &mut EditorContext, key: KeyStroke) -> bool {
    let motion = match key.code {
        KeyCode::Left => BasicMotion::Left,
        KeyCode::Right => BasicMotion::Right,
        KeyCode::Up => BasicMotion::Up,
        KeyCode::Down => BasicMotion::Down,
        KeyCode::Home => BasicMotion::LineStart,
        KeyCode::End => BasicMotion::LineEnd,
        _ => return false,
    };
    let from = editor.position();
    if let Ok(mut dest) = motion.destination(editor, None, from) {
        if motion == BasicMotion::LineEnd {
            dest = Position::new(editor.content().line_information_of_offset(dest.offset()).end_offset());
        }
        editor.set_position(dest, motion.sticky_column_policy());
    }
    true
}

/// Keys both modes treat alike.
fn common_control(editor: &mut EditorContext, key: KeyStroke, typed_from: Option<usize>) -> Control {
    if key.mods.contains(KeyModifiers::CTRL) {
        match key.code {
            KeyCode::Char('x') => editor.change_mode(INSERT_EXPAND, Vec::new()),
            KeyCode::Char('w') => {
                let at = editor.position().offset();
                let line = editor.content().line_information_of_offset(at);
                let start = WordMotion::BACKWARD
                    .destination(editor, None, Position::new(at))
                    .map_or(at, |p| p.offset())
                    .max(line.begin_offset());
                delete_back_to(editor, start);
            }
            KeyCode::Char('u') => {
                let at = editor.position().offset();
                let line = editor.content().line_information_of_offset(at);
                let start = typed_from
                    .filter(|&s| s >= line.begin_offset() && s < at)
                    .unwrap_or(line.begin_offset());
                delete_back_to(editor, start);
            }
            _ => return Control::NotControl,
        }
        return Control::Handled;
    }
    match key.code {
        KeyCode::Esc => escape(editor),
        KeyCode::Tab => insert_text(editor, "\t"),
        KeyCode::Delete => {
            let at = editor.position().offset();
            if at < editor.content().text_length() {
                editor.content_mut().replace(at, 1, "");
            }
        }
        _ if arrow(editor, key) => {}
        _ => return Control::NotControl,
    }
    Control::Handled
}

fn delete_back_to(editor: &mut EditorContext, start: usize) {
    let at = editor.position().offset();
    if start < at {
        editor.content_mut().replace(start, at - start, "");
        editor.set_position(Position::new(start), StickyColumnPolicy::OnChange);
    }
}

#[derive(Debug, Default)]
pub struct InsertMode {
    /// Where typing started; kept when Insert is resumed after completion.
    typed_from: Option<usize>,
}

impl InsertMode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditorMode for InsertMode {
    fn name(&self) -> &'static str {
        INSERT
    }

    fn display_name(&self) -> &'static str {
        "INSERT"
    }

    fn enter_mode(&mut self, editor: &mut EditorContext, args: &[ModeArg]) -> CommandResult<()> {
        if !args.contains(&ModeArg::Resume) || self.typed_from.is_none() {
            self.typed_from = Some(editor.position().offset());
        }
        Ok(())
    }

    fn leave_mode(&mut self, _editor: &mut EditorContext) {}

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        trace!(target: "actions.mode", mode = INSERT, ?key, "key");
        if let Control::Handled = common_control(editor, key, self.typed_from) {
            return true;
        }
        match key.code {
            KeyCode::Enter if key.mods.is_empty() => insert_text(editor, "\n"),
            KeyCode::Backspace => {
                let at = editor.position().offset();
                if at > 0 {
                    delete_back_to(editor, at - 1);
                }
            }
            _ => match key.as_char() {
                Some(c) => insert_text(editor, c.encode_utf8(&mut [0; 4])),
                None => return false,
            },
        }
        true
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        Some(INSERT_MAP)
    }
}

/// Overwrites characters; `<BS>` restores what was overwritten.
#[derive(Debug, Default)]
pub struct ReplaceMode {
    /// One entry per typed character: the character it replaced, or `None`
    /// when it was appended.
    replaced: Vec<Option<char>>,
    typed_from: Option<usize>,
}

impl ReplaceMode {
    pub fn new() -> Self {
        Self::default()
    }

    fn overwrite(&mut self, editor: &mut EditorContext, c: char) {
        let at = editor.position().offset();
        let under = editor.content().char_at(at).filter(|&u| u != '\n' && u != '\r');
        let mut buf = [0; 4];
        editor
            .content_mut()
            .replace(at, usize::from(under.is_some()), c.encode_utf8(&mut buf));
        editor.set_position(Position::new(at + 1), StickyColumnPolicy::OnChange);
        self.replaced.push(under);
    }

    fn restore(&mut self, editor: &mut EditorContext) {
        let at = editor.position().offset();
        if at == 0 {
            return;
        }
        match self.replaced.pop() {
            Some(Some(original)) => {
                let mut buf = [0; 4];
                editor
                    .content_mut()
                    .replace(at - 1, 1, original.encode_utf8(&mut buf));
            }
            Some(None) => editor.content_mut().replace(at - 1, 1, ""),
            None => {}
        }
        editor.set_position(Position::new(at - 1), StickyColumnPolicy::OnChange);
    }
}

impl EditorMode for ReplaceMode {
    fn name(&self) -> &'static str {
        REPLACE
    }

    fn display_name(&self) -> &'static str {
        "REPLACE"
    }

    fn enter_mode(&mut self, editor: &mut EditorContext, _args: &[ModeArg]) -> CommandResult<()> {
        self.replaced.clear();
        self.typed_from = Some(editor.position().offset());
        Ok(())
    }

    fn leave_mode(&mut self, _editor: &mut EditorContext) {
        self.replaced.clear();
    }

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        trace!(target: "actions.mode", mode = REPLACE, ?key, "key");
        match key.code {
            KeyCode::Backspace => {
                self.restore(editor);
                return true;
            }
            KeyCode::Enter if key.mods.is_empty() => {
                insert_text(editor, "\n");
                self.replaced.push(None);
                return true;
            }
            _ => {}
        }
        if let Control::Handled = common_control(editor, key, self.typed_from) {
            // Edits made through control keys cannot be restored.
            self.replaced.clear();
            return true;
        }
        match key.as_char() {
            Some(c) => {
                self.overwrite(editor, c);
                true
            }
            None => false,
        }
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        Some(INSERT_MAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::editor_at;

    fn contents(e: &EditorContext) -> String {
        e.content().text(0, e.content().text_length())
    }

    fn feed(mode: &mut dyn EditorMode, e: &mut EditorContext, keys: &[KeyStroke]) {
        for k in keys {
            assert!(mode.handle_key(e, *k), "unhandled {k:?}");
        }
    }

    #[test]
    fn insert_types_and_edits() {
        let mut e = editor_at("ad", 1);
        let mut m = InsertMode::new();
        m.enter_mode(&mut e, &[]).unwrap();
        feed(&mut m, &mut e, &['b'.into(), 'c'.into(), KeyStroke::code(KeyCode::Enter)]);
        assert_eq!(contents(&e), "abc\nd");
        feed(&mut m, &mut e, &[KeyStroke::code(KeyCode::Backspace)]);
        assert_eq!(contents(&e), "abcd");
        feed(&mut m, &mut e, &[KeyStroke::ctrl('u')]);
        assert_eq!(contents(&e), "ad");
        assert_eq!(e.position().offset(), 1);
    }

    #[test]
    fn escape_steps_back_and_requests_normal() {
        let mut e = editor_at("ab", 2);
        let mut m = InsertMode::new();
        feed(&mut m, &mut e, &[KeyStroke::code(KeyCode::Esc)]);
        assert_eq!(e.position().offset(), 1);
        assert_eq!(e.next_mode_request().unwrap().name, NORMAL);
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut e = editor_at("foo bar", 7);
        let mut m = InsertMode::new();
        feed(&mut m, &mut e, &[KeyStroke::ctrl('w')]);
        assert_eq!(contents(&e), "foo ");
    }

    #[test]
    fn replace_overwrites_and_restores() {
        let mut e = editor_at("abc", 1);
        let mut m = ReplaceMode::new();
        m.enter_mode(&mut e, &[]).unwrap();
        feed(&mut m, &mut e, &['X'.into(), 'Y'.into(), 'Z'.into()]);
        assert_eq!(contents(&e), "aXYZ");
        let bs = KeyStroke::code(KeyCode::Backspace);
        feed(&mut m, &mut e, &[bs, bs]);
        assert_eq!(contents(&e), "aXc");
        assert_eq!(e.position().offset(), 2);
    }
}
