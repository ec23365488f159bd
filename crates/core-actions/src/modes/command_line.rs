//! The `:` command line and the `/` `?` search prompt.
//!
//! Both edit a [`LineBuffer`] shown through `set_command_line`, understand
//! `<Left> <Right> <BS> <C-u> <Esc> <CR>`, and return to Normal mode when the
//! line is submitted or abandoned. `<BS>` on an empty line abandons it.

use super::line_buffer::LineBuffer;
use super::{COMMAND, EditorMode, NORMAL, SEARCH, commands, report};
use crate::editor::{EditorContext, ModeArg};
use crate::error::{CommandError, CommandResult};
use crate::motion::{Motion, SearchMotion, normalize_normal_position};
use core_events::{KeyCode, KeyStroke};
use core_keymap::COMMAND_MAP;
use core_text::StickyColumnPolicy;
use tracing::{debug, trace};

/// What the prompt wants after a key.
enum PromptEvent {
    Edited,
    Submit(String),
    Abandon,
    Ignored,
}

#[derive(Debug, Default)]
struct Prompt {
    line: LineBuffer,
}

impl Prompt {
    fn feed(&mut self, key: KeyStroke) -> PromptEvent {
        if key.is_ctrl('u') {
            self.line.kill_to_start();
            return PromptEvent::Edited;
        }
        match key.code {
            KeyCode::Esc => PromptEvent::Abandon,
            KeyCode::Enter => PromptEvent::Submit(self.line.contents()),
            KeyCode::Backspace if self.line.is_empty() => PromptEvent::Abandon,
            KeyCode::Backspace => {
                self.line.backspace();
                PromptEvent::Edited
            }
            KeyCode::Left => {
                self.line.left();
                PromptEvent::Edited
            }
            KeyCode::Right => {
                self.line.right();
                PromptEvent::Edited
            }
            _ => match key.as_char() {
                Some(c) => {
                    self.line.insert(c);
                    PromptEvent::Edited
                }
                None => PromptEvent::Ignored,
            },
        }
    }

    fn show(&self, editor: &mut EditorContext, lead: char) {
        let shown = format!("{lead}{}", self.line.contents());
        editor.ui().set_command_line(Some(&shown));
    }
}

#[derive(Debug, Default)]
pub struct CommandLineMode {
    prompt: Prompt,
}

impl CommandLineMode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditorMode for CommandLineMode {
    fn name(&self) -> &'static str {
        COMMAND
    }

    fn display_name(&self) -> &'static str {
        "COMMAND"
    }

    fn enter_mode(&mut self, editor: &mut EditorContext, _args: &[ModeArg]) -> CommandResult<()> {
        self.prompt.line.clear();
        self.prompt.show(editor, ':');
        Ok(())
    }

    fn leave_mode(&mut self, editor: &mut EditorContext) {
        self.prompt.line.clear();
        editor.ui().set_command_line(None);
    }

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        trace!(target: "actions.mode", mode = COMMAND, ?key, "key");
        match self.prompt.feed(key) {
            PromptEvent::Edited => self.prompt.show(editor, ':'),
            PromptEvent::Abandon => editor.change_mode(NORMAL, Vec::new()),
            PromptEvent::Submit(line) => {
                editor.change_mode(NORMAL, Vec::new());
                if let Err(err) = commands::execute(editor, &line) {
                    report(editor, COMMAND, &err);
                }
            }
            PromptEvent::Ignored => return false,
        }
        true
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        Some(COMMAND_MAP)
    }
}

#[derive(Debug, Default)]
pub struct SearchMode {
    prompt: Prompt,
    backward: bool,
}

impl SearchMode {
    pub fn new() -> Self {
        Self::default()
    }

    fn lead(&self) -> char {
        if self.backward { '?' } else { '/' }
    }

    /// Jump to the next match of `pattern`; an empty pattern reuses the last one.
    fn search(&self, editor: &mut EditorContext, pattern: String) -> CommandResult<()> {
        let pattern = if pattern.is_empty() {
            editor
                .registers()
                .last_search()
                .ok_or(CommandError::NoPreviousSearch)?
                .pattern
        } else {
            pattern
        };
        let motion = SearchMotion::new(pattern, self.backward);
        motion.compile()?;
        editor.registers_mut().set_last_search(motion.to_last_search());
        let from = editor.position();
        let dest = motion.destination(editor, None, from)?;
        let dest = normalize_normal_position(editor.content(), dest);
        debug!(target: "actions.motion", pattern = motion.pattern(), backward = self.backward, dest = dest.offset(), "search");
        editor.set_position(dest, StickyColumnPolicy::OnChange);
        Ok(())
    }
}

impl EditorMode for SearchMode {
    fn name(&self) -> &'static str {
        SEARCH
    }

    fn display_name(&self) -> &'static str {
        "SEARCH"
    }

    fn enter_mode(&mut self, editor: &mut EditorContext, args: &[ModeArg]) -> CommandResult<()> {
        self.backward = args.contains(&ModeArg::SearchBackward);
        self.prompt.line.clear();
        self.prompt.show(editor, self.lead());
        Ok(())
    }

    fn leave_mode(&mut self, editor: &mut EditorContext) {
        self.prompt.line.clear();
        editor.ui().set_command_line(None);
    }

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        trace!(target: "actions.mode", mode = SEARCH, ?key, "key");
        match self.prompt.feed(key) {
            PromptEvent::Edited => self.prompt.show(editor, self.lead()),
            PromptEvent::Abandon => editor.change_mode(NORMAL, Vec::new()),
            PromptEvent::Submit(pattern) => {
                editor.change_mode(NORMAL, Vec::new());
                if let Err(err) = self.search(editor, pattern) {
                    report(editor, SEARCH, &err);
                }
            }
            PromptEvent::Ignored => return false,
        }
        true
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        Some(COMMAND_MAP)
    }
}
