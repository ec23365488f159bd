//! `^X` sub-mode of Insert: whole-line completion.
//!
//! `<C-l>` and `<C-n>` step forward through the lines of the document that
//! start with the text typed before the cursor, `<C-p>` steps back. Index 0 of
//! the candidate list is the original text, so cycling past the end restores
//! it. Any other key resumes Insert mode and is delivered there.

use super::{EditorMode, INSERT, INSERT_EXPAND};
use crate::editor::{EditorContext, ModeArg};
use crate::error::CommandResult;
use core_events::{KeyCode, KeyModifiers, KeyStroke};
use core_text::{Position, StickyColumnPolicy, TextContent};
use std::collections::HashSet;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct Completion {
    indent: String,
    prefix: String,
    suffix: String,
    /// `matches[0]` is the prefix itself.
    matches: Vec<String>,
    index: usize,
    line: Option<usize>,
}

impl Completion {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn stale(&self, line_no: usize, line: &str) -> bool {
        self.matches.is_empty()
            || self.line != Some(line_no)
            || (self.index == 0 && line != format!("{}{}", self.indent, self.prefix))
    }

    fn rebuild(&mut self, content: &dyn TextContent, line_no: usize, line: &str, column: usize) {
        let indent_len = line.chars().take_while(|c| c.is_whitespace()).count();
        let column = column.max(indent_len);
        self.indent = line.chars().take(indent_len).collect();
        self.prefix = line.chars().skip(indent_len).take(column - indent_len).collect();
        self.suffix = line.chars().skip(column).collect();
        self.line = Some(line_no);
        self.index = 0;
        self.matches = vec![self.prefix.clone()];

        let mut seen: HashSet<String> = HashSet::from([self.prefix.clone(), String::new()]);
        for n in 0..content.number_of_lines() {
            let info = content.line_information(n);
            let text = content.text(info.begin_offset(), info.length());
            let candidate = text.trim_start();
            if candidate.starts_with(self.prefix.as_str()) && seen.insert(candidate.to_string()) {
                self.matches.push(candidate.to_string());
            }
        }
        debug!(
            target: "actions.mode",
            mode = INSERT_EXPAND,
            prefix = %self.prefix,
            candidates = self.matches.len() - 1,
            "line_completion_rebuilt"
        );
    }
}

#[derive(Debug, Default)]
pub struct InsertExpandMode {
    completion: Completion,
}

impl InsertExpandMode {
    pub fn new() -> Self {
        Self::default()
    }

    fn complete_line(&mut self, editor: &mut EditorContext, step: isize) {
        let at = editor.position().offset();
        let info = editor.content().line_information_of_offset(at);
        let line = editor.content().text(info.begin_offset(), info.length());
        let c = &mut self.completion;
        if c.stale(info.number(), &line) {
            c.rebuild(editor.content(), info.number(), &line, at - info.begin_offset());
        }
        if c.matches.len() <= 1 {
            editor.ui().set_error_message("Pattern not found");
            return;
        }
        let len = c.matches.len() as isize;
        c.index = (c.index as isize + step).rem_euclid(len) as usize;
        let chosen = &c.matches[c.index];
        let replacement = format!("{}{}{}", c.indent, chosen, c.suffix);
        let cursor = info.begin_offset() + c.indent.chars().count() + chosen.chars().count();
        editor
            .content_mut()
            .replace(info.begin_offset(), info.length(), &replacement);
        editor.set_position(Position::new(cursor), StickyColumnPolicy::OnChange);
        let message = if c.index == 0 {
            "Back at original".to_string()
        } else {
            format!("match {} of {}", c.index, c.matches.len() - 1)
        };
        editor.ui().set_info_message(&message);
    }
}

impl EditorMode for InsertExpandMode {
    fn name(&self) -> &'static str {
        INSERT_EXPAND
    }

    fn display_name(&self) -> &'static str {
        "^X mode (^L^N^P)"
    }

    fn enter_mode(&mut self, _editor: &mut EditorContext, _args: &[ModeArg]) -> CommandResult<()> {
        Ok(())
    }

    fn leave_mode(&mut self, _editor: &mut EditorContext) {}

    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool {
        trace!(target: "actions.mode", mode = INSERT_EXPAND, ?key, "key");
        if key.mods == KeyModifiers::CTRL {
            match key.code {
                KeyCode::Char('l') | KeyCode::Char('n') => {
                    self.complete_line(editor, 1);
                    return true;
                }
                KeyCode::Char('p') => {
                    self.complete_line(editor, -1);
                    return true;
                }
                _ => {}
            }
        }
        self.completion.clear();
        editor.change_mode(INSERT, vec![ModeArg::Resume]);
        editor.replay_key(key);
        true
    }

    fn resolve_key_map(&self) -> Option<&'static str> {
        None
    }
}
