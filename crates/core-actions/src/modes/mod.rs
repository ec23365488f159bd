//! Editing modes.
//!
//! Each mode is an independent [`EditorMode`]: it picks its own key map,
//! interprets the keys that reach it and asks for mode switches through
//! [`EditorContext::change_mode`]. The coordinator owns the modes and only
//! talks to them through this trait, so new modes attach without touching it.
//!
//! Command errors raised while a mode handles a key are reported to the user
//! by the mode itself and never escape to the coordinator.

use crate::editor::{EditorContext, ModeArg};
use crate::error::{CommandError, CommandResult};
use core_events::KeyStroke;
use tracing::debug;

pub mod command_line;
pub mod commands;
pub mod insert;
pub mod insert_expand;
mod line_buffer;
mod motion_keys;
pub mod normal;
pub mod visual;

pub use command_line::{CommandLineMode, SearchMode};
pub use insert::{InsertMode, ReplaceMode};
pub use insert_expand::InsertExpandMode;
pub use line_buffer::LineBuffer;
pub use normal::NormalMode;
pub use visual::{LinewiseVisualMode, VisualMode};

pub const NORMAL: &str = "normal";
pub const VISUAL: &str = "visual";
pub const LINEWISE_VISUAL: &str = "linewise visual";
pub const INSERT: &str = "insert";
pub const REPLACE: &str = "replace";
pub const COMMAND: &str = "command";
pub const SEARCH: &str = "search";
pub const INSERT_EXPAND: &str = "insert expand";

pub trait EditorMode {
    /// Stable name used by `change_mode` and configuration.
    fn name(&self) -> &'static str;

    /// Name shown in the host's mode indicator.
    fn display_name(&self) -> &'static str;

    fn enter_mode(&mut self, editor: &mut EditorContext, args: &[ModeArg]) -> CommandResult<()>;

    fn leave_mode(&mut self, editor: &mut EditorContext);

    /// Returns whether the key was handled.
    fn handle_key(&mut self, editor: &mut EditorContext, key: KeyStroke) -> bool;

    /// Key map to translate keys through before they reach this mode, or
    /// `None` to receive keys untranslated.
    fn resolve_key_map(&self) -> Option<&'static str>;
}

/// Report a failed command to the user. The key still counts as handled.
pub(crate) fn report(editor: &mut EditorContext, mode: &'static str, err: &CommandError) {
    debug!(target: "actions.mode", mode, %err, "command_failed");
    editor.ui().set_error_message(&err.to_string());
}

/// Append a count digit, clamped so hostile input cannot overflow.
pub(crate) fn push_count_digit(count: Option<usize>, digit: u32) -> usize {
    count
        .unwrap_or(0)
        .saturating_mul(10)
        .saturating_add(digit as usize)
        .min(999_999)
}
