//! Mode coordinator: the host-facing entry point of the interpreter.
//!
//! Owns the mode registry, the active mode, the key-stroke translator and the
//! [`EditorContext`]. Every raw key goes through [`Coordinator::handle_key`]:
//! the active mode names the key map to translate through, the translator
//! buffers or expands, and the resulting keys are delivered to whatever mode
//! is active at the time each one is handed over.
//!
//! Recursive expansions re-enter `handle_key` one level deeper. The depth is
//! bounded by `maxmapdepth`; crossing it aborts the whole expansion with
//! `E223` instead of overflowing the stack.

use crate::editor::{EditorContext, ModeArg};
use crate::error::CommandError;
use crate::modes::{
    CommandLineMode, EditorMode, InsertExpandMode, InsertMode, LinewiseVisualMode, NORMAL,
    NormalMode, ReplaceMode, SearchMode, VisualMode,
};
use core_events::KeyStroke;
use core_keymap::{KeyMap, KeyStrokeTranslator, Translation};
use std::collections::HashMap;
use tracing::{debug, error, trace, warn};

pub const DEFAULT_MAX_MAP_DEPTH: usize = 100;

pub struct Coordinator {
    editor: EditorContext,
    modes: HashMap<&'static str, Box<dyn EditorMode>>,
    current: Option<&'static str>,
    translator: KeyStrokeTranslator,
    max_map_depth: usize,
    /// Set when the depth bound was hit; unwinds every pending expansion.
    aborted: bool,
}

impl Coordinator {
    /// A coordinator with no modes registered and none active.
    pub fn new(editor: EditorContext) -> Self {
        Self {
            editor,
            modes: HashMap::new(),
            current: None,
            translator: KeyStrokeTranslator::new(),
            max_map_depth: DEFAULT_MAX_MAP_DEPTH,
            aborted: false,
        }
    }

    /// A coordinator carrying every built-in mode, starting in Normal mode.
    pub fn with_default_modes(editor: EditorContext) -> Self {
        let mut coordinator = Self::new(editor);
        let modes: Vec<Box<dyn EditorMode>> = vec![
            Box::new(NormalMode::new()),
            Box::new(VisualMode::new()),
            Box::new(LinewiseVisualMode::new()),
            Box::new(InsertMode::new()),
            Box::new(ReplaceMode::new()),
            Box::new(CommandLineMode::new()),
            Box::new(SearchMode::new()),
            Box::new(InsertExpandMode::new()),
        ];
        for mode in modes {
            coordinator.register_mode(mode);
        }
        coordinator.change_mode(NORMAL, Vec::new());
        coordinator
    }

    /// Add a mode, replacing any registered under the same name.
    pub fn register_mode(&mut self, mode: Box<dyn EditorMode>) {
        let name = mode.name();
        debug!(target: "actions.mode", mode = name, "register_mode");
        if self.modes.insert(name, mode).is_some() {
            warn!(target: "actions.mode", mode = name, "mode_replaced");
        }
    }

    pub fn set_max_map_depth(&mut self, depth: usize) {
        self.max_map_depth = depth.max(1);
    }

    pub fn max_map_depth(&self) -> usize {
        self.max_map_depth
    }

    pub fn current_mode_name(&self) -> Option<&'static str> {
        self.current
    }

    pub fn current_mode_display_name(&self) -> Option<&'static str> {
        self.current
            .and_then(|name| self.modes.get(name))
            .map(|mode| mode.display_name())
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorContext {
        &mut self.editor
    }

    pub fn use_global_registers(&mut self) {
        self.editor.use_global_registers();
    }

    pub fn use_local_registers(&mut self) {
        self.editor.use_local_registers();
    }

    /// Keys are buffered waiting for a longer mapping (or a timeout).
    pub fn is_pending(&self) -> bool {
        self.translator.is_pending()
    }

    /// Switch to the mode called `name`. Switching to the active mode only
    /// republishes its display name.
    pub fn change_mode(&mut self, name: &str, args: Vec<ModeArg>) {
        let Some(target) = self.modes.get_key_value(name).map(|(&k, _)| k) else {
            error!(target: "actions.mode", mode = name, "unknown_mode");
            return;
        };
        if self.current != Some(target) {
            if let Some(previous) = self.current
                && let Some(mode) = self.modes.get_mut(previous)
            {
                mode.leave_mode(&mut self.editor);
            }
            debug!(target: "actions.mode", from = ?self.current, to = target, ?args, "mode_change");
            self.current = Some(target);
            if let Some(mode) = self.modes.get_mut(target)
                && let Err(err) = mode.enter_mode(&mut self.editor, &args)
            {
                error!(target: "actions.mode", mode = target, %err, "enter_mode_failed");
                self.editor.ui().set_error_message(&err.to_string());
            }
        }
        if let Some(mode) = self.modes.get(target) {
            let display = mode.display_name();
            self.editor.ui().set_editor_mode(display);
        }
    }

    /// Feed one raw key. Returns whether it was handled (buffered keys count).
    pub fn handle_key(&mut self, key: KeyStroke) -> bool {
        self.aborted = false;
        self.handle_key_at(key, 0)
    }

    /// Ambiguity timeout: resolve buffered keys as if no further key will come.
    /// Returns false when nothing was buffered.
    pub fn handle_timeout(&mut self) -> bool {
        let Some(name) = self.translator.pending_map().map(str::to_string) else {
            return false;
        };
        trace!(target: "input.translate", map = %name, "timeout");
        self.aborted = false;
        let fallback;
        let map = match self.editor.key_maps().key_map(&name) {
            Some(map) => map,
            None => {
                fallback = KeyMap::new(name);
                &fallback
            }
        };
        self.translator.flush(map);
        self.drain_output(0);
        true
    }

    fn handle_key_at(&mut self, key: KeyStroke, depth: usize) -> bool {
        if depth > self.max_map_depth {
            error!(target: "input.translate", depth, max = self.max_map_depth, "recursive_mapping");
            self.abort_expansion();
            return true;
        }
        let Some(current) = self.current else {
            return false;
        };
        let map_name = self.modes.get(current).and_then(|m| m.resolve_key_map());
        let Some(map_name) = map_name else {
            if self.translator.is_pending() {
                // Keys buffered for another map reach this mode unmapped.
                self.translator.flush(&KeyMap::new(""));
                self.drain_output(depth);
            }
            return self.deliver(key);
        };
        let fallback;
        let map = match self.editor.key_maps().key_map(map_name) {
            Some(map) => map,
            None => {
                fallback = KeyMap::new(map_name);
                &fallback
            }
        };
        match self.translator.process_key_stroke(map, key) {
            Translation::Unmapped => self.deliver(key),
            Translation::Pending | Translation::Resolved => {
                self.drain_output(depth);
                true
            }
        }
    }

    fn drain_output(&mut self, depth: usize) {
        for stroke in self.translator.take_output() {
            if self.aborted {
                break;
            }
            if stroke.recursive {
                self.handle_key_at(stroke.key, depth + 1);
            } else if self.translator.is_pending() {
                self.queue_behind_pending(stroke.key, depth);
            } else {
                self.deliver(stroke.key);
            }
        }
    }

    /// A literal key produced while an earlier re-entered key is still
    /// buffered goes behind it, never past it.
    fn queue_behind_pending(&mut self, key: KeyStroke, depth: usize) {
        let name = self.translator.pending_map().unwrap_or_default().to_string();
        let fallback;
        let map = match self.editor.key_maps().key_map(&name) {
            Some(map) => map,
            None => {
                fallback = KeyMap::new(name);
                &fallback
            }
        };
        match self.translator.process_literal(map, key) {
            Translation::Unmapped => {
                self.deliver(key);
            }
            Translation::Pending | Translation::Resolved => self.drain_output(depth),
        }
    }

    fn abort_expansion(&mut self) {
        self.aborted = true;
        self.translator.reset();
        let message = CommandError::RecursiveMapping.to_string();
        self.editor.ui().set_error_message(&message);
    }

    /// Hand a key to the active mode, then apply whatever it queued.
    fn deliver(&mut self, key: KeyStroke) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let handled = match self.modes.get_mut(current) {
            Some(mode) => mode.handle_key(&mut self.editor, key),
            None => false,
        };
        trace!(target: "actions.mode", mode = current, ?key, handled, "deliver");
        self.apply_requests();
        handled
    }

    fn apply_requests(&mut self) {
        loop {
            while let Some(request) = self.editor.next_mode_request() {
                self.change_mode(&request.name, request.args);
            }
            match self.editor.next_replayed_key() {
                Some(key) => {
                    self.deliver(key);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::{INSERT, VISUAL};
    use crate::test_support::editor_with_ui;
    use core_events::parse_key_sequence;
    use core_keymap::{NORMAL_MAP, Remapping};

    fn feed(c: &mut Coordinator, keys: &str) {
        for key in parse_key_sequence(keys).unwrap() {
            c.handle_key(key);
        }
    }

    #[test]
    fn starts_in_normal_and_publishes_display_name() {
        let (e, ui) = editor_with_ui("abc", 0);
        let c = Coordinator::with_default_modes(e);
        assert_eq!(c.current_mode_name(), Some(NORMAL));
        assert_eq!(ui.borrow().mode, "NORMAL");
    }

    #[test]
    fn change_mode_to_current_republishes_only() {
        let (e, ui) = editor_with_ui("abc", 0);
        let mut c = Coordinator::with_default_modes(e);
        let before = ui.borrow().mode_updates;
        c.change_mode(NORMAL, Vec::new());
        assert_eq!(ui.borrow().mode_updates, before + 1);
        assert_eq!(c.current_mode_name(), Some(NORMAL));
    }

    #[test]
    fn unknown_mode_is_ignored() {
        let (e, ui) = editor_with_ui("abc", 0);
        let mut c = Coordinator::with_default_modes(e);
        let before = ui.borrow().mode_updates;
        c.change_mode("nonexistent", Vec::new());
        assert_eq!(c.current_mode_name(), Some(NORMAL));
        assert_eq!(ui.borrow().mode_updates, before);
    }

    #[test]
    fn no_active_mode_leaves_keys_unhandled() {
        let (e, _ui) = editor_with_ui("abc", 0);
        let mut c = Coordinator::new(e);
        assert!(!c.handle_key(KeyStroke::char('x')));
    }

    #[test]
    fn mode_requests_are_applied_after_the_key() {
        let (e, ui) = editor_with_ui("abc", 0);
        let mut c = Coordinator::with_default_modes(e);
        feed(&mut c, "v");
        assert_eq!(c.current_mode_name(), Some(VISUAL));
        assert_eq!(ui.borrow().mode, "VISUAL");
        feed(&mut c, "<Esc>i");
        assert_eq!(c.current_mode_name(), Some(INSERT));
    }

    #[test]
    fn self_recursive_mapping_is_cut_off() {
        let (e, ui) = editor_with_ui("abc", 0);
        let mut c = Coordinator::with_default_modes(e);
        c.set_max_map_depth(10);
        c.editor_mut()
            .key_maps_mut()
            .key_map_mut(NORMAL_MAP)
            .add_mapping(vec![KeyStroke::char('x')], Remapping::new(vec![KeyStroke::char('x')], true));
        assert!(c.handle_key(KeyStroke::char('x')));
        assert_eq!(ui.borrow().error.as_deref(), Some("E223: recursive mapping"));
        assert!(!c.is_pending());
        assert_eq!(c.editor().content().text(0, 3), "abc");
    }

    #[test]
    fn timeout_resolves_pending_prefix() {
        let (e, _ui) = editor_with_ui("abc", 0);
        let mut c = Coordinator::with_default_modes(e);
        let map = c.editor_mut().key_maps_mut().key_map_mut(NORMAL_MAP);
        map.add_mapping(parse_key_sequence("Q").unwrap(), Remapping::new(parse_key_sequence("x").unwrap(), false));
        map.add_mapping(parse_key_sequence("QQ").unwrap(), Remapping::new(parse_key_sequence("dd").unwrap(), false));
        feed(&mut c, "Q");
        assert!(c.is_pending());
        assert!(c.handle_timeout());
        assert_eq!(c.editor().content().text(0, 3), "bc");
        assert!(!c.handle_timeout());
    }
}
