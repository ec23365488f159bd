//! The editor context every mode, motion and operator works against.
//!
//! `EditorContext` bundles the host services with the interpreter-owned state
//! that outlives a single key: the register scope and the queues a mode uses
//! to ask the coordinator for follow-up work (mode changes, replayed keys).
//! Modes never reach the coordinator directly.

use core_events::KeyStroke;
use core_keymap::{DefaultKeyMapProvider, KeyMapProvider};
use core_state::{
    CursorService, DefaultRegisterManager, RegisterManager, Selection, SelectionService,
    StickyColumn, UserInterfaceService,
};
use core_text::{Position, StickyColumnPolicy, TextContent};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::debug;

/// Shared, swappable register manager.
pub type SharedRegisters = Rc<RefCell<dyn RegisterManager>>;

/// Arguments passed to `EditorMode::enter_mode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeArg {
    /// Re-enter without resetting per-entry state (Insert after completion).
    Resume,
    /// Search toward the start of the document (`?`).
    SearchBackward,
    /// Start the selection at this anchor (switching between visual flavors).
    Anchor(Position),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeRequest {
    pub name: String,
    pub args: Vec<ModeArg>,
}

pub struct EditorContext {
    content: Box<dyn TextContent>,
    cursor: Box<dyn CursorService>,
    selection: Box<dyn SelectionService>,
    ui: Box<dyn UserInterfaceService>,
    key_maps: Box<dyn KeyMapProvider>,
    global_registers: SharedRegisters,
    registers: SharedRegisters,
    mode_requests: VecDeque<ModeRequest>,
    replayed_keys: VecDeque<KeyStroke>,
}

impl EditorContext {
    pub fn new(
        content: Box<dyn TextContent>,
        cursor: Box<dyn CursorService>,
        selection: Box<dyn SelectionService>,
        ui: Box<dyn UserInterfaceService>,
    ) -> Self {
        let registers: SharedRegisters = Rc::new(RefCell::new(DefaultRegisterManager::new()));
        Self {
            content,
            cursor,
            selection,
            ui,
            key_maps: Box::new(DefaultKeyMapProvider::new()),
            global_registers: Rc::clone(&registers),
            registers,
            mode_requests: VecDeque::new(),
            replayed_keys: VecDeque::new(),
        }
    }

    /// Replace the key-map provider.
    pub fn with_key_maps(mut self, key_maps: Box<dyn KeyMapProvider>) -> Self {
        self.key_maps = key_maps;
        self
    }

    /// Share a register manager owned by the host (for example across buffers).
    pub fn with_global_registers(mut self, registers: SharedRegisters) -> Self {
        self.global_registers = Rc::clone(&registers);
        self.registers = registers;
        self
    }

    pub fn content(&self) -> &dyn TextContent {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn TextContent {
        self.content.as_mut()
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Move the cursor (clamped to the text) and update the sticky column as
    /// `policy` says.
    pub fn set_position(&mut self, pos: Position, policy: StickyColumnPolicy) {
        let pos = Position::new(pos.offset().min(self.content.text_length()));
        self.cursor.set_position(pos);
        match policy {
            StickyColumnPolicy::Never => {}
            StickyColumnPolicy::OnChange => {
                let line = self.content.line_information_of_offset(pos.offset());
                self.cursor
                    .set_sticky_column(Some(StickyColumn::Column(pos.offset() - line.begin_offset())));
            }
            StickyColumnPolicy::ToEndOfLine => {
                self.cursor.set_sticky_column(Some(StickyColumn::EndOfLine));
            }
        }
    }

    pub fn cursor(&self) -> &dyn CursorService {
        self.cursor.as_ref()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.selection()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection.set_selection(selection);
    }

    pub fn ui(&mut self) -> &mut dyn UserInterfaceService {
        self.ui.as_mut()
    }

    pub fn key_maps(&self) -> &dyn KeyMapProvider {
        self.key_maps.as_ref()
    }

    pub fn key_maps_mut(&mut self) -> &mut dyn KeyMapProvider {
        self.key_maps.as_mut()
    }

    pub fn registers(&self) -> Ref<'_, dyn RegisterManager> {
        self.registers.borrow()
    }

    pub fn registers_mut(&self) -> RefMut<'_, dyn RegisterManager> {
        self.registers.borrow_mut()
    }

    /// Install a fresh, isolated register manager. The shared one is untouched.
    pub fn use_local_registers(&mut self) {
        debug!(target: "actions.registers", "use_local_registers");
        self.registers = Rc::new(RefCell::new(DefaultRegisterManager::new()));
    }

    /// Swap the shared register manager back in.
    pub fn use_global_registers(&mut self) {
        debug!(target: "actions.registers", "use_global_registers");
        self.registers = Rc::clone(&self.global_registers);
    }

    pub fn is_using_global_registers(&self) -> bool {
        Rc::ptr_eq(&self.registers, &self.global_registers)
    }

    /// Ask the coordinator to switch modes once the current key is handled.
    pub fn change_mode(&mut self, name: &str, args: Vec<ModeArg>) {
        self.mode_requests.push_back(ModeRequest {
            name: name.to_string(),
            args,
        });
    }

    pub(crate) fn next_mode_request(&mut self) -> Option<ModeRequest> {
        self.mode_requests.pop_front()
    }

    /// Hand a key back to the coordinator for delivery to whatever mode is
    /// active after pending mode changes are applied. Replayed keys are not
    /// remapped again.
    pub fn replay_key(&mut self, key: KeyStroke) {
        self.replayed_keys.push_back(key);
    }

    pub(crate) fn next_replayed_key(&mut self) -> Option<KeyStroke> {
        self.replayed_keys.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{HeadlessCursor, HeadlessSelection, HeadlessUi};
    use core_state::{LastFindChar, RegisterContent};
    use core_text::Buffer;

    fn editor(text: &str) -> EditorContext {
        EditorContext::new(
            Box::new(Buffer::from_str("t", text).unwrap()),
            Box::new(HeadlessCursor::new()),
            Box::new(HeadlessSelection::new()),
            Box::new(HeadlessUi::new()),
        )
    }

    #[test]
    fn set_position_updates_sticky_column_by_policy() {
        let mut e = editor("abc\ndefgh");
        e.set_position(Position::new(6), StickyColumnPolicy::OnChange);
        assert_eq!(e.cursor().sticky_column(), Some(StickyColumn::Column(2)));
        e.set_position(Position::new(1), StickyColumnPolicy::Never);
        assert_eq!(e.cursor().sticky_column(), Some(StickyColumn::Column(2)));
        e.set_position(Position::new(2), StickyColumnPolicy::ToEndOfLine);
        assert_eq!(e.cursor().sticky_column(), Some(StickyColumn::EndOfLine));
        e.set_position(Position::new(99), StickyColumnPolicy::Never);
        assert_eq!(e.position().offset(), 9);
    }

    #[test]
    fn local_registers_are_isolated_and_global_is_restored() {
        let mut e = editor("");
        e.registers_mut().write_yank(Some('a'), RegisterContent::text("shared"));
        e.use_local_registers();
        assert!(!e.is_using_global_registers());
        assert!(e.registers().register(Some('a')).is_none());
        e.registers_mut().set_last_find_char(LastFindChar {
            target: 'x',
            backward: false,
            up_to: false,
        });
        e.use_global_registers();
        assert!(e.is_using_global_registers());
        assert_eq!(e.registers().register(Some('a')).unwrap().text, "shared");
        assert!(e.registers().last_find_char().is_none());
    }

    #[test]
    fn mode_requests_queue_in_order() {
        let mut e = editor("");
        e.change_mode("insert", vec![]);
        e.change_mode("normal", vec![ModeArg::Resume]);
        assert_eq!(e.next_mode_request().unwrap().name, "insert");
        assert_eq!(e.next_mode_request().unwrap().args, vec![ModeArg::Resume]);
        assert!(e.next_mode_request().is_none());
    }
}
