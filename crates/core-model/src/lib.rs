//! In-memory reference host for the interpreter.
//!
//! Provides cursor, selection and user-interface services with no terminal or
//! window behind them. The headless driver and the test suites run the
//! interpreter against these.
//!
//! [`HeadlessUi`] writes into an [`UiState`] shared through `Rc<RefCell<_>>`, so
//! the caller can keep a [`UiHandle`] and inspect what the interpreter showed
//! after handing the service itself away.

use core_state::{
    CursorService, Selection, SelectionService, StickyColumn, UserInterfaceService,
};
use core_text::Position;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default, Clone)]
pub struct HeadlessCursor {
    position: Position,
    sticky: Option<StickyColumn>,
}

impl HeadlessCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(position: Position) -> Self {
        Self {
            position,
            sticky: None,
        }
    }
}

impl CursorService for HeadlessCursor {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, pos: Position) {
        self.position = pos;
    }

    fn sticky_column(&self) -> Option<StickyColumn> {
        self.sticky
    }

    fn set_sticky_column(&mut self, column: Option<StickyColumn>) {
        self.sticky = column;
    }
}

#[derive(Debug, Default, Clone)]
pub struct HeadlessSelection {
    active: Option<Selection>,
}

impl HeadlessSelection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionService for HeadlessSelection {
    fn selection(&self) -> Option<Selection> {
        self.active
    }

    fn set_selection(&mut self, selection: Option<Selection>) {
        self.active = selection;
    }
}

/// Everything the interpreter has shown the user so far.
#[derive(Debug, Default, Clone)]
pub struct UiState {
    pub mode: String,
    /// Number of times a mode display name was published (republishing counts).
    pub mode_updates: usize,
    pub info: Option<String>,
    pub error: Option<String>,
    pub command_line: Option<String>,
}

impl UiState {
    /// Most recent message, errors taking precedence.
    pub fn last_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.info.as_deref())
    }
}

pub type UiHandle = Rc<RefCell<UiState>>;

#[derive(Debug, Default, Clone)]
pub struct HeadlessUi {
    state: UiHandle,
}

impl HeadlessUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the recorded state.
    pub fn handle(&self) -> UiHandle {
        Rc::clone(&self.state)
    }
}

impl UserInterfaceService for HeadlessUi {
    fn set_editor_mode(&mut self, display_name: &str) {
        let mut st = self.state.borrow_mut();
        st.mode = display_name.to_string();
        st.mode_updates += 1;
    }

    fn set_info_message(&mut self, message: &str) {
        let mut st = self.state.borrow_mut();
        st.info = Some(message.to_string());
        st.error = None;
    }

    fn set_error_message(&mut self, message: &str) {
        self.state.borrow_mut().error = Some(message.to_string());
    }

    fn clear_messages(&mut self) {
        let mut st = self.state.borrow_mut();
        st.info = None;
        st.error = None;
    }

    fn set_command_line(&mut self, line: Option<&str>) {
        self.state.borrow_mut().command_line = line.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_handle_observes_service_writes() {
        let mut ui = HeadlessUi::new();
        let handle = ui.handle();
        ui.set_editor_mode("NORMAL");
        ui.set_editor_mode("NORMAL");
        ui.set_error_message("E486: Pattern not found: x");
        {
            let st = handle.borrow();
            assert_eq!(st.mode, "NORMAL");
            assert_eq!(st.mode_updates, 2);
            assert_eq!(st.last_message(), Some("E486: Pattern not found: x"));
        }
        ui.set_info_message("ok");
        assert_eq!(handle.borrow().last_message(), Some("ok"));
        ui.set_command_line(Some(":w"));
        assert_eq!(handle.borrow().command_line.as_deref(), Some(":w"));
        ui.clear_messages();
        assert_eq!(handle.borrow().last_message(), None);
    }

    #[test]
    fn cursor_tracks_sticky_column() {
        let mut c = HeadlessCursor::at(Position::new(3));
        assert_eq!(c.position().offset(), 3);
        c.set_sticky_column(Some(StickyColumn::EndOfLine));
        assert_eq!(c.sticky_column(), Some(StickyColumn::EndOfLine));
    }
}
