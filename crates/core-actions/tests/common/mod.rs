#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{Coordinator, EditorContext};
use core_events::parse_key_sequence;
use core_model::{HeadlessCursor, HeadlessSelection, HeadlessUi, UiHandle, UiState};
use core_text::{Buffer, Position, TextContent};

pub fn editor(text: &str, offset: usize) -> (EditorContext, UiHandle) {
    let ui = HeadlessUi::new();
    let handle = ui.handle();
    let editor = EditorContext::new(
        Box::new(Buffer::from_str("t", text).unwrap()),
        Box::new(HeadlessCursor::at(Position::new(offset))),
        Box::new(HeadlessSelection::new()),
        Box::new(ui),
    );
    (editor, handle)
}

/// A coordinator with the built-in modes over an in-memory buffer.
pub struct Session {
    pub coordinator: Coordinator,
    pub ui: UiHandle,
}

impl Session {
    pub fn new(text: &str) -> Self {
        Self::at(text, 0)
    }

    pub fn at(text: &str, offset: usize) -> Self {
        let (editor, ui) = editor(text, offset);
        Self {
            coordinator: Coordinator::with_default_modes(editor),
            ui,
        }
    }

    /// Feed keys written in `<...>` notation.
    pub fn keys(&mut self, keys: &str) -> &mut Self {
        for key in parse_key_sequence(keys).unwrap() {
            self.coordinator.handle_key(key);
        }
        self
    }

    pub fn text(&self) -> String {
        let content = self.coordinator.editor().content();
        content.text(0, content.text_length())
    }

    pub fn cursor(&self) -> usize {
        self.coordinator.editor().position().offset()
    }

    pub fn mode(&self) -> &'static str {
        self.coordinator.current_mode_name().unwrap()
    }

    pub fn ui(&self) -> UiState {
        self.ui.borrow().clone()
    }

    /// Text of the unnamed register, if any.
    pub fn unnamed(&self) -> Option<String> {
        self.coordinator
            .editor()
            .registers()
            .register(None)
            .map(|r| r.text)
    }
}
