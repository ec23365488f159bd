//! Interpreter-side state and the host service contracts it talks through.
//!
//! Hosts own the cursor, the selection and the user interface; the interpreter
//! only sees them as [`CursorService`], [`SelectionService`] and
//! [`UserInterfaceService`]. Registers live behind [`RegisterManager`] so a
//! scope can swap in an isolated manager without touching the shared one.

use core_text::{Position, TextContent, TextRange};

pub mod registers;

pub use registers::{
    DefaultRegisterManager, LastFindChar, LastSearch, RegisterContent, RegisterManager,
};

/// Remembered column for vertical motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyColumn {
    Column(usize),
    EndOfLine,
}

pub trait CursorService {
    fn position(&self) -> Position;
    fn set_position(&mut self, pos: Position);
    fn sticky_column(&self) -> Option<StickyColumn>;
    fn set_sticky_column(&mut self, column: Option<StickyColumn>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Characterwise,
    Linewise,
}

/// Visual selection. The anchor is where the selection started and stays put;
/// the head follows the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
    pub kind: SelectionKind,
}

impl Selection {
    pub fn new(anchor: Position, head: Position, kind: SelectionKind) -> Self {
        Self { anchor, head, kind }
    }

    /// Range an operator acts on. Characterwise selections include both
    /// endpoint characters; linewise selections cover whole lines.
    pub fn range(&self, content: &dyn TextContent) -> TextRange {
        match self.kind {
            SelectionKind::Characterwise => TextRange::inclusive(content, self.anchor, self.head),
            SelectionKind::Linewise => TextRange::lines(content, self.anchor, self.head),
        }
    }
}

pub trait SelectionService {
    fn selection(&self) -> Option<Selection>;
    fn set_selection(&mut self, selection: Option<Selection>);
}

/// What the host shows the user: mode indicator, messages and the command line.
pub trait UserInterfaceService {
    fn set_editor_mode(&mut self, display_name: &str);
    fn set_info_message(&mut self, message: &str);
    fn set_error_message(&mut self, message: &str);
    fn clear_messages(&mut self);
    /// `None` hides the command line.
    fn set_command_line(&mut self, line: Option<&str>);
}
