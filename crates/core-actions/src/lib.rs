//! Modal command interpreter: motions, text objects, operators, modes and the
//! coordinator that routes keys between them.
//!
//! Layering (leaves first):
//! - `motion`: pure `(editor, count, position) -> position` rules with a border
//!   policy. Find-char motions additionally record themselves in the register
//!   manager's last-find slot so `;` and `,` can rebuild them.
//! - `text_object`: ranges derived from motions (or the selection); the border
//!   policy decides how the end points become a `TextRange`.
//! - `operator`: delete / yank / change applied to a range, plus put.
//! - `modes`: one `EditorMode` per editing state. Modes talk back only through
//!   `EditorContext` (mode requests, replayed keys, UI messages).
//! - `coordinator`: mode registry, active mode and recursive key remapping.
//!
//! Errors from a single command are `CommandError` values; the mode that ran
//! the command reports them through the UI service and nothing propagates to
//! the host.

pub mod bootstrap;
pub mod coordinator;
pub mod editor;
pub mod error;
pub mod modes;
pub mod motion;
pub mod operator;
pub mod text_object;

pub use bootstrap::{build_coordinator, install_mappings};
pub use coordinator::{Coordinator, DEFAULT_MAX_MAP_DEPTH};
pub use editor::{EditorContext, ModeArg, ModeRequest, SharedRegisters};
pub use error::{CommandError, CommandResult};
pub use modes::EditorMode;
pub use motion::Motion;
pub use operator::{Operator, PastePlacement};
pub use text_object::TextObject;
