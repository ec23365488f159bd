//! Motions: rules mapping `(editor, count, position)` to a destination.
//!
//! A motion never moves the cursor itself. Modes move the cursor to the
//! destination; operators turn `(position, destination)` into a range using
//! the motion's [`BorderPolicy`].

use crate::editor::EditorContext;
use crate::error::CommandResult;
use core_text::{BorderPolicy, Position, StickyColumnPolicy};

mod basic;
mod find_char;
mod search;
mod subword;
mod word;

pub use basic::{BasicMotion, first_non_blank, last_line, normalize_normal_position};
pub use find_char::{FindCharMotion, RecordingMotion};
pub use search::SearchMotion;
pub use subword::{SubwordLimit, SubwordMotion, SubwordTextObject};
pub use word::{CharClass, WordKind, WordMotion, char_class, is_word_char};

pub trait Motion {
    /// Destination reached from `from`. `count` is `None` when the user typed
    /// no count; most motions treat that as 1.
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position>;

    fn border_policy(&self) -> BorderPolicy;

    fn sticky_column_policy(&self) -> StickyColumnPolicy {
        StickyColumnPolicy::OnChange
    }

    fn name(&self) -> &'static str;

    /// Bind a count. The bound count wins over whatever the caller passes.
    fn with_count(self, count: usize) -> CountedMotion<Self>
    where
        Self: Sized,
    {
        CountedMotion::new(self, count)
    }
}

impl<M: Motion + ?Sized> Motion for &M {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        (**self).destination(editor, count, from)
    }
    fn border_policy(&self) -> BorderPolicy {
        (**self).border_policy()
    }
    fn sticky_column_policy(&self) -> StickyColumnPolicy {
        (**self).sticky_column_policy()
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<M: Motion + ?Sized> Motion for Box<M> {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        (**self).destination(editor, count, from)
    }
    fn border_policy(&self) -> BorderPolicy {
        (**self).border_policy()
    }
    fn sticky_column_policy(&self) -> StickyColumnPolicy {
        (**self).sticky_column_policy()
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// A motion with a bound count.
#[derive(Debug, Clone)]
pub struct CountedMotion<M> {
    inner: M,
    count: usize,
}

impl<M: Motion> CountedMotion<M> {
    pub fn new(inner: M, count: usize) -> Self {
        Self { inner, count }
    }
}

impl<M: Motion> Motion for CountedMotion<M> {
    fn destination(
        &self,
        editor: &EditorContext,
        _count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        self.inner.destination(editor, Some(self.count), from)
    }
    fn border_policy(&self) -> BorderPolicy {
        self.inner.border_policy()
    }
    fn sticky_column_policy(&self) -> StickyColumnPolicy {
        self.inner.sticky_column_policy()
    }
    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Count to use when the user typed none.
pub(crate) fn count_or_one(count: Option<usize>) -> usize {
    count.unwrap_or(1).max(1)
}
