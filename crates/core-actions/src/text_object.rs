//! Text objects: rules producing a range (not a point) from the cursor and a
//! count.
//!
//! * `MotionTextObject` wraps one motion; the range shape follows the motion's
//!   border policy.
//! * `MotionPairTextObject` takes its left bound from one motion and its right
//!   bound from another (`iw`, `aw`).
//! * `SelectionTextObject` is the active visual selection, used by operators
//!   typed in Visual mode.

use crate::editor::EditorContext;
use crate::error::CommandResult;
use crate::motion::{Motion, WordKind, WordMotion};
use core_state::SelectionKind;
use core_text::{BorderPolicy, ContentType, Position, TextRange};
use tracing::trace;

pub trait TextObject {
    fn region(&self, editor: &EditorContext, count: Option<usize>) -> CommandResult<TextRange>;

    fn content_type(&self) -> ContentType;

    fn name(&self) -> &'static str;
}

impl<T: TextObject + ?Sized> TextObject for &T {
    fn region(&self, editor: &EditorContext, count: Option<usize>) -> CommandResult<TextRange> {
        (**self).region(editor, count)
    }
    fn content_type(&self) -> ContentType {
        (**self).content_type()
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: TextObject + ?Sized> TextObject for Box<T> {
    fn region(&self, editor: &EditorContext, count: Option<usize>) -> CommandResult<TextRange> {
        (**self).region(editor, count)
    }
    fn content_type(&self) -> ContentType {
        (**self).content_type()
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[derive(Debug, Clone)]
pub struct MotionTextObject<M> {
    motion: M,
}

impl<M: Motion> MotionTextObject<M> {
    pub fn new(motion: M) -> Self {
        Self { motion }
    }
}

impl<M: Motion> TextObject for MotionTextObject<M> {
    fn region(&self, editor: &EditorContext, count: Option<usize>) -> CommandResult<TextRange> {
        let content = editor.content();
        let from = editor.position();
        let to = match count {
            Some(n) => (&self.motion).with_count(n).destination(editor, None, from)?,
            None => self.motion.destination(editor, None, from)?,
        };
        let range = match self.motion.border_policy() {
            BorderPolicy::Exclusive => TextRange::exclusive(from, to),
            BorderPolicy::Inclusive => {
                // An inclusive destination sitting on a line terminator (empty
                // line, `$` there) must not pull the terminator in.
                let on_terminator = matches!(content.char_at(to.offset()), Some('\n' | '\r'));
                if on_terminator && to >= from {
                    TextRange::exclusive(from, to)
                } else {
                    TextRange::inclusive(content, from, to)
                }
            }
            BorderPolicy::LineWise => TextRange::lines(content, from, to),
        };
        trace!(target: "actions.motion", motion = self.motion.name(), from = from.offset(), to = to.offset(), left = range.left_bound().offset(), right = range.right_bound().offset(), "region");
        Ok(range)
    }

    fn content_type(&self) -> ContentType {
        ContentType::from_border_policy(self.motion.border_policy())
    }

    fn name(&self) -> &'static str {
        self.motion.name()
    }
}

#[derive(Debug, Clone)]
pub struct MotionPairTextObject<L, R> {
    left: L,
    right: R,
    name: &'static str,
}

impl<L: Motion, R: Motion> MotionPairTextObject<L, R> {
    pub fn new(name: &'static str, left: L, right: R) -> Self {
        Self { left, right, name }
    }
}

impl<L: Motion, R: Motion> TextObject for MotionPairTextObject<L, R> {
    fn region(&self, editor: &EditorContext, count: Option<usize>) -> CommandResult<TextRange> {
        let from = editor.position();
        let left = self.left.destination(editor, None, from)?;
        let mut right = self.right.destination(editor, count, from)?;
        if self.right.border_policy() == BorderPolicy::Inclusive {
            right = right.add_offset(1);
        }
        Ok(TextRange::new(left, right))
    }

    fn content_type(&self) -> ContentType {
        ContentType::Text
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// `iw` / `iW`: the run under the cursor (whitespace runs included), `count`
/// runs long.
pub fn inner_word(big: bool) -> MotionPairTextObject<WordMotion, WordMotion> {
    MotionPairTextObject::new(
        if big { "iW" } else { "iw" },
        WordMotion::new(WordKind::RunStart, big),
        WordMotion::new(WordKind::RunEnd, big),
    )
}

/// `aw` / `aW`: from the start of the run under the cursor up to the next
/// word start.
pub fn outer_word(big: bool) -> MotionPairTextObject<WordMotion, WordMotion> {
    MotionPairTextObject::new(
        if big { "aW" } else { "aw" },
        WordMotion::new(WordKind::RunStart, big),
        WordMotion::new(WordKind::Forward, big),
    )
}

/// The active selection, or an empty range at the cursor without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionTextObject;

impl TextObject for SelectionTextObject {
    fn region(&self, editor: &EditorContext, _count: Option<usize>) -> CommandResult<TextRange> {
        Ok(match editor.selection() {
            Some(sel) => sel.range(editor.content()),
            None => TextRange::new(editor.position(), editor.position()),
        })
    }

    fn content_type(&self) -> ContentType {
        ContentType::Text
    }

    fn name(&self) -> &'static str {
        "selection"
    }
}

impl SelectionTextObject {
    /// Content type of the current selection.
    pub fn content_type_for(editor: &EditorContext) -> ContentType {
        match editor.selection().map(|s| s.kind) {
            Some(SelectionKind::Linewise) => ContentType::Lines,
            _ => ContentType::Text,
        }
    }
}

/// Range of the first `count` characters starting at `from`, staying on the line.
pub(crate) fn chars_on_line(editor: &EditorContext, from: Position, count: usize) -> TextRange {
    let line = editor.content().line_information_of_offset(from.offset());
    let end = from.offset().saturating_add(count).min(line.end_offset());
    TextRange::new(from, Position::new(end.max(from.offset())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{BasicMotion, FindCharMotion};
    use crate::test_support::editor_at;

    fn text(o: &impl TextObject, s: &str, at: usize, count: Option<usize>) -> String {
        let e = editor_at(s, at);
        let r = o.region(&e, count).unwrap();
        e.content().text_in(r)
    }

    #[test]
    fn exclusive_and_inclusive_lengths() {
        let e = editor_at("abcdef", 1);
        let ex = MotionTextObject::new(BasicMotion::Right).region(&e, Some(3)).unwrap();
        assert_eq!(ex.model_length(), 3);
        let inc = MotionTextObject::new(FindCharMotion::new('e', false, false))
            .region(&e, None)
            .unwrap();
        assert_eq!(inc.model_length(), 4 - 1 + 1);
    }

    #[test]
    fn backward_motion_yields_ordered_range() {
        let e = editor_at("abc def", 6);
        let r = MotionTextObject::new(WordMotion::BACKWARD).region(&e, None).unwrap();
        assert_eq!((r.left_bound().offset(), r.right_bound().offset()), (4, 6));
    }

    #[test]
    fn linewise_snaps_to_lines() {
        let o = MotionTextObject::new(BasicMotion::CurrentLines);
        assert_eq!(text(&o, "ab\ncd\nef", 4, Some(2)), "cd\nef");
        assert_eq!(text(&o, "ab\ncd\nef", 1, None), "ab\n");
        assert_eq!(o.content_type(), ContentType::Lines);
    }

    #[test]
    fn inclusive_end_of_line_keeps_terminator() {
        let o = MotionTextObject::new(BasicMotion::LineEnd);
        assert_eq!(text(&o, "ab\n\ncd", 3, None), "");
        assert_eq!(text(&o, "ab\ncd", 0, None), "ab");
    }

    #[test]
    fn word_objects() {
        assert_eq!(text(&inner_word(false), "foo bar.baz", 5, None), "bar");
        assert_eq!(text(&inner_word(false), "foo bar.baz", 5, Some(2)), "bar.");
        assert_eq!(text(&inner_word(true), "foo bar.baz", 5, None), "bar.baz");
        assert_eq!(text(&outer_word(false), "foo bar baz", 1, None), "foo ");
        assert_eq!(text(&outer_word(false), "foo bar baz", 1, Some(2)), "foo bar ");
    }
}
