//! `f F t T ; ,`: single-character search inside the current line.

use super::{Motion, count_or_one};
use crate::editor::EditorContext;
use crate::error::{CommandError, CommandResult};
use core_state::LastFindChar;
use core_text::{BorderPolicy, Position, StickyColumnPolicy};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindCharMotion {
    target: char,
    backward: bool,
    /// `t` / `T`: stop next to the match instead of on it.
    up_to: bool,
    repetition: bool,
}

impl FindCharMotion {
    pub fn new(target: char, backward: bool, up_to: bool) -> Self {
        Self {
            target,
            backward,
            up_to,
            repetition: false,
        }
    }

    /// Motion rebuilt from the last-find slot (`;`).
    pub fn from_last(editor: &EditorContext) -> CommandResult<Self> {
        let last = editor
            .registers()
            .last_find_char()
            .ok_or(CommandError::NoPreviousFind)?;
        Ok(Self::new(last.target, last.backward, last.up_to).repetition())
    }

    /// Same search in the other direction. Keeps the repetition flag, so `,`
    /// after `t` advances too.
    pub fn reverse(self) -> Self {
        Self {
            backward: !self.backward,
            ..self
        }
    }

    /// Marks the motion as a repeat of an earlier search.
    pub fn repetition(self) -> Self {
        Self {
            repetition: true,
            ..self
        }
    }

    pub fn target(&self) -> char {
        self.target
    }

    pub fn is_backward(&self) -> bool {
        self.backward
    }

    pub fn is_up_to(&self) -> bool {
        self.up_to
    }

    pub fn to_last_find_char(&self) -> LastFindChar {
        LastFindChar {
            target: self.target,
            backward: self.backward,
            up_to: self.up_to,
        }
    }

    /// Wrap in a decorator that records this search as the last find before
    /// evaluating it.
    pub fn recording(self) -> RecordingMotion<Self> {
        let slot = self.to_last_find_char();
        RecordingMotion::new(self, move |editor: &EditorContext| {
            editor.registers_mut().set_last_find_char(slot);
        })
    }

    fn search(&self, editor: &EditorContext, count: usize, from: usize) -> CommandResult<usize> {
        let content = editor.content();
        let line = content.line_information_of_offset(from);
        let text: Vec<char> = content
            .text(line.begin_offset(), line.length())
            .chars()
            .collect();
        let col = from.saturating_sub(line.begin_offset());
        let mut remaining = count;
        let found = if self.backward {
            (0..col.min(text.len())).rev().find(|&i| {
                text[i] == self.target && {
                    remaining -= 1;
                    remaining == 0
                }
            })
        } else {
            (col + 1..text.len()).find(|&i| {
                text[i] == self.target && {
                    remaining -= 1;
                    remaining == 0
                }
            })
        };
        let hit = found.ok_or(CommandError::CharNotFound(self.target))?;
        let dest = match (self.up_to, self.backward) {
            (false, _) => hit,
            (true, false) => hit - 1,
            (true, true) => hit + 1,
        };
        Ok(line.begin_offset() + dest)
    }
}

impl Motion for FindCharMotion {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        let count = count_or_one(count);
        let start = from.offset();
        let mut dest = self.search(editor, count, start)?;
        // A repeated `t`/`T` right next to its match would find the same spot.
        if self.repetition && self.up_to && dest == start {
            let nudged = if self.backward {
                start.saturating_sub(1)
            } else {
                start + 1
            };
            dest = self.search(editor, count, nudged)?;
        }
        trace!(target: "actions.motion", target_char = %self.target, backward = self.backward, up_to = self.up_to, from = start, dest, "find_char");
        Ok(Position::new(dest))
    }

    fn border_policy(&self) -> BorderPolicy {
        if self.backward {
            BorderPolicy::Exclusive
        } else {
            BorderPolicy::Inclusive
        }
    }

    fn name(&self) -> &'static str {
        match (self.backward, self.up_to) {
            (false, false) => "f",
            (true, false) => "F",
            (false, true) => "t",
            (true, true) => "T",
        }
    }
}

/// A motion that runs a side effect against the editor before delegating.
pub struct RecordingMotion<M> {
    inner: M,
    record: Box<dyn Fn(&EditorContext)>,
}

impl<M: Motion> RecordingMotion<M> {
    pub fn new(inner: M, record: impl Fn(&EditorContext) + 'static) -> Self {
        Self {
            inner,
            record: Box::new(record),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: Motion> Motion for RecordingMotion<M> {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        (self.record)(editor);
        self.inner.destination(editor, count, from)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::editor_at;

    fn dest(m: &impl Motion, e: &EditorContext, from: usize) -> CommandResult<usize> {
        m.destination(e, None, Position::new(from)).map(|p| p.offset())
    }

    #[test]
    fn find_stays_on_current_line() {
        let e = editor_at("x=ab=c\nd=", 0);
        assert_eq!(dest(&FindCharMotion::new('=', false, false), &e, 0), Ok(1));
        assert_eq!(
            FindCharMotion::new('=', false, false)
                .destination(&e, Some(2), Position::new(0))
                .map(|p| p.offset()),
            Ok(4)
        );
        assert_eq!(
            dest(&FindCharMotion::new('d', false, false), &e, 0),
            Err(CommandError::CharNotFound('d'))
        );
        assert_eq!(dest(&FindCharMotion::new('=', true, false), &e, 8), Err(CommandError::CharNotFound('=')));
    }

    #[test]
    fn up_to_stops_beside_match() {
        let e = editor_at("=ab=cd", 0);
        assert_eq!(dest(&FindCharMotion::new('=', false, true), &e, 0), Ok(2));
        assert_eq!(dest(&FindCharMotion::new('=', true, true), &e, 5), Ok(4));
    }

    #[test]
    fn reverse_returns_to_start() {
        let e = editor_at("=ab=cd", 0);
        let f = FindCharMotion::new('=', false, false);
        let there = dest(&f, &e, 0).unwrap();
        assert_eq!(there, 3);
        assert_eq!(dest(&f.reverse(), &e, there), Ok(0));
    }

    #[test]
    fn repeated_up_to_advances() {
        let e = editor_at("a.b.c.d.", 0);
        let t = FindCharMotion::new('.', false, true);
        let mut at = dest(&t, &e, 0).unwrap();
        assert_eq!(at, 0);
        let mut seen = Vec::new();
        for _ in 0..3 {
            at = dest(&t.repetition(), &e, at).unwrap();
            seen.push(at);
        }
        assert_eq!(seen, vec![2, 4, 6]);
    }

    #[test]
    fn nudge_only_applies_to_up_to() {
        let e = editor_at("a.b", 0);
        // Without the repetition flag `t` stalls next to its match.
        assert_eq!(dest(&FindCharMotion::new('.', false, true), &e, 0), Ok(0));
        // `f` lands on the match and never needs a nudge.
        assert_eq!(dest(&FindCharMotion::new('.', false, false).repetition(), &e, 0), Ok(1));
    }

    #[test]
    fn recording_writes_last_find_slot() {
        let e = editor_at("a.b.c", 0);
        let m = FindCharMotion::new('.', false, true).recording();
        assert_eq!(dest(&m, &e, 0), Ok(0));
        let last = FindCharMotion::from_last(&e).unwrap();
        assert_eq!(last.target(), '.');
        assert!(last.is_up_to());
        assert_eq!(dest(&last, &e, 0), Ok(2));
        assert_eq!(dest(&last.reverse(), &e, 4), Ok(2));
    }

    #[test]
    fn from_last_without_history_fails() {
        let e = editor_at("abc", 0);
        assert_eq!(FindCharMotion::from_last(&e), Err(CommandError::NoPreviousFind));
    }
}
