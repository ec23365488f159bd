//! `/ ? n N`: regular-expression search over the whole text with wraparound.

use super::{Motion, count_or_one};
use crate::editor::EditorContext;
use crate::error::{CommandError, CommandResult};
use core_state::LastSearch;
use core_text::{BorderPolicy, Position};
use regex::Regex;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMotion {
    pattern: String,
    backward: bool,
}

impl SearchMotion {
    pub fn new(pattern: impl Into<String>, backward: bool) -> Self {
        Self {
            pattern: pattern.into(),
            backward,
        }
    }

    /// `n` (`reverse == false`) or `N` built from the last search.
    pub fn from_last(editor: &EditorContext, reverse: bool) -> CommandResult<Self> {
        let last = editor
            .registers()
            .last_search()
            .ok_or(CommandError::NoPreviousSearch)?;
        Ok(Self::new(last.pattern, last.backward != reverse))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_backward(&self) -> bool {
        self.backward
    }

    pub fn to_last_search(&self) -> LastSearch {
        LastSearch {
            pattern: self.pattern.clone(),
            backward: self.backward,
        }
    }

    /// Compile the pattern. Word anchors `\<` and `\>` become `\b`.
    pub fn compile(&self) -> CommandResult<Regex> {
        let translated = self.pattern.replace("\\<", "\\b").replace("\\>", "\\b");
        Regex::new(&translated).map_err(|err| {
            debug!(target: "actions.motion", pattern = %self.pattern, %err, "invalid_pattern");
            CommandError::InvalidPattern(self.pattern.clone())
        })
    }
}

/// Char offsets of every match start, ascending.
fn match_starts(re: &Regex, text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut chars = 0;
    let mut last_byte = 0;
    for m in re.find_iter(text) {
        chars += text[last_byte..m.start()].chars().count();
        last_byte = m.start();
        starts.push(chars);
    }
    starts
}

impl Motion for SearchMotion {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        let re = self.compile()?;
        let content = editor.content();
        let text = content.text(0, content.text_length());
        let starts = match_starts(&re, &text);
        if starts.is_empty() {
            return Err(CommandError::PatternNotFound(self.pattern.clone()));
        }
        let mut at = from.offset();
        for _ in 0..count_or_one(count) {
            at = if self.backward {
                starts
                    .iter()
                    .rev()
                    .find(|&&s| s < at)
                    .or(starts.last())
                    .copied()
                    .unwrap_or(at)
            } else {
                starts
                    .iter()
                    .find(|&&s| s > at)
                    .or(starts.first())
                    .copied()
                    .unwrap_or(at)
            };
        }
        trace!(target: "actions.motion", pattern = %self.pattern, backward = self.backward, from = from.offset(), dest = at, "search");
        Ok(Position::new(at))
    }

    fn border_policy(&self) -> BorderPolicy {
        BorderPolicy::Exclusive
    }

    fn name(&self) -> &'static str {
        if self.backward { "?" } else { "/" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::editor_at;

    fn dest(m: &SearchMotion, text: &str, from: usize, count: Option<usize>) -> CommandResult<usize> {
        let e = editor_at(text, from);
        m.destination(&e, count, Position::new(from)).map(|p| p.offset())
    }

    #[test]
    fn forward_search_wraps_to_top() {
        let m = SearchMotion::new("ab", false);
        assert_eq!(dest(&m, "ab xab\nab", 0, None), Ok(4));
        assert_eq!(dest(&m, "ab xab\nab", 0, Some(2)), Ok(7));
        assert_eq!(dest(&m, "ab xab\nab", 7, None), Ok(0));
    }

    #[test]
    fn backward_search_wraps_to_bottom() {
        let m = SearchMotion::new("ab", true);
        assert_eq!(dest(&m, "ab xab\nab", 5, None), Ok(4));
        assert_eq!(dest(&m, "ab xab\nab", 0, None), Ok(7));
    }

    #[test]
    fn offsets_are_characters_not_bytes() {
        let m = SearchMotion::new("x", false);
        assert_eq!(dest(&m, "éé x", 0, None), Ok(3));
    }

    #[test]
    fn failures_are_typed() {
        assert_eq!(
            dest(&SearchMotion::new("zz", false), "abc", 0, None),
            Err(CommandError::PatternNotFound("zz".into()))
        );
        assert_eq!(
            dest(&SearchMotion::new("(", false), "abc", 0, None),
            Err(CommandError::InvalidPattern("(".into()))
        );
    }

    #[test]
    fn word_anchors_are_translated() {
        let m = SearchMotion::new("\\<in\\>", false);
        assert_eq!(dest(&m, "inside in", 0, None), Ok(7));
    }
}
