//! Motion key parsing shared by Normal and Visual mode, including the
//! multi-key motions (`gg`, `\w`, `f<char>`).

use crate::editor::EditorContext;
use crate::error::CommandResult;
use crate::motion::{
    BasicMotion, FindCharMotion, Motion, SearchMotion, SubwordMotion, WordKind, WordMotion,
    normalize_normal_position,
};
use core_events::{KeyCode, KeyStroke};
use core_text::StickyColumnPolicy;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    G,
    Backslash,
    Find { backward: bool, up_to: bool },
}

pub(crate) enum MotionStep {
    /// The key started a multi-key motion.
    Pending,
    Motion(Box<dyn Motion>),
    /// Word motions stay concrete; operators treat `w` specially.
    Word(WordMotion),
    NotAMotion,
}

#[derive(Debug, Default)]
pub(crate) struct MotionKeys {
    prefix: Option<Prefix>,
}

impl MotionKeys {
    pub fn is_pending(&self) -> bool {
        self.prefix.is_some()
    }

    /// The next key is a literal character (`f` target).
    pub fn awaits_literal(&self) -> bool {
        matches!(self.prefix, Some(Prefix::Find { .. }))
    }

    pub fn reset(&mut self) {
        self.prefix = None;
    }

    pub fn feed(&mut self, editor: &EditorContext, c: char) -> CommandResult<MotionStep> {
        if let Some(prefix) = self.prefix.take() {
            let motion: Box<dyn Motion> = match (prefix, c) {
                (Prefix::G, 'g') => Box::new(BasicMotion::FirstLine),
                (Prefix::Backslash, 'w') => Box::new(SubwordMotion::WORD),
                (Prefix::Backslash, 'b') => Box::new(SubwordMotion::BACK),
                (Prefix::Backslash, 'e') => Box::new(SubwordMotion::END),
                (Prefix::Find { backward, up_to }, target) => {
                    Box::new(FindCharMotion::new(target, backward, up_to).recording())
                }
                _ => return Ok(MotionStep::NotAMotion),
            };
            return Ok(MotionStep::Motion(motion));
        }
        let word = match c {
            'w' | 'W' => Some(WordKind::Forward),
            'b' | 'B' => Some(WordKind::Backward),
            'e' | 'E' => Some(WordKind::End),
            _ => None,
        };
        if let Some(kind) = word {
            return Ok(MotionStep::Word(WordMotion::new(kind, c.is_ascii_uppercase())));
        }
        let motion: Box<dyn Motion> = match c {
            'h' => Box::new(BasicMotion::Left),
            'l' | ' ' => Box::new(BasicMotion::Right),
            'j' => Box::new(BasicMotion::Down),
            'k' => Box::new(BasicMotion::Up),
            '0' => Box::new(BasicMotion::LineStart),
            '^' => Box::new(BasicMotion::FirstNonBlank),
            '$' => Box::new(BasicMotion::LineEnd),
            'G' => Box::new(BasicMotion::LastLine),
            ';' => Box::new(FindCharMotion::from_last(editor)?),
            ',' => Box::new(FindCharMotion::from_last(editor)?.reverse()),
            'n' => Box::new(SearchMotion::from_last(editor, false)?),
            'N' => Box::new(SearchMotion::from_last(editor, true)?),
            _ => {
                let prefix = match c {
                    'g' => Prefix::G,
                    '\\' => Prefix::Backslash,
                    'f' => Prefix::Find { backward: false, up_to: false },
                    'F' => Prefix::Find { backward: true, up_to: false },
                    't' => Prefix::Find { backward: false, up_to: true },
                    'T' => Prefix::Find { backward: true, up_to: true },
                    _ => return Ok(MotionStep::NotAMotion),
                };
                self.prefix = Some(prefix);
                return Ok(MotionStep::Pending);
            }
        };
        Ok(MotionStep::Motion(motion))
    }
}

/// Motions bound to non-character keys.
pub(crate) fn special_key_motion(key: KeyStroke) -> Option<Box<dyn Motion>> {
    if !key.mods.is_empty() {
        return None;
    }
    let motion: Box<dyn Motion> = match key.code {
        KeyCode::Left | KeyCode::Backspace => Box::new(BasicMotion::Left),
        KeyCode::Right => Box::new(BasicMotion::Right),
        KeyCode::Up => Box::new(BasicMotion::Up),
        KeyCode::Down => Box::new(BasicMotion::Down),
        KeyCode::Home => Box::new(BasicMotion::LineStart),
        KeyCode::End => Box::new(BasicMotion::LineEnd),
        _ => return None,
    };
    Some(motion)
}

/// Move the cursor to the motion's destination, keeping it on a character.
pub(crate) fn move_to(
    editor: &mut EditorContext,
    motion: &dyn Motion,
    count: Option<usize>,
) -> CommandResult<()> {
    let from = editor.position();
    let policy = motion.sticky_column_policy();
    if policy == StickyColumnPolicy::Never && editor.cursor().sticky_column().is_none() {
        // First vertical move: remember the column it started from.
        editor.set_position(from, StickyColumnPolicy::OnChange);
    }
    let dest = motion.destination(editor, count, from)?;
    let dest = normalize_normal_position(editor.content(), dest);
    trace!(target: "actions.motion", motion = motion.name(), ?count, from = from.offset(), dest = dest.offset(), "move");
    editor.set_position(dest, policy);
    Ok(())
}
