//! Character, line and document motions (`h l j k 0 ^ $ gg G`).

use super::{Motion, count_or_one};
use crate::editor::EditorContext;
use crate::error::CommandResult;
use core_state::StickyColumn;
use core_text::{BorderPolicy, LineInformation, Position, StickyColumnPolicy, TextContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicMotion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    FirstNonBlank,
    LineEnd,
    /// `gg`: count names the line, default first.
    FirstLine,
    /// `G`: count names the line, default last.
    LastLine,
    /// The cursor line plus `count - 1` lines below; backs `dd`, `yy`, `cc`.
    CurrentLines,
}

/// Index of the last real line. A trailing terminator does not start a line
/// the cursor can rest on.
pub fn last_line(content: &dyn TextContent) -> usize {
    let n = content.number_of_lines();
    if n > 1 && content.line_information(n - 1).length() == 0 {
        n - 2
    } else {
        n.saturating_sub(1)
    }
}

/// Offset of the first non-blank character of `line`, or its last character
/// when the line is blank.
pub fn first_non_blank(content: &dyn TextContent, line: &LineInformation) -> usize {
    let text = content.text(line.begin_offset(), line.length());
    match text.chars().position(|c| c != ' ' && c != '\t') {
        Some(i) => line.begin_offset() + i,
        None => line.last_char_offset(),
    }
}

/// Clamp a position to where Normal mode lets the cursor rest: on a real
/// line, on a character, never on a line terminator unless the line is empty.
pub fn normalize_normal_position(content: &dyn TextContent, pos: Position) -> Position {
    let mut line = content.line_information_of_offset(pos.offset());
    let last = last_line(content);
    if line.number() > last {
        line = content.line_information(last);
    }
    let offset = pos
        .offset()
        .clamp(line.begin_offset(), line.last_char_offset());
    Position::new(offset)
}

fn line_offset(content: &dyn TextContent, from: usize, delta: isize) -> LineInformation {
    let target = from.saturating_add_signed(delta).min(last_line(content));
    content.line_information(target)
}

/// Column-preserving position on `line` for vertical motion.
fn column_on_line(
    editor: &EditorContext,
    line: &LineInformation,
    current_column: usize,
) -> Position {
    let offset = match editor.cursor().sticky_column() {
        Some(StickyColumn::EndOfLine) => line.end_offset(),
        Some(StickyColumn::Column(c)) => line.begin_offset() + c.min(line.length()),
        None => line.begin_offset() + current_column.min(line.length()),
    };
    Position::new(offset)
}

impl Motion for BasicMotion {
    fn destination(
        &self,
        editor: &EditorContext,
        count: Option<usize>,
        from: Position,
    ) -> CommandResult<Position> {
        let content = editor.content();
        let n = count_or_one(count);
        let line = content.line_information_of_offset(from.offset());
        let column = from.offset() - line.begin_offset();
        let dest = match self {
            BasicMotion::Left => from.offset().saturating_sub(n).max(line.begin_offset()),
            BasicMotion::Right => from.offset().saturating_add(n).min(line.end_offset()),
            BasicMotion::Up => {
                let target = line_offset(content, line.number(), -(n as isize));
                return Ok(column_on_line(editor, &target, column));
            }
            BasicMotion::Down => {
                let target = line_offset(content, line.number(), n as isize);
                return Ok(column_on_line(editor, &target, column));
            }
            BasicMotion::LineStart => line.begin_offset(),
            BasicMotion::FirstNonBlank => first_non_blank(content, &line),
            BasicMotion::LineEnd => {
                line_offset(content, line.number(), (n - 1) as isize).last_char_offset()
            }
            BasicMotion::FirstLine | BasicMotion::LastLine => {
                let target = match (self, count) {
                    (_, Some(c)) => c.max(1) - 1,
                    (BasicMotion::FirstLine, None) => 0,
                    _ => last_line(content),
                };
                let target = content.line_information(target.min(last_line(content)));
                first_non_blank(content, &target)
            }
            BasicMotion::CurrentLines => {
                line_offset(content, line.number(), (n - 1) as isize).begin_offset()
            }
        };
        Ok(Position::new(dest))
    }

    fn border_policy(&self) -> BorderPolicy {
        match self {
            BasicMotion::Left
            | BasicMotion::Right
            | BasicMotion::LineStart
            | BasicMotion::FirstNonBlank => BorderPolicy::Exclusive,
            BasicMotion::LineEnd => BorderPolicy::Inclusive,
            BasicMotion::Up
            | BasicMotion::Down
            | BasicMotion::FirstLine
            | BasicMotion::LastLine
            | BasicMotion::CurrentLines => BorderPolicy::LineWise,
        }
    }

    fn sticky_column_policy(&self) -> StickyColumnPolicy {
        match self {
            BasicMotion::Up | BasicMotion::Down => StickyColumnPolicy::Never,
            BasicMotion::LineEnd => StickyColumnPolicy::ToEndOfLine,
            _ => StickyColumnPolicy::OnChange,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BasicMotion::Left => "h",
            BasicMotion::Right => "l",
            BasicMotion::Up => "k",
            BasicMotion::Down => "j",
            BasicMotion::LineStart => "0",
            BasicMotion::FirstNonBlank => "^",
            BasicMotion::LineEnd => "$",
            BasicMotion::FirstLine => "gg",
            BasicMotion::LastLine => "G",
            BasicMotion::CurrentLines => "lines",
        }
    }
}
