//! Ex commands typed on the `:` command line.
//!
//! Parsing is pure: [`CommandParser::parse`] classifies the line into a
//! [`ParsedCommand`] and [`execute`] applies it to the editor. Supported:
//!
//! * `:N` jumps to line N (first non-blank).
//! * `:map`, `:noremap`, `:unmap`, `:mapclear` and their mode-prefixed forms
//!   (`n`, `v`/`x`, `i`, `c`). The bare forms act on Normal and Visual, the
//!   `!` forms on Insert and command line. Without arguments the map
//!   commands list the current mappings.

use crate::editor::EditorContext;
use crate::error::{CommandError, CommandResult};
use crate::motion::first_non_blank;
use core_events::{format_key_sequence, parse_key_sequence};
use core_keymap::{COMMAND_MAP, INSERT_MAP, NORMAL_MAP, Remapping, VISUAL_MAP};
use core_text::{Position, StickyColumnPolicy};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Empty line; nothing to do.
    Nothing,
    /// One-based line number.
    Goto(usize),
    Map {
        maps: &'static [&'static str],
        recursive: bool,
        lhs: String,
        rhs: String,
    },
    ListMaps {
        maps: &'static [&'static str],
        lhs: Option<String>,
    },
    Unmap {
        maps: &'static [&'static str],
        lhs: String,
    },
    MapClear {
        maps: &'static [&'static str],
    },
    Unknown(String),
}

const NORMAL_VISUAL: &[&str] = &[NORMAL_MAP, VISUAL_MAP];
const INSERT_COMMAND: &[&str] = &[INSERT_MAP, COMMAND_MAP];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapVerb {
    Map,
    Noremap,
    Unmap,
    MapClear,
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let body = s.strip_prefix(':').unwrap_or(s).trim_start();
        if body.is_empty() {
            return ParsedCommand::Nothing;
        }
        if let Ok(line) = body.parse::<usize>() {
            return ParsedCommand::Goto(line);
        }
        let (name, rest) = match body.find(char::is_whitespace) {
            Some(i) => (&body[..i], body[i..].trim()),
            None => (body, ""),
        };
        let Some((maps, verb)) = Self::map_command(name) else {
            return ParsedCommand::Unknown(body.to_string());
        };
        let (lhs, rhs) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim()),
            None => (rest, ""),
        };
        match verb {
            MapVerb::MapClear => ParsedCommand::MapClear { maps },
            MapVerb::Unmap => ParsedCommand::Unmap {
                maps,
                lhs: lhs.to_string(),
            },
            MapVerb::Map | MapVerb::Noremap if rhs.is_empty() => ParsedCommand::ListMaps {
                maps,
                lhs: (!lhs.is_empty()).then(|| lhs.to_string()),
            },
            MapVerb::Map | MapVerb::Noremap => ParsedCommand::Map {
                maps,
                recursive: verb == MapVerb::Map,
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            },
        }
    }

    fn map_command(name: &str) -> Option<(&'static [&'static str], MapVerb)> {
        let (name, bang) = match name.strip_suffix('!') {
            Some(n) => (n, true),
            None => (name, false),
        };
        let verb_of = |s: &str| match s {
            "map" => Some(MapVerb::Map),
            "noremap" => Some(MapVerb::Noremap),
            "unmap" => Some(MapVerb::Unmap),
            "mapclear" => Some(MapVerb::MapClear),
            _ => None,
        };
        if let Some(verb) = verb_of(name) {
            return Some((if bang { INSERT_COMMAND } else { NORMAL_VISUAL }, verb));
        }
        if bang {
            return None;
        }
        let mut chars = name.chars();
        let maps: &'static [&'static str] = match chars.next()? {
            'n' => &[NORMAL_MAP],
            'v' | 'x' => &[VISUAL_MAP],
            'i' => &[INSERT_MAP],
            'c' => &[COMMAND_MAP],
            _ => return None,
        };
        verb_of(chars.as_str()).map(|verb| (maps, verb))
    }
}

/// Run a command line.
pub fn execute(editor: &mut EditorContext, raw: &str) -> CommandResult<()> {
    let parsed = CommandParser::parse(raw);
    debug!(target: "actions.command", ?parsed, "execute");
    match parsed {
        ParsedCommand::Nothing => Ok(()),
        ParsedCommand::Goto(line) => {
            let content = editor.content();
            let last = content.number_of_lines().saturating_sub(1);
            let info = content.line_information(line.saturating_sub(1).min(last));
            let target = first_non_blank(content, &info);
            editor.set_position(Position::new(target), StickyColumnPolicy::OnChange);
            Ok(())
        }
        ParsedCommand::Map {
            maps,
            recursive,
            lhs,
            rhs,
        } => {
            let lhs = parse_key_sequence(&lhs)?;
            let rhs = parse_key_sequence(&rhs)?;
            for name in maps {
                editor
                    .key_maps_mut()
                    .key_map_mut(name)
                    .add_mapping(lhs.clone(), Remapping::new(rhs.clone(), recursive));
            }
            Ok(())
        }
        ParsedCommand::ListMaps { maps, lhs } => {
            let prefix = match lhs {
                Some(lhs) => parse_key_sequence(&lhs)?,
                None => Vec::new(),
            };
            let listing = list_mappings(editor, maps, &prefix);
            if listing.is_empty() {
                editor.ui().set_info_message("No mapping found");
            } else {
                editor.ui().set_info_message(&listing);
            }
            Ok(())
        }
        ParsedCommand::Unmap { maps, lhs } => {
            if lhs.is_empty() {
                return Err(CommandError::InvalidArgument("unmap needs a key sequence".into()));
            }
            let lhs = parse_key_sequence(&lhs)?;
            let mut removed = false;
            for name in maps {
                removed |= editor.key_maps_mut().key_map_mut(name).remove_mapping(&lhs);
            }
            if removed {
                Ok(())
            } else {
                Err(CommandError::NoSuchMapping)
            }
        }
        ParsedCommand::MapClear { maps } => {
            for name in maps {
                editor.key_maps_mut().key_map_mut(name).clear();
            }
            Ok(())
        }
        ParsedCommand::Unknown(body) => Err(CommandError::UnknownCommand(body)),
    }
}

fn list_mappings(
    editor: &EditorContext,
    maps: &[&str],
    prefix: &[core_events::KeyStroke],
) -> String {
    let mut lines = Vec::new();
    for name in maps {
        let Some(map) = editor.key_maps().key_map(name) else {
            continue;
        };
        for (lhs, rhs) in map.mappings().filter(|(lhs, _)| lhs.starts_with(prefix)) {
            lines.push(format!(
                "{}  {} {}{}",
                name,
                format_key_sequence(lhs),
                if rhs.recursive { "" } else { "* " },
                format_key_sequence(&rhs.keys)
            ));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{editor_at, editor_with_ui};
    use core_events::KeyStroke;

    #[test]
    fn parse_goto() {
        assert_eq!(CommandParser::parse(":12"), ParsedCommand::Goto(12));
        assert_eq!(CommandParser::parse(":"), ParsedCommand::Nothing);
    }

    #[test]
    fn parse_map_families() {
        assert_eq!(
            CommandParser::parse(":inoremap jj <Esc>"),
            ParsedCommand::Map {
                maps: &[INSERT_MAP],
                recursive: false,
                lhs: "jj".into(),
                rhs: "<Esc>".into()
            }
        );
        assert_eq!(
            CommandParser::parse("map! ab cd"),
            ParsedCommand::Map {
                maps: INSERT_COMMAND,
                recursive: true,
                lhs: "ab".into(),
                rhs: "cd".into()
            }
        );
        assert_eq!(
            CommandParser::parse(":xunmap Q"),
            ParsedCommand::Unmap {
                maps: &[VISUAL_MAP],
                lhs: "Q".into()
            }
        );
        assert_eq!(
            CommandParser::parse(":nmap"),
            ParsedCommand::ListMaps {
                maps: &[NORMAL_MAP],
                lhs: None
            }
        );
        assert_eq!(
            CommandParser::parse(":mapclear"),
            ParsedCommand::MapClear { maps: NORMAL_VISUAL }
        );
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            CommandParser::parse(":nmap! x y"),
            ParsedCommand::Unknown("nmap! x y".into())
        );
        assert_eq!(
            CommandParser::parse(":frobnicate"),
            ParsedCommand::Unknown("frobnicate".into())
        );
    }

    #[test]
    fn goto_lands_on_first_non_blank_and_clamps() {
        let mut e = editor_at("a\n  b\nc", 0);
        execute(&mut e, ":2").unwrap();
        assert_eq!(e.position().offset(), 4);
        execute(&mut e, ":99").unwrap();
        assert_eq!(e.position().offset(), 6);
    }

    #[test]
    fn map_then_unmap() {
        let mut e = editor_at("", 0);
        execute(&mut e, ":nnoremap Q dd").unwrap();
        let map = e.key_maps().key_map(NORMAL_MAP).unwrap();
        let rhs = map.get(&[KeyStroke::char('Q')]).unwrap();
        assert!(!rhs.recursive);
        assert_eq!(rhs.keys, vec![KeyStroke::char('d'), KeyStroke::char('d')]);
        execute(&mut e, ":nunmap Q").unwrap();
        assert_eq!(execute(&mut e, ":nunmap Q"), Err(CommandError::NoSuchMapping));
    }

    #[test]
    fn listing_goes_to_info_message() {
        let (mut e, ui) = editor_with_ui("", 0);
        execute(&mut e, ":imap jj <Esc>").unwrap();
        execute(&mut e, ":imap").unwrap();
        assert_eq!(ui.borrow().info.as_deref(), Some("insert  jj <Esc>"));
    }

    #[test]
    fn unknown_command_is_an_error() {
        let mut e = editor_at("", 0);
        assert_eq!(
            execute(&mut e, ":wq"),
            Err(CommandError::UnknownCommand("wq".into()))
        );
    }
}
