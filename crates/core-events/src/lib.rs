//! Key strokes as the interpreter sees them, plus the `<...>` notation used by
//! mapping commands and configuration files.

use bitflags::bitflags;
use std::fmt;
use thiserror::Error;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT = 0b0000_0010;
        const SHIFT = 0b0000_0100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    F(u8),
}

/// A single key press: a key code plus modifiers.
///
/// Shifted printable characters are carried as the character itself (`A`, not
/// `SHIFT|a`); `SHIFT` only appears on non-character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyStroke {
    pub const fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    pub const fn code(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    /// Control chord; letters are normalized to lowercase.
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), KeyModifiers::CTRL)
    }

    /// The character this stroke inserts, if it is a plain (or shifted) character.
    pub fn as_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT) => {
                Some(c)
            }
            _ => None,
        }
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(KeyModifiers::CTRL) && self.code == KeyCode::Char(c)
    }
}

impl From<char> for KeyStroke {
    fn from(c: char) -> Self {
        Self::char(c)
    }
}

/// A key produced by the remapper, tagged with whether it is subject to
/// further remapping when it is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemappedKeyStroke {
    pub key: KeyStroke,
    pub recursive: bool,
}

impl RemappedKeyStroke {
    pub const fn new(key: KeyStroke, recursive: bool) -> Self {
        Self { key, recursive }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
    #[error("empty key sequence")]
    Empty,
}

fn named_code(name: &str) -> Option<KeyCode> {
    let lower = name.to_ascii_lowercase();
    let code = match lower.as_str() {
        "esc" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bslash" => KeyCode::Char('\\'),
        "bar" => KeyCode::Char('|'),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "del" | "delete" => KeyCode::Delete,
        _ => {
            let n = lower.strip_prefix('f')?.parse::<u8>().ok()?;
            if (1..=12).contains(&n) {
                KeyCode::F(n)
            } else {
                return None;
            }
        }
    };
    Some(code)
}

/// Parse the inside of a `<...>` token, e.g. `C-x`, `Esc`, `S-Tab`.
fn parse_bracketed(inner: &str) -> Result<KeyStroke, NotationError> {
    let mut mods = KeyModifiers::empty();
    let mut rest = inner;
    while rest.len() > 2 && rest.as_bytes()[1] == b'-' {
        match rest.as_bytes()[0].to_ascii_lowercase() {
            b'c' => mods |= KeyModifiers::CTRL,
            b'a' | b'm' => mods |= KeyModifiers::ALT,
            b's' => mods |= KeyModifiers::SHIFT,
            _ => break,
        }
        rest = &rest[2..];
    }
    let mut chars = rest.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => KeyCode::Char(c),
        _ => named_code(rest).ok_or_else(|| NotationError::UnknownKey(inner.to_string()))?,
    };
    let code = match code {
        KeyCode::Char(c) if mods.contains(KeyModifiers::CTRL) => {
            KeyCode::Char(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) if mods.contains(KeyModifiers::SHIFT) => {
            mods.remove(KeyModifiers::SHIFT);
            KeyCode::Char(c.to_ascii_uppercase())
        }
        other => other,
    };
    Ok(KeyStroke::new(code, mods))
}

/// Parse key notation such as `jj`, `<Esc>` or `d<C-w>` into key strokes.
///
/// A `<` that does not start a closed `<...>` token is taken literally, so
/// `a<b` is three keys. A closed token with an unknown name is an error.
pub fn parse_key_sequence(input: &str) -> Result<Vec<KeyStroke>, NotationError> {
    let mut out = Vec::new();
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        if c == '<'
            && let Some(close) = rest[1..].find('>')
            && close > 0
        {
            let inner = &rest[1..=close];
            if !inner.contains('<') {
                out.push(parse_bracketed(inner)?);
                rest = &rest[close + 2..];
                continue;
            }
        }
        out.push(KeyStroke::char(c));
        rest = &rest[c.len_utf8()..];
    }
    if out.is_empty() {
        return Err(NotationError::Empty);
    }
    Ok(out)
}

/// Render key strokes back into notation accepted by [`parse_key_sequence`].
pub fn format_key_sequence(keys: &[KeyStroke]) -> String {
    keys.iter().map(ToString::to_string).collect()
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prefix = String::new();
        if self.mods.contains(KeyModifiers::CTRL) {
            prefix.push_str("C-");
        }
        if self.mods.contains(KeyModifiers::ALT) {
            prefix.push_str("A-");
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            prefix.push_str("S-");
        }
        let name = match self.code {
            KeyCode::Char('<') => "lt".to_string(),
            KeyCode::Char(' ') if !prefix.is_empty() => "Space".to_string(),
            KeyCode::Char(c) if prefix.is_empty() => return write!(f, "{c}"),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "CR".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::F(n) => format!("F{n}"),
        };
        write!(f, "<{prefix}{name}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_characters_parse_one_to_one() {
        let keys = parse_key_sequence("jj").unwrap();
        assert_eq!(keys, vec![KeyStroke::char('j'), KeyStroke::char('j')]);
    }

    #[test]
    fn named_and_modified_keys() {
        let keys = parse_key_sequence("<Esc>d<C-W><s-a><F5>").unwrap();
        assert_eq!(
            keys,
            vec![
                KeyStroke::code(KeyCode::Esc),
                KeyStroke::char('d'),
                KeyStroke::ctrl('w'),
                KeyStroke::char('A'),
                KeyStroke::code(KeyCode::F(5)),
            ]
        );
    }

    #[test]
    fn unclosed_angle_is_literal() {
        let keys = parse_key_sequence("a<b").unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[1], KeyStroke::char('<'));
        let keys = parse_key_sequence("<>").unwrap();
        assert_eq!(keys, vec![KeyStroke::char('<'), KeyStroke::char('>')]);
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            parse_key_sequence("<Bogus>"),
            Err(NotationError::UnknownKey("Bogus".into()))
        );
        assert_eq!(parse_key_sequence(""), Err(NotationError::Empty));
    }

    #[test]
    fn display_round_trips_through_parser() {
        let src = "<C-x>ab<lt><CR><S-Tab><Space>";
        let keys = parse_key_sequence(src).unwrap();
        let rendered = format_key_sequence(&keys);
        assert_eq!(parse_key_sequence(&rendered).unwrap(), keys);
    }

    #[test]
    fn as_char_ignores_chords() {
        assert_eq!(KeyStroke::char('x').as_char(), Some('x'));
        assert_eq!(KeyStroke::ctrl('x').as_char(), None);
        assert!(KeyStroke::ctrl('N').is_ctrl('n'));
    }
}
