//! Register storage plus the two "last" slots motions depend on (last find-char
//! and last search).
//!
//! Write semantics:
//! - Every write mirrors into the unnamed register.
//! - Numbered ring holds the newest `MAX` writes, newest at index 0; the oldest
//!   entry is discarded on overflow.
//! - Named registers `a`-`z`: lowercase replaces, uppercase appends. An append
//!   mirrors the full updated payload into unnamed and the ring.
//! - `_` is the black hole register: writes vanish, reads are empty.

use core_text::ContentType;
use tracing::debug;

/// Payload of one register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterContent {
    pub text: String,
    pub kind: ContentType,
}

impl RegisterContent {
    pub fn new(text: impl Into<String>, kind: ContentType) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, ContentType::Text)
    }

    pub fn lines(text: impl Into<String>) -> Self {
        Self::new(text, ContentType::Lines)
    }
}

/// The single remembered find-char command, replayed by `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastFindChar {
    pub target: char,
    pub backward: bool,
    pub up_to: bool,
}

/// The last search pattern and its direction, replayed by `n` and `N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSearch {
    pub pattern: String,
    pub backward: bool,
}

pub trait RegisterManager {
    /// Read a register. `None` (or `"`) names the unnamed register.
    fn register(&self, name: Option<char>) -> Option<RegisterContent>;
    fn write_yank(&mut self, name: Option<char>, content: RegisterContent);
    fn write_delete(&mut self, name: Option<char>, content: RegisterContent);

    fn last_find_char(&self) -> Option<LastFindChar>;
    fn set_last_find_char(&mut self, find: LastFindChar);

    fn last_search(&self) -> Option<LastSearch>;
    fn set_last_search(&mut self, search: LastSearch);
}

#[derive(Debug, Clone)]
pub struct DefaultRegisterManager {
    unnamed: Option<RegisterContent>,
    numbered: Vec<RegisterContent>, // newest at index 0, length <= MAX
    named: [Option<RegisterContent>; 26],
    last_find: Option<LastFindChar>,
    last_search: Option<LastSearch>,
}

impl Default for DefaultRegisterManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultRegisterManager {
    pub const MAX: usize = 10; // ring capacity

    pub fn new() -> Self {
        Self {
            unnamed: None,
            numbered: Vec::new(),
            named: std::array::from_fn(|_| None),
            last_find: None,
            last_search: None,
        }
    }

    /// Numbered ring, newest first.
    pub fn numbered(&self) -> &[RegisterContent] {
        &self.numbered
    }

    /// Non-empty named registers in alphabetical order.
    pub fn named_snapshot(&self) -> Vec<(char, &RegisterContent)> {
        self.named
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|c| ((b'a' + i as u8) as char, c)))
            .collect()
    }

    fn named_index(c: char) -> Option<usize> {
        if c.is_ascii_alphabetic() {
            Some((c.to_ascii_lowercase() as u8 - b'a') as usize)
        } else {
            None
        }
    }

    fn unshift_numbered(&mut self, content: RegisterContent) -> bool {
        let rotated = self.numbered.len() == Self::MAX;
        if rotated {
            self.numbered.pop();
        }
        self.numbered.insert(0, content);
        rotated
    }

    fn write(&mut self, name: Option<char>, content: RegisterContent, op: &'static str) {
        let payload = match name {
            Some('_') => {
                debug!(target: "state.registers", op, "black_hole_write");
                return;
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let append = c.is_ascii_uppercase();
                let slot = &mut self.named[(c.to_ascii_lowercase() as u8 - b'a') as usize];
                match slot {
                    Some(existing) if append => {
                        existing.text.push_str(&content.text);
                        if content.kind == ContentType::Lines {
                            existing.kind = ContentType::Lines;
                        }
                    }
                    _ => *slot = Some(content),
                }
                slot.clone()
            }
            _ => Some(content),
        };
        let Some(payload) = payload else {
            return;
        };
        self.unnamed = Some(payload.clone());
        let rotated = self.unshift_numbered(payload);
        debug!(target: "state.registers", op, register = ?name, rotated, "register_write");
    }
}

impl RegisterManager for DefaultRegisterManager {
    fn register(&self, name: Option<char>) -> Option<RegisterContent> {
        match name {
            None | Some('"') => self.unnamed.clone(),
            Some('_') => None,
            Some(d) if d.is_ascii_digit() => {
                let idx = (d as u8 - b'0') as usize;
                self.numbered.get(idx).cloned()
            }
            Some(c) => Self::named_index(c).and_then(|i| self.named[i].clone()),
        }
    }

    fn write_yank(&mut self, name: Option<char>, content: RegisterContent) {
        self.write(name, content, "yank");
    }

    fn write_delete(&mut self, name: Option<char>, content: RegisterContent) {
        self.write(name, content, "delete");
    }

    fn last_find_char(&self) -> Option<LastFindChar> {
        self.last_find
    }

    fn set_last_find_char(&mut self, find: LastFindChar) {
        self.last_find = Some(find);
    }

    fn last_search(&self) -> Option<LastSearch> {
        self.last_search.clone()
    }

    fn set_last_search(&mut self, search: LastSearch) {
        self.last_search = Some(search);
    }
}
