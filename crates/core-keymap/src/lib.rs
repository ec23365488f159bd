//! core-keymap: user key maps and the pending-prefix translator that applies them.
//!
//! Design principles:
//! - Each named map compiles its mappings into a small trie keyed by
//!   [`KeyStroke`]; the trie is rebuilt whenever a mapping is added or removed.
//! - Later definitions of the same left-hand side replace earlier ones.
//! - Resolution is pure: it depends only on the buffered keys. All buffering,
//!   flushing and output queueing lives in [`translator`].
//! - Logging only at TRACE for traversal steps.

use core_events::KeyStroke;
use smallvec::SmallVec;
use std::collections::HashMap;
use tracing::{debug, trace};

pub mod translator;

pub use translator::{KeyStrokeTranslator, Translation};

/// Names of the maps every provider carries.
pub const NORMAL_MAP: &str = "normal";
pub const VISUAL_MAP: &str = "visual";
pub const INSERT_MAP: &str = "insert";
pub const COMMAND_MAP: &str = "command";

/// Right-hand side of a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapping {
    pub keys: Vec<KeyStroke>,
    /// Whether the produced keys are themselves subject to remapping.
    pub recursive: bool,
}

impl Remapping {
    pub fn new(keys: Vec<KeyStroke>, recursive: bool) -> Self {
        Self { keys, recursive }
    }
}

#[derive(Debug, Clone)]
struct MappingEntry {
    lhs: Vec<KeyStroke>,
    rhs: Remapping,
}

#[derive(Debug, Clone)]
struct Edge {
    key: KeyStroke,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node {
    terminal: Option<usize>, // index into entries
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

/// Result of matching buffered keys against a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The first `consumed` keys form the longest complete mapping and no longer
    /// mapping can still match.
    Matched { consumed: usize, remapping: Remapping },
    /// Every buffered key was walked and longer mappings remain possible.
    /// `fallback` is the longest complete mapping seen on the way, used when an
    /// ambiguity timeout forces resolution.
    NeedMore {
        fallback: Option<(usize, Remapping)>,
    },
    /// No mapping starts with the buffered keys.
    Unmapped,
}

#[derive(Debug, Clone)]
pub struct KeyMap {
    name: String,
    entries: Vec<MappingEntry>,
    nodes: Vec<Node>,
}

impl KeyMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            nodes: vec![Node::new()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Define (or redefine) `lhs`. Empty left-hand sides are ignored.
    pub fn add_mapping(&mut self, lhs: Vec<KeyStroke>, rhs: Remapping) {
        if lhs.is_empty() {
            return;
        }
        debug!(
            target: "input.keymap",
            map = %self.name,
            lhs_len = lhs.len(),
            rhs_len = rhs.keys.len(),
            recursive = rhs.recursive,
            "mapping_add"
        );
        if let Some(existing) = self.entries.iter_mut().find(|e| e.lhs == lhs) {
            existing.rhs = rhs;
        } else {
            self.entries.push(MappingEntry { lhs, rhs });
        }
        self.rebuild();
    }

    /// Remove the mapping for `lhs`, returning whether one existed.
    pub fn remove_mapping(&mut self, lhs: &[KeyStroke]) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.lhs != lhs);
        let removed = self.entries.len() != before;
        if removed {
            debug!(target: "input.keymap", map = %self.name, lhs_len = lhs.len(), "mapping_remove");
            self.rebuild();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.rebuild();
    }

    pub fn get(&self, lhs: &[KeyStroke]) -> Option<&Remapping> {
        self.entries.iter().find(|e| e.lhs == lhs).map(|e| &e.rhs)
    }

    pub fn mappings(&self) -> impl Iterator<Item = (&[KeyStroke], &Remapping)> {
        self.entries.iter().map(|e| (e.lhs.as_slice(), &e.rhs))
    }

    fn rebuild(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new());
        for (idx, entry) in self.entries.iter().enumerate() {
            let mut cur = 0usize;
            for key in &entry.lhs {
                let next = if let Some(e) = self.nodes[cur].edges.iter().find(|e| e.key == *key) {
                    e.next
                } else {
                    let new_idx = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[cur].edges.push(Edge {
                        key: *key,
                        next: new_idx,
                    });
                    new_idx
                };
                cur = next;
            }
            self.nodes[cur].terminal = Some(idx);
        }
    }

    pub fn resolve(&self, buffer: &[KeyStroke]) -> Resolution {
        let mut node_idx = 0usize;
        let mut last_terminal: Option<(usize, usize)> = None; // (consumed, entry index)
        let mut walked_all = true;
        for (i, key) in buffer.iter().enumerate() {
            match self.nodes[node_idx].edges.iter().find(|e| e.key == *key) {
                Some(edge) => {
                    node_idx = edge.next;
                    trace!(target: "input.keymap", step = i, node = node_idx, "advance");
                    if let Some(ti) = self.nodes[node_idx].terminal {
                        last_terminal = Some((i + 1, ti));
                    }
                }
                None => {
                    walked_all = false;
                    break;
                }
            }
        }
        let terminal = last_terminal.map(|(consumed, ti)| (consumed, self.entries[ti].rhs.clone()));
        if buffer.is_empty() {
            return Resolution::Unmapped;
        }
        if walked_all && !self.nodes[node_idx].edges.is_empty() {
            return Resolution::NeedMore { fallback: terminal };
        }
        match terminal {
            Some((consumed, remapping)) => Resolution::Matched {
                consumed,
                remapping,
            },
            None => Resolution::Unmapped,
        }
    }
}

/// Resolves key maps by name and hands out mutable access for mapping commands.
pub trait KeyMapProvider {
    fn key_map(&self, name: &str) -> Option<&KeyMap>;
    /// Mutable map, created empty on first use.
    fn key_map_mut(&mut self, name: &str) -> &mut KeyMap;
}

#[derive(Debug, Clone)]
pub struct DefaultKeyMapProvider {
    maps: HashMap<String, KeyMap>,
}

impl DefaultKeyMapProvider {
    pub fn new() -> Self {
        let maps = [NORMAL_MAP, VISUAL_MAP, INSERT_MAP, COMMAND_MAP]
            .into_iter()
            .map(|n| (n.to_string(), KeyMap::new(n)))
            .collect();
        Self { maps }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }
}

impl Default for DefaultKeyMapProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMapProvider for DefaultKeyMapProvider {
    fn key_map(&self, name: &str) -> Option<&KeyMap> {
        self.maps.get(name)
    }

    fn key_map_mut(&mut self, name: &str) -> &mut KeyMap {
        self.maps
            .entry(name.to_string())
            .or_insert_with(|| KeyMap::new(name))
    }
}
