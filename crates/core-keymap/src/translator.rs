//! Pending-prefix key translation.
//!
//! The translator buffers keys while they are a strict prefix of some mapping
//! in the active map. Once the buffer can no longer grow into a longer mapping
//! it is settled front to back: the longest complete mapping at the front is
//! expanded, otherwise the first key is flushed unmapped, and whatever remains
//! is matched again. No key is ever dropped.

use crate::{KeyMap, Remapping, Resolution};
use core_events::{KeyStroke, RemappedKeyStroke};
use std::collections::VecDeque;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// Nothing was buffered and the key starts no mapping; the caller handles it.
    Unmapped,
    /// The key was buffered as part of a possible longer mapping.
    Pending,
    /// The buffer was settled; the output queue holds the result.
    Resolved,
}

#[derive(Debug, Default)]
pub struct KeyStrokeTranslator {
    pending: Vec<KeyStroke>,
    pending_map: Option<String>,
    output: VecDeque<RemappedKeyStroke>,
}

impl KeyStrokeTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_keys(&self) -> &[KeyStroke] {
        &self.pending
    }

    /// Name of the map the buffered keys were matched against.
    pub fn pending_map(&self) -> Option<&str> {
        self.pending_map.as_deref()
    }

    /// Move the queued output out. Nested re-entry gets a fresh queue.
    pub fn take_output(&mut self) -> VecDeque<RemappedKeyStroke> {
        std::mem::take(&mut self.output)
    }

    /// Drop buffered input and queued output.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.pending_map = None;
        self.output.clear();
    }

    pub fn process_key_stroke(&mut self, map: &KeyMap, key: KeyStroke) -> Translation {
        if self.pending_map.as_deref().is_some_and(|m| m != map.name()) {
            trace!(
                target: "input.translate",
                from = ?self.pending_map,
                to = map.name(),
                flushed = self.pending.len(),
                "map_switch_flush"
            );
            self.flush_literal_all();
        }
        if self.pending.is_empty()
            && self.output.is_empty()
            && map.resolve(std::slice::from_ref(&key)) == Resolution::Unmapped
        {
            return Translation::Unmapped;
        }
        self.pending.push(key);
        self.pending_map = Some(map.name().to_string());
        self.settle(map, false)
    }

    /// A key that must not be remapped. With nothing buffered the caller
    /// handles it. Otherwise it ends the buffered prefix: the buffer is settled
    /// as on a timeout and the key is queued after it, unmapped.
    pub fn process_literal(&mut self, map: &KeyMap, key: KeyStroke) -> Translation {
        if self.pending.is_empty() {
            return Translation::Unmapped;
        }
        if self.pending_map.as_deref().is_some_and(|m| m != map.name()) {
            self.flush_literal_all();
        } else {
            self.settle(map, true);
        }
        trace!(target: "input.translate", "literal_after_pending");
        self.output.push_back(RemappedKeyStroke::new(key, false));
        Translation::Resolved
    }

    /// Ambiguity timeout: resolve whatever is buffered without waiting for more
    /// keys. Returns `Unmapped` when nothing was pending.
    pub fn flush(&mut self, map: &KeyMap) -> Translation {
        if self.pending.is_empty() {
            return Translation::Unmapped;
        }
        trace!(target: "input.translate", pending = self.pending.len(), "timeout_flush");
        self.settle(map, true)
    }

    fn settle(&mut self, map: &KeyMap, force: bool) -> Translation {
        while !self.pending.is_empty() {
            match map.resolve(&self.pending) {
                Resolution::NeedMore { .. } if !force => {
                    trace!(target: "input.translate", pending = self.pending.len(), "pending");
                    return Translation::Pending;
                }
                Resolution::NeedMore {
                    fallback: Some((consumed, remapping)),
                }
                | Resolution::Matched {
                    consumed,
                    remapping,
                } => self.expand(consumed, &remapping),
                Resolution::NeedMore { fallback: None } | Resolution::Unmapped => {
                    let key = self.pending.remove(0);
                    trace!(target: "input.translate", "flush_unmapped");
                    self.output.push_back(RemappedKeyStroke::new(key, false));
                }
            }
        }
        self.pending_map = None;
        Translation::Resolved
    }

    fn expand(&mut self, consumed: usize, remapping: &Remapping) {
        trace!(
            target: "input.translate",
            consumed,
            produced = remapping.keys.len(),
            recursive = remapping.recursive,
            "expand"
        );
        self.pending.drain(..consumed);
        self.output.extend(
            remapping
                .keys
                .iter()
                .map(|k| RemappedKeyStroke::new(*k, remapping.recursive)),
        );
    }

    fn flush_literal_all(&mut self) {
        for key in self.pending.drain(..) {
            self.output.push_back(RemappedKeyStroke::new(key, false));
        }
        self.pending_map = None;
    }
}
