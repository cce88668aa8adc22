//! Persistent append-only event storage.
//!
//! Events live in frozen, `Arc`-shared chunks plus a short tail. Appending to
//! a log that another reader still holds copies at most the tail and the
//! chunk index, never the events in frozen chunks, and never changes what
//! the other reader sees.

use std::fmt;
use std::sync::Arc;

use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::events::ParsedEvent;

/// Events per frozen chunk.
pub const CHUNK_LEN: usize = 256;

#[derive(Clone, Default)]
pub struct EventLog {
    chunks: Arc<Vec<Arc<[ParsedEvent]>>>,
    tail: Arc<Vec<ParsedEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chunks.len() * CHUNK_LEN + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParsedEvent> + '_ {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.iter())
            .chain(self.tail.iter())
    }

    pub fn get(&self, index: usize) -> Option<&ParsedEvent> {
        let chunk = index / CHUNK_LEN;
        if chunk < self.chunks.len() {
            return self.chunks[chunk].get(index % CHUNK_LEN);
        }
        self.tail.get(index - self.chunks.len() * CHUNK_LEN)
    }

    pub fn last(&self) -> Option<&ParsedEvent> {
        self.tail
            .last()
            .or_else(|| self.chunks.last().and_then(|chunk| chunk.last()))
    }

    /// New log with `event` appended; `self` is left untouched.
    pub fn appended(&self, event: ParsedEvent) -> Self {
        let mut next = self.clone();
        next.push(event);
        next
    }

    /// In-place append. Shared chunks or tail are copied first, so clones
    /// taken earlier keep their contents.
    pub fn push(&mut self, event: ParsedEvent) {
        let tail = Arc::make_mut(&mut self.tail);
        tail.push(event);
        if tail.len() == CHUNK_LEN {
            let frozen: Arc<[ParsedEvent]> = Arc::from(std::mem::take(tail));
            Arc::make_mut(&mut self.chunks).push(frozen);
        }
    }

    pub fn to_vec(&self) -> Vec<ParsedEvent> {
        self.iter().cloned().collect()
    }
}

impl FromIterator<ParsedEvent> for EventLog {
    fn from_iter<I: IntoIterator<Item = ParsedEvent>>(iter: I) -> Self {
        let mut log = EventLog::new();
        for event in iter {
            log.push(event);
        }
        log
    }
}

impl PartialEq for EventLog {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Serialize for EventLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

struct EventLogVisitor;

impl<'de> Visitor<'de> for EventLogVisitor {
    type Value = EventLog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence of events")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut log = EventLog::new();
        while let Some(event) = seq.next_element::<ParsedEvent>()? {
            log.push(event);
        }
        Ok(log)
    }
}

impl<'de> Deserialize<'de> for EventLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(EventLogVisitor)
    }
}
