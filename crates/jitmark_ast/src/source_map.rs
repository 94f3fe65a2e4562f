//! Flat index from node id to kind and span.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::{NodeId, NodeKind, SourceSpan};

/// One source map record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceMapEntry {
    pub id: NodeId,
    pub kind: NodeKind,
    pub span: SourceSpan,
}

impl SourceMapEntry {
    pub const fn new(id: NodeId, kind: NodeKind, span: SourceSpan) -> Self {
        Self { id, kind, span }
    }
}

/// Immutable lookup of `(kind, span)` by [`NodeId`].
///
/// All entries are retained in collection order. Lookups resolve duplicate
/// ids to the first entry collected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceMap {
    entries: Vec<SourceMapEntry>,
    #[serde(skip)]
    by_id: HashMap<NodeId, usize>,
}

impl SourceMap {
    /// Builds a source map from entries in collection order.
    pub fn new(entries: Vec<SourceMapEntry>) -> Self {
        let mut by_id = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if let Entry::Vacant(slot) = by_id.entry(entry.id) {
                slot.insert(index);
            }
        }
        Self { entries, by_id }
    }

    /// Looks up the entry for `id`.
    pub fn get(&self, id: NodeId) -> Option<&SourceMapEntry> {
        self.by_id.get(&id).map(|&index| &self.entries[index])
    }

    /// Looks up the span for `id`.
    pub fn span_of(&self, id: NodeId) -> Option<SourceSpan> {
        self.get(id).map(|entry| entry.span)
    }

    /// All entries, duplicates included.
    pub fn entries(&self) -> &[SourceMapEntry] {
        &self.entries
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<SourceMapEntry> for SourceMap {
    fn from_iter<I: IntoIterator<Item = SourceMapEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
