//! The parsed document model.

use serde::Serialize;

use crate::{BlockNode, Document, NodeId, SourceIndex, SourceMap, SourceSpan};

/// A parsed document: the source text, its node tree, and its source map.
///
/// Immutable once built; safe to share between threads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarkdownDocumentModel {
    source: String,
    #[serde(skip)]
    index: SourceIndex,
    document: Document,
    source_map: SourceMap,
}

impl MarkdownDocumentModel {
    pub fn new(source: String, document: Document, source_map: SourceMap) -> Self {
        let index = SourceIndex::new(&source);
        Self::with_index(source, index, document, source_map)
    }

    /// Creates a model reusing an index already built over `source`.
    pub fn with_index(
        source: String,
        index: SourceIndex,
        document: Document,
        source_map: SourceMap,
    ) -> Self {
        debug_assert_eq!(index.byte_len(), source.len());
        Self {
            source,
            index,
            document,
            source_map,
        }
    }

    /// A model with no source and no blocks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Top-level blocks in document order.
    pub fn blocks(&self) -> &[BlockNode] {
        &self.document.blocks
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Char offset table of the source.
    pub fn source_index(&self) -> &SourceIndex {
        &self.index
    }

    /// Slices `span` out of the source, if it is in bounds.
    pub fn slice(&self, span: SourceSpan) -> Option<&str> {
        self.index.slice(&self.source, span)
    }

    /// Source text of the node with `id`.
    pub fn source_of(&self, id: NodeId) -> Option<&str> {
        self.source_map.span_of(id).and_then(|span| self.slice(span))
    }
}
