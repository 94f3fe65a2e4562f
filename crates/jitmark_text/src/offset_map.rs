//! Mapping from rendered text back to source ranges.

use jitmark_ast::{InlineCode, InlineNode, SourceIndex, SourceSpan};
use serde::Serialize;
use tracing::trace;

use crate::SpanMappingPolicy;
use crate::align::align_to_source;

/// Source text and its char offset table.
struct Source<'a> {
    text: &'a str,
    index: &'a SourceIndex,
}

/// Flattened display text of an inline run with a source range per character.
///
/// Indices into the rendered text are `char` indices. A `None` entry marks a
/// synthetic character with no source origin, such as the `\n` of a line
/// break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextOffsetMap {
    rendered_text: String,
    rendered_to_source: Vec<Option<SourceSpan>>,
}

impl TextOffsetMap {
    /// Builds the map for a run of inlines, typically one paragraph's content.
    pub fn build_for_inlines(
        source: &str,
        inlines: &[InlineNode],
        policy: SpanMappingPolicy,
    ) -> Self {
        Self::build_with_index(source, &SourceIndex::new(source), inlines, policy)
    }

    /// Like [`build_for_inlines`](Self::build_for_inlines), reusing the
    /// document's char offset table.
    pub fn build_with_index(
        source: &str,
        index: &SourceIndex,
        inlines: &[InlineNode],
        policy: SpanMappingPolicy,
    ) -> Self {
        if policy == SpanMappingPolicy::NodeSpan {
            trace!("NodeSpan mapping is not supported yet, using inner content");
        }

        let mut map = Self::default();
        let cx = Source { text: source, index };
        for inline in inlines {
            map.append_inline(&cx, inline);
        }
        map
    }

    fn append_inline(&mut self, source: &Source<'_>, inline: &InlineNode) {
        match inline {
            InlineNode::Text(text) => {
                self.rendered_text.push_str(&text.text);
                self.rendered_to_source.extend(align_to_source(
                    &text.text,
                    source.text,
                    source.index,
                    text.span,
                ));
            }
            InlineNode::LineBreak(_) => {
                self.rendered_text.push('\n');
                self.rendered_to_source.push(None);
            }
            InlineNode::InlineCode(code) => self.append_inline_code(source, code),
            InlineNode::Emphasis(_)
            | InlineNode::Strong(_)
            | InlineNode::Strikethrough(_)
            | InlineNode::Link(_)
            | InlineNode::Image(_) => {
                for child in inline.children() {
                    self.append_inline(source, child);
                }
            }
        }
    }

    fn append_inline_code(&mut self, source: &Source<'_>, code: &InlineCode) {
        self.rendered_text.push_str(&code.code);

        let Some(raw) = source
            .index
            .slice(source.text, code.span)
            .filter(|raw| !raw.is_empty())
        else {
            self.rendered_to_source
                .extend(code.code.chars().map(|_| None));
            return;
        };

        match raw.find(code.code.as_str()).filter(|_| !code.code.is_empty()) {
            Some(found) => {
                let base = code.span.start + raw[..found].chars().count();
                self.rendered_to_source.extend(
                    (base..)
                        .take(code.code.chars().count())
                        .map(|start| Some(SourceSpan::new(start, start + 1))),
                );
            }
            None => {
                // Content differs from source (normalized line endings):
                // pin every character to the opening fence.
                let anchor = SourceSpan::new(code.span.start, code.span.start + 1);
                self.rendered_to_source
                    .extend(code.code.chars().map(|_| Some(anchor)));
            }
        }
    }

    /// The flattened display text.
    pub fn rendered_text(&self) -> &str {
        &self.rendered_text
    }

    /// Number of rendered characters.
    pub fn len(&self) -> usize {
        self.rendered_to_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rendered_to_source.is_empty()
    }

    /// Source range of the rendered character at `index`.
    pub fn source_span_at(&self, index: usize) -> Option<SourceSpan> {
        self.rendered_to_source.get(index).copied().flatten()
    }

    /// Source start offset of the rendered character at `index`.
    pub fn source_offset_at(&self, index: usize) -> Option<usize> {
        self.source_span_at(index).map(|span| span.start)
    }

    /// Per-character source ranges.
    pub fn entries(&self) -> &[Option<SourceSpan>] {
        &self.rendered_to_source
    }

    /// Maps a rendered `[start, start + length)` character range to source.
    ///
    /// The range is clamped to the rendered text. The result is the hull of
    /// every mapped character in the range; it may cover source that produced
    /// no rendered text (markup between two runs). Returns the empty span at
    /// zero when the range is empty or nothing in it is mapped.
    pub fn map_rendered_range_to_source_span(&self, start: usize, length: usize) -> SourceSpan {
        let len = self.rendered_to_source.len();
        if length == 0 || len == 0 {
            return SourceSpan::EMPTY;
        }

        let start = start.min(len);
        let end = start.saturating_add(length).min(len);

        self.rendered_to_source[start..end]
            .iter()
            .flatten()
            .copied()
            .reduce(|hull, span| hull.merge(&span))
            .unwrap_or(SourceSpan::EMPTY)
    }
}
