//! Runs inline recognizers over plain text runs.
//!
//! The grammar engine exposes no inline-parser hook, so recognizers run as a
//! pass over each text node before it is materialized. A text node is split
//! into text and link pieces; every piece's span is exact so the source map
//! stays faithful.

use jitmark_ast::{SourceIndex, SourceSpan};
use jitmark_plugin::{InlineMatch, InlineScan, PluginRegistry};
use jitmark_text::align_to_source;
use tracing::trace;

/// A piece of a split text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TextPiece {
    Text {
        value: String,
        span: SourceSpan,
    },
    Link {
        value: String,
        span: SourceSpan,
        url: String,
        title: Option<String>,
    },
}

/// Splits a text node at every recognized run.
///
/// Triggers only fire on characters written literally in the source: an
/// escaped (`\@`) or entity-encoded (`&#64;`) trigger is never enriched.
pub(crate) fn enrich_text(
    registry: &PluginRegistry,
    source: &str,
    index: &SourceIndex,
    value: &str,
    span: SourceSpan,
) -> Vec<TextPiece> {
    let whole = || {
        vec![TextPiece::Text {
            value: value.to_string(),
            span,
        }]
    };

    if registry.recognizers().is_empty() || !value.chars().any(|c| registry.is_trigger(c)) {
        return whole();
    }

    let aligned = align_to_source(value, source, index, span);
    let bytes = index.byte_range(span);
    let leading = source.get(..bytes.start).and_then(|s| s.chars().next_back());
    let trailing = source.get(bytes.end..).and_then(|s| s.chars().next());

    let mut pieces = Vec::new();
    let mut piece_value_start = 0usize;
    let mut piece_source_start = span.start;
    let mut resume_at = 0usize;

    for (char_index, (byte_index, c)) in value.char_indices().enumerate() {
        if byte_index < resume_at || !registry.is_trigger(c) {
            continue;
        }
        let Some(origin) = aligned.get(char_index).copied().flatten() else {
            continue;
        };
        if !is_literal(source, index, origin, c) {
            continue;
        }

        let scan = InlineScan::new(value, byte_index, leading, trailing);
        let Some(found) = recognize(registry, &scan, c) else {
            continue;
        };

        let matched = &value[byte_index..byte_index + found.len];
        let link_span = SourceSpan::new(origin.start, origin.start + matched.chars().count());
        if index.slice(source, link_span) != Some(matched) || link_span.end > span.end {
            trace!("Declining '{}': source does not match verbatim", matched);
            continue;
        }

        if byte_index > piece_value_start {
            pieces.push(TextPiece::Text {
                value: value[piece_value_start..byte_index].to_string(),
                span: SourceSpan::new(piece_source_start, link_span.start),
            });
        }
        pieces.push(TextPiece::Link {
            value: matched.to_string(),
            span: link_span,
            url: found.url,
            title: found.title,
        });

        resume_at = byte_index + found.len;
        piece_value_start = resume_at;
        piece_source_start = link_span.end;
    }

    if pieces.is_empty() {
        return whole();
    }
    if piece_value_start < value.len() {
        pieces.push(TextPiece::Text {
            value: value[piece_value_start..].to_string(),
            span: SourceSpan::new(piece_source_start, span.end),
        });
    }
    pieces
}

fn recognize(registry: &PluginRegistry, scan: &InlineScan<'_>, c: char) -> Option<InlineMatch> {
    registry
        .recognizers()
        .iter()
        .filter(|recognizer| recognizer.is_trigger(c))
        .filter_map(|recognizer| recognizer.recognize(scan))
        .find(|found| found.len > 0 && scan.rest().is_char_boundary(found.len))
}

/// True when `origin` holds exactly `c`, not escaped by a preceding backslash.
fn is_literal(source: &str, index: &SourceIndex, origin: SourceSpan, c: char) -> bool {
    let mut buf = [0u8; 4];
    index.slice(source, origin) == Some(c.encode_utf8(&mut buf))
        && !source[..index.byte_offset(origin.start)].ends_with('\\')
}
