//! Character alignment between a node's value and its raw source.
//!
//! The grammar engine decodes escapes and entities and drops line
//! continuation prefixes, so a text node's value is not always a verbatim
//! slice of its source span. [`align_to_source`] recovers, for each value
//! character, the source range that produced it.

use jitmark_ast::{SourceIndex, SourceSpan};

/// Raw characters that may appear in source between value characters
/// without producing anything (line endings, indentation, quote markers).
fn is_skippable(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '>')
}

/// Maximum characters searched ahead when realigning after a mismatch.
const RESYNC_WINDOW: usize = 16;

/// Maximum length of an entity reference such as `&CounterClockwiseContourIntegral;`.
const MAX_ENTITY_LEN: usize = 33;

/// Returns, for each `char` of `value`, the source range it came from.
///
/// `index` must be built over `source`. `None` marks characters with no
/// locatable origin. When the span is out of bounds every character is `None`.
pub fn align_to_source(
    value: &str,
    source: &str,
    index: &SourceIndex,
    span: SourceSpan,
) -> Vec<Option<SourceSpan>> {
    let Some(raw) = index.slice(source, span) else {
        return vec![None; value.chars().count()];
    };

    let mut out = Vec::with_capacity(value.len());
    // Byte and char position of the cursor inside `raw`.
    let mut cursor = 0usize;
    let mut cursor_chars = span.start;

    for (offset, c) in value.char_indices() {
        let rest = &raw[cursor..];
        let value_rest = &value[offset..];

        match locate(rest, value_rest, c) {
            Some((matched_start, matched_end)) => {
                let start = cursor_chars + rest[..matched_start].chars().count();
                let end = start + rest[matched_start..matched_end].chars().count();
                out.push(Some(SourceSpan::new(start, end)));
                cursor += matched_end;
                cursor_chars = end;
            }
            None => out.push(None),
        }
    }

    out
}

/// Finds `c` at the head of `rest`, returning the matched byte range.
fn locate(rest: &str, value_rest: &str, c: char) -> Option<(usize, usize)> {
    if let Some(found) = match_at(rest, value_rest, c) {
        return Some(found);
    }

    let skipped = rest.len() - rest.trim_start_matches(is_skippable).len();
    if skipped > 0 {
        if let Some((start, end)) = match_at(&rest[skipped..], value_rest, c) {
            return Some((skipped + start, skipped + end));
        }
    }

    rest.char_indices()
        .take(RESYNC_WINDOW)
        .find(|(_, ch)| *ch == c)
        .map(|(offset, _)| (offset, offset + c.len_utf8()))
}

fn match_at(rest: &str, value_rest: &str, c: char) -> Option<(usize, usize)> {
    if rest.starts_with('&') {
        if let Some(len) = entity_len(rest) {
            if !value_rest.starts_with(&rest[..len]) {
                return Some((0, len));
            }
        }
    }

    if rest.starts_with(c) {
        return Some((0, c.len_utf8()));
    }

    let mut chars = rest.chars();
    if chars.next() == Some('\\') && c.is_ascii_punctuation() && chars.next() == Some(c) {
        return Some((1, 2));
    }

    None
}

/// Length of a well-formed entity or character reference at the head of `rest`.
fn entity_len(rest: &str) -> Option<usize> {
    let (end, _) = rest
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|(_, ch)| *ch == ';')?;
    let body = &rest[1..end];

    let valid = if let Some(numeric) = body.strip_prefix('#') {
        match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()),
            None => !numeric.is_empty() && numeric.bytes().all(|b| b.is_ascii_digit()),
        }
    } else {
        !body.is_empty() && body.bytes().all(|b| b.is_ascii_alphanumeric())
    };

    valid.then_some(end + 1)
}
