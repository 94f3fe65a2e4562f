//! Task list item detection.

use jitmark_ast::SourceSpan;

/// Detects a `[ ]` / `[x]` / `[X]` marker in a list item's source.
///
/// Looks only at the first `[` in the item, wherever it is, and returns
/// `(is_task, is_checked)`. Empty or out-of-bounds spans are never tasks.
pub fn detect_task_state(source: &str, span: SourceSpan) -> (bool, Option<bool>) {
    span.slice(source).map_or((false, None), task_state_of)
}

/// Task marker state of one list item's raw source text.
pub(crate) fn task_state_of(text: &str) -> (bool, Option<bool>) {
    let bytes = text.as_bytes();
    let Some(idx) = text.find('[') else {
        return (false, None);
    };
    if idx + 2 >= bytes.len() || bytes[idx + 2] != b']' {
        return (false, None);
    }

    match bytes[idx + 1] {
        b' ' => (true, Some(false)),
        b'x' | b'X' => (true, Some(true)),
        _ => (false, None),
    }
}
