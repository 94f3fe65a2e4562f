//! Caret geometry from shaped glyphs.

use std::collections::BTreeMap;

pub use jitmark_layout::even_caret_x;

use crate::Glyph;

/// Builds caret x positions for a run of `text_len` chars.
///
/// The result has `text_len + 1` entries indexed by logical char offset;
/// entry `i` is the caret before char `i` and the last entry is the end of
/// the run. Entries are non-decreasing and the last one is at least `width`,
/// so callers can binary-search them. Characters of a multi-char cluster get
/// evenly spaced carets across the cluster.
///
/// An empty run yields an empty array. Missing or unusable glyph data falls
/// back to evenly spaced carets across `width`.
pub fn build_caret_x(text_len: usize, glyphs: &[Glyph], width: f32) -> Vec<f32> {
    if text_len == 0 {
        return Vec::new();
    }
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };

    let mut visual: Vec<Glyph> = glyphs.iter().copied().filter(|g| g.x.is_finite()).collect();
    if visual.is_empty() {
        return even_caret_x(text_len, width);
    }
    // Backends may emit glyphs out of visual order.
    visual.sort_by(|a, b| a.x.total_cmp(&b.x));

    // cluster -> (start_x, end_x)
    let mut clusters: BTreeMap<usize, (f32, f32)> = BTreeMap::new();
    for (i, glyph) in visual.iter().enumerate() {
        let next_x = visual.get(i + 1).map_or(width, |next| next.x);
        let end_x = next_x.max(glyph.x);
        clusters
            .entry(glyph.cluster)
            .and_modify(|(start, end)| {
                *start = start.min(glyph.x);
                *end = end.max(end_x);
            })
            .or_insert((glyph.x, end_x));
    }
    clusters.retain(|&cluster, _| cluster <= text_len);
    if clusters.is_empty() {
        return even_caret_x(text_len, width);
    }

    if !clusters.contains_key(&0) {
        let max_end = clusters.values().map(|&(_, end)| end).fold(0.0, f32::max);
        clusters.insert(0, (0.0, max_end));
    }

    let mut caret = vec![0.0f32; text_len + 1];
    let starts: Vec<usize> = clusters.keys().copied().collect();
    for (i, &start_index) in starts.iter().enumerate() {
        let end_index = starts.get(i + 1).copied().unwrap_or(text_len).min(text_len);
        let (start_x, end_x) = clusters[&start_index];
        let steps = (end_index - start_index).max(1) as f32;

        for (offset, slot) in caret[start_index..=end_index].iter_mut().enumerate() {
            *slot = start_x + (end_x - start_x) * (offset as f32 / steps);
        }
    }

    make_monotonic(&mut caret);
    if let Some(last) = caret.last_mut() {
        *last = last.max(width);
    }
    caret
}

/// Clamps every entry up to its predecessor.
fn make_monotonic(caret: &mut [f32]) {
    for i in 1..caret.len() {
        if caret[i] < caret[i - 1] {
            caret[i] = caret[i - 1];
        }
    }
}
