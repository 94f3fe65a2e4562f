//! Font-free shaping backend: one glyph per extended grapheme cluster.

use jitmark_layout::{FontMetrics, FontWeight};
use unicode_segmentation::UnicodeSegmentation;

use crate::backend::{Direction, Glyph, ShapedRun, ShapingBackend};
use crate::font::FontKey;

/// Advance widths of a synthetic face, in ems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphemeFace {
    pub advance: f32,
    pub wide_advance: f32,
}

/// Deterministic backend for headless use and tests.
///
/// Every grapheme advances by a fixed fraction of the font size, wide East
/// Asian characters and emoji by a full em. Right-to-left runs are emitted
/// in visual order, rightmost logical cluster last.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphemeBackend {
    advance: f32,
}

impl GraphemeBackend {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }

    fn advances(&self, face: &GraphemeFace, text: &str, size: f32) -> Vec<(usize, f32)> {
        let mut char_index = 0;
        text.graphemes(true)
            .map(|grapheme| {
                let cluster = char_index;
                char_index += grapheme.chars().count();
                let em = if grapheme.chars().next().is_some_and(is_wide) {
                    face.wide_advance
                } else {
                    face.advance
                };
                (cluster, em * size)
            })
            .collect()
    }
}

impl Default for GraphemeBackend {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl ShapingBackend for GraphemeBackend {
    type Font = GraphemeFace;

    fn load_font(&self, key: &FontKey) -> GraphemeFace {
        let bold = match key.weight {
            FontWeight::Normal => 0.0,
            FontWeight::SemiBold => 0.025,
            FontWeight::Bold => 0.05,
        };
        GraphemeFace {
            advance: self.advance + bold,
            wide_advance: 1.0,
        }
    }

    fn shape(&self, face: &GraphemeFace, text: &str, size: f32, direction: Direction) -> ShapedRun {
        let advances = self.advances(face, text, size);
        let width: f32 = advances.iter().map(|(_, advance)| advance).sum();

        let mut x = 0.0;
        let glyphs = match direction {
            Direction::LeftToRight => advances
                .iter()
                .map(|&(cluster, advance)| {
                    let glyph = Glyph::new(cluster, x);
                    x += advance;
                    glyph
                })
                .collect(),
            Direction::RightToLeft => advances
                .iter()
                .rev()
                .map(|&(cluster, advance)| {
                    let glyph = Glyph::new(cluster, x);
                    x += advance;
                    glyph
                })
                .collect(),
        };

        ShapedRun { glyphs, width }
    }

    fn measure(&self, face: &GraphemeFace, text: &str, size: f32) -> f32 {
        self.advances(face, text, size)
            .iter()
            .map(|(_, advance)| advance)
            .sum()
    }

    fn metrics(&self, _: &GraphemeFace, size: f32) -> Option<FontMetrics> {
        Some(FontMetrics {
            ascent: size * 1.12,
            descent: size * 0.28,
        })
    }
}

fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA960..=0xA97F
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1F64F
            | 0x1F900..=0x1F9FF
            | 0x20000..=0x3FFFD
    )
}
