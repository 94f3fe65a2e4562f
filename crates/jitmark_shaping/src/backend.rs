//! Shaping backend capability.

use jitmark_layout::FontMetrics;
use serde::Serialize;

use crate::FontKey;

/// Base direction of a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn from_rtl(is_right_to_left: bool) -> Self {
        if is_right_to_left {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Direction::RightToLeft
    }

    /// Direction of the first strong character in `text`.
    ///
    /// Hebrew, Arabic, Syriac, Thaana, and N'Ko letters are right-to-left;
    /// any other alphabetic character is left-to-right. Text without a strong
    /// character is left-to-right.
    pub fn guess(text: &str) -> Self {
        for c in text.chars() {
            if is_rtl_char(c) {
                return Direction::RightToLeft;
            }
            if c.is_alphabetic() {
                return Direction::LeftToRight;
            }
        }
        Direction::LeftToRight
    }
}

fn is_rtl_char(c: char) -> bool {
    matches!(
        c as u32,
        0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF | 0x10800..=0x10FFF | 0x1E800..=0x1EFFF
    )
}

/// One positioned glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Char index of the first character of the glyph's cluster.
    pub cluster: usize,
    /// Left edge of the glyph, relative to the run origin.
    pub x: f32,
}

impl Glyph {
    pub fn new(cluster: usize, x: f32) -> Self {
        Self { cluster, x }
    }
}

/// Backend output for one run. Glyphs may be in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRun {
    pub glyphs: Vec<Glyph>,
    pub width: f32,
}

/// Turns text into positioned glyphs.
///
/// `Font` is the backend's loaded face; the shaper keeps one per [`FontKey`]
/// in its [`FontCache`](crate::FontCache).
pub trait ShapingBackend: Send + Sync {
    type Font: Send + Sync;

    fn load_font(&self, key: &FontKey) -> Self::Font;

    fn shape(&self, font: &Self::Font, text: &str, size: f32, direction: Direction) -> ShapedRun;

    /// Advance width of `text` without shaping.
    fn measure(&self, font: &Self::Font, text: &str, size: f32) -> f32;

    /// Vertical metrics, `None` if the face has none.
    fn metrics(&self, font: &Self::Font, size: f32) -> Option<FontMetrics>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", Direction::LeftToRight)]
    #[case("שלום", Direction::RightToLeft)]
    #[case("مرحبا", Direction::RightToLeft)]
    #[case("123 שלום", Direction::RightToLeft)]
    #[case("abc שלום", Direction::LeftToRight)]
    #[case("ܫܠܡܐ", Direction::RightToLeft)]
    #[case("ދިވެހި", Direction::RightToLeft)]
    #[case("ߒߞߏ", Direction::RightToLeft)]
    #[case("", Direction::LeftToRight)]
    #[case("42!", Direction::LeftToRight)]
    fn test_guess(#[case] text: &str, #[case] expected: Direction) {
        assert_eq!(Direction::guess(text), expected);
    }
}
