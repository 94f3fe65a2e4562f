//! Text shaper: run geometry and caret positions.

use std::sync::Arc;

use jitmark_layout::{
    FontMetrics, RunMeasurement, TextMeasurement, TextMeasurer, TextStyle, fallback_line_height,
    sanitize_font_size, sanitize_scale,
};
use serde::Serialize;
use tracing::trace;

use crate::backend::{Direction, ShapingBackend};
use crate::caret::build_caret_x;
use crate::font::{FontCache, FontKey};

/// Geometry of one shaped run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapingResult {
    pub width: f32,
    pub height: f32,
    /// Caret x per logical char offset, `len + 1` entries; empty for empty
    /// text. Non-decreasing even for right-to-left runs; mapping to visual
    /// order is left to hit-testing.
    pub caret_x: Vec<f32>,
    pub is_rtl: bool,
}

impl From<ShapingResult> for RunMeasurement {
    fn from(result: ShapingResult) -> Self {
        RunMeasurement {
            width: result.width,
            height: result.height,
            caret_x: result.caret_x,
            is_rtl: result.is_rtl,
        }
    }
}

/// Shapes runs through a [`ShapingBackend`], caching its fonts.
///
/// Also a [`TextMeasurer`], so the same shaper drives layout.
pub struct TextShaper<B: ShapingBackend> {
    backend: B,
    fonts: Arc<FontCache<B::Font>>,
}

impl<B: ShapingBackend> TextShaper<B> {
    /// Creates a shaper with its own font cache.
    pub fn new(backend: B) -> Self {
        Self::with_cache(backend, Arc::new(FontCache::new()))
    }

    /// Creates a shaper sharing `fonts` with other shapers.
    pub fn with_cache(backend: B, fonts: Arc<FontCache<B::Font>>) -> Self {
        Self { backend, fonts }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn font_cache(&self) -> &Arc<FontCache<B::Font>> {
        &self.fonts
    }

    fn font(&self, style: &TextStyle) -> Arc<B::Font> {
        self.fonts
            .get_or_insert_with(&FontKey::from(style), |key| self.backend.load_font(key))
    }

    fn font_size(style: &TextStyle, scale: f32) -> f32 {
        sanitize_font_size(style.font_size) * sanitize_scale(scale)
    }

    fn face_line_height(&self, font: &B::Font, style: &TextStyle, scale: f32) -> f32 {
        self.backend
            .metrics(font, Self::font_size(style, scale))
            .map(|m| m.line_height())
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or_else(|| fallback_line_height(style, scale))
    }

    /// Paint-measured width, never below the shaped width.
    fn run_width(&self, font: &B::Font, text: &str, size: f32, shaped_width: f32) -> f32 {
        let measured = self.backend.measure(font, text, size);
        let width = finite_non_negative(shaped_width).max(finite_non_negative(measured));
        if width != shaped_width {
            trace!("Run width {} widened to {}", shaped_width, width);
        }
        width
    }

    /// Shapes `text` and computes caret positions per logical char offset.
    pub fn shape(
        &self,
        text: &str,
        style: &TextStyle,
        scale: f32,
        is_right_to_left: bool,
    ) -> ShapingResult {
        let font = self.font(style);
        let height = self.face_line_height(&font, style, scale);
        if text.is_empty() {
            return ShapingResult {
                width: 0.0,
                height,
                caret_x: Vec::new(),
                is_rtl: is_right_to_left,
            };
        }

        let size = Self::font_size(style, scale);
        let shaped = self
            .backend
            .shape(&font, text, size, Direction::from_rtl(is_right_to_left));
        let width = self.run_width(&font, text, size, shaped.width);
        let caret_x = build_caret_x(text.chars().count(), &shaped.glyphs, width);

        ShapingResult {
            width,
            height,
            caret_x,
            is_rtl: is_right_to_left,
        }
    }

    /// Shapes `text` in the direction guessed from its first strong character.
    pub fn shape_auto(&self, text: &str, style: &TextStyle, scale: f32) -> ShapingResult {
        self.shape(text, style, scale, Direction::guess(text).is_rtl())
    }
}

impl<B: ShapingBackend> TextMeasurer for TextShaper<B> {
    fn measure(&self, text: &str, style: &TextStyle, scale: f32) -> TextMeasurement {
        let font = self.font(style);
        let height = self.face_line_height(&font, style, scale);
        if text.is_empty() {
            return TextMeasurement::new(0.0, height);
        }

        let size = Self::font_size(style, scale);
        let shaped = self
            .backend
            .shape(&font, text, size, Direction::guess(text));
        TextMeasurement::new(self.run_width(&font, text, size, shaped.width), height)
    }

    fn line_height(&self, style: &TextStyle, scale: f32) -> f32 {
        let font = self.font(style);
        self.face_line_height(&font, style, scale)
    }

    fn measure_run(&self, text: &str, style: &TextStyle, scale: f32) -> RunMeasurement {
        self.shape_auto(text, style, scale).into()
    }

    fn font_metrics(&self, style: &TextStyle, scale: f32) -> FontMetrics {
        let font = self.font(style);
        match self.backend.metrics(&font, Self::font_size(style, scale)) {
            Some(m) if m.ascent.is_finite() && m.descent.is_finite() && m.line_height() > 0.0 => {
                FontMetrics {
                    ascent: m.ascent.max(0.0),
                    descent: m.descent.max(0.0),
                }
            }
            _ => FontMetrics::from_line_height(fallback_line_height(style, scale)),
        }
    }
}

impl<B: ShapingBackend + std::fmt::Debug> std::fmt::Debug for TextShaper<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextShaper")
            .field("backend", &self.backend)
            .field("fonts", &self.fonts.len())
            .finish()
    }
}

fn finite_non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Glyph, GraphemeBackend, ShapedRun};
    use jitmark_layout::{ColorRgba, FontWeight};
    use pretty_assertions::assert_eq;

    fn style() -> TextStyle {
        TextStyle::new(ColorRgba::BLACK).with_font_size(10.0)
    }

    /// Reports every glyph at x = 0 with a short shaped width.
    struct CollapsedBackend;

    impl ShapingBackend for CollapsedBackend {
        type Font = ();

        fn load_font(&self, _: &FontKey) -> Self::Font {}

        fn shape(&self, _: &(), text: &str, _: f32, _: Direction) -> ShapedRun {
            ShapedRun {
                glyphs: (0..text.chars().count()).map(|c| Glyph::new(c, 0.0)).collect(),
                width: 1.0,
            }
        }

        fn measure(&self, _: &(), text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size
        }

        fn metrics(&self, _: &(), _: f32) -> Option<FontMetrics> {
            None
        }
    }

    #[test]
    fn test_empty_text() {
        let shaper = TextShaper::new(GraphemeBackend::default());
        let result = shaper.shape("", &style(), 1.0, false);
        assert_eq!(result.width, 0.0);
        assert!(result.caret_x.is_empty());
        assert_eq!(result.height, shaper.line_height(&style(), 1.0));
        assert!(result.height > 0.0);
    }

    #[test]
    fn test_caret_per_char() {
        let shaper = TextShaper::new(GraphemeBackend::default());
        let result = shaper.shape("abc", &style(), 1.0, false);
        assert_eq!(result.caret_x.len(), 4);
        assert_eq!(result.caret_x, vec![0.0, 6.0, 12.0, 18.0]);
        assert_eq!(result.width, 18.0);
        assert!(!result.is_rtl);
    }

    #[test]
    fn test_width_never_below_measured() {
        let shaper = TextShaper::new(CollapsedBackend);
        let result = shaper.shape("abcd", &style(), 1.0, false);
        assert_eq!(result.width, 40.0);
        assert_eq!(result.caret_x.len(), 5);
        assert_eq!(result.caret_x[4], 40.0);
        assert!(result.caret_x.windows(2).all(|p| p[0] <= p[1]));
    }

    #[test]
    fn test_rtl_logical_indexing() {
        let shaper = TextShaper::new(GraphemeBackend::default());
        let result = shaper.shape_auto("שלום", &style(), 1.0);
        assert!(result.is_rtl);
        assert_eq!(result.caret_x.len(), 5);
        assert!(result.caret_x.windows(2).all(|p| p[0] <= p[1]));
        assert!(result.caret_x[4] >= result.width);
    }

    #[test]
    fn test_combining_marks_share_a_cluster() {
        let shaper = TextShaper::new(GraphemeBackend::default());
        // "e" + combining acute is one grapheme over two chars.
        let result = shaper.shape("e\u{301}x", &style(), 1.0, false);
        assert_eq!(result.caret_x, vec![0.0, 3.0, 6.0, 12.0]);
    }

    #[test]
    fn test_measure_run_uses_shaped_carets() {
        let shaper = TextShaper::new(GraphemeBackend::default());
        let run = shaper.measure_run("e\u{301}x", &style(), 1.0);
        assert_eq!(run.caret_x, vec![0.0, 3.0, 6.0, 12.0]);
        assert_eq!(run.width, shaper.measure("e\u{301}x", &style(), 1.0).width);
        assert!(!run.is_rtl);
        assert!(shaper.measure_run("שלום", &style(), 1.0).is_rtl);
    }

    #[test]
    fn test_fonts_are_cached_per_face() {
        let shaper = TextShaper::new(GraphemeBackend::default());
        shaper.measure("a", &style(), 1.0);
        shaper.measure("b", &style().with_font_size(30.0), 2.0);
        assert_eq!(shaper.font_cache().len(), 1);

        shaper.measure("c", &style().with_weight(FontWeight::Bold), 1.0);
        assert_eq!(shaper.font_cache().len(), 2);
    }

    #[test]
    fn test_shared_cache() {
        let cache = Arc::new(FontCache::new());
        let a = TextShaper::with_cache(GraphemeBackend::default(), Arc::clone(&cache));
        let b = TextShaper::with_cache(GraphemeBackend::default(), Arc::clone(&cache));
        a.line_height(&style(), 1.0);
        b.line_height(&style(), 1.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_font_metrics_fallback() {
        let shaper = TextShaper::new(CollapsedBackend);
        let metrics = shaper.font_metrics(&style(), 1.0);
        assert!((metrics.ascent - 11.2).abs() < 1e-4);
        assert!((metrics.descent - 2.8).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_scale() {
        let shaper = TextShaper::new(GraphemeBackend::default());
        for scale in [f32::NAN, f32::INFINITY, -1.0, 0.0] {
            let result = shaper.shape("abc", &style(), scale, false);
            assert!(result.width.is_finite() && result.height.is_finite());
            assert!(result.caret_x.iter().all(|x| x.is_finite()));
        }
    }
}
