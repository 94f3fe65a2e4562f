//! Text measurement capability.

use serde::Serialize;

use crate::geometry::{sanitize_font_size, sanitize_scale};
use crate::theme::TextStyle;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TextMeasurement {
    pub width: f32,
    pub height: f32,
}

impl TextMeasurement {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Measurement of one run with its caret stops.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunMeasurement {
    pub width: f32,
    pub height: f32,
    /// Distance from the run's logical start to the caret before each char,
    /// then to its end: `len + 1` non-decreasing entries, empty for empty
    /// text.
    pub caret_x: Vec<f32>,
    pub is_rtl: bool,
}

/// Vertical font metrics, both positive distances from the baseline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FontMetrics {
    pub ascent: f32,
    pub descent: f32,
}

impl FontMetrics {
    /// Splits a line height 80/20 between ascent and descent.
    pub fn from_line_height(line_height: f32) -> Self {
        Self {
            ascent: line_height * 0.8,
            descent: line_height * 0.2,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Measures text for layout.
///
/// Implementations may return degenerate values; the layout engine sanitizes
/// every measurement before it reaches geometry.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, scale: f32) -> TextMeasurement;

    fn line_height(&self, style: &TextStyle, scale: f32) -> f32;

    /// Measures a run and places its carets.
    ///
    /// The default spreads the carets evenly across the measured width;
    /// shaping measurers override it with real cluster geometry.
    fn measure_run(&self, text: &str, style: &TextStyle, scale: f32) -> RunMeasurement {
        let m = self.measure(text, style, scale);
        RunMeasurement {
            width: m.width,
            height: m.height,
            caret_x: even_caret_x(text.chars().count(), m.width),
            is_rtl: false,
        }
    }

    fn font_metrics(&self, style: &TextStyle, scale: f32) -> FontMetrics {
        let line_height = self.line_height(style, scale);
        if line_height.is_finite() && line_height > 0.0 {
            FontMetrics::from_line_height(line_height)
        } else {
            FontMetrics::from_line_height(fallback_line_height(style, scale))
        }
    }
}

/// `text_len + 1` carets evenly spaced across `width`.
pub fn even_caret_x(text_len: usize, width: f32) -> Vec<f32> {
    if text_len == 0 {
        return Vec::new();
    }
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    (0..=text_len)
        .map(|i| width * (i as f32 / text_len as f32))
        .collect()
}

/// Line height used when a measurer has no usable font metrics.
pub fn fallback_line_height(style: &TextStyle, scale: f32) -> f32 {
    (sanitize_font_size(style.font_size) * 1.4 * sanitize_scale(scale)).max(1.0)
}

/// Measures every character as a fixed fraction of the font size.
///
/// Font-free and deterministic; useful for tests and headless layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasurer {
    advance: f32,
}

impl FixedAdvanceMeasurer {
    /// `advance` is the width of one character in ems.
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, style: &TextStyle, scale: f32) -> TextMeasurement {
        let chars = text.chars().count() as f32;
        TextMeasurement::new(
            chars * style.font_size * self.advance * scale,
            self.line_height(style, scale),
        )
    }

    fn line_height(&self, style: &TextStyle, scale: f32) -> f32 {
        fallback_line_height(style, scale)
    }
}
