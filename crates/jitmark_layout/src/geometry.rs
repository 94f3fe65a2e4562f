//! Rectangles, sizes, and sanitization of degenerate numeric input.
//!
//! Every rectangle the layout produces goes through [`RectF::new`], which
//! never lets NaN or infinity into output geometry.

use serde::Serialize;

/// Upper bound for any width, height, or metric fed into layout.
pub const MAX_EXTENT: f32 = 1.0e6;

/// Upper bound for the display scale factor.
pub const MAX_SCALE: f32 = 16.0;

/// Upper bound for font sizes.
pub const MAX_FONT_SIZE: f32 = 1024.0;

/// Font size used when a style carries a degenerate one.
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// A size in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const EMPTY: SizeF = SizeF {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }
}

/// An axis-aligned rectangle in layout units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub const EMPTY: RectF = RectF {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a rectangle, replacing non-finite coordinates with `0` and
    /// non-finite or negative extents with `0`.
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> SizeF {
        SizeF::new(self.width, self.height)
    }

    /// Strict intersection: rectangles that only share an edge do not
    /// intersect.
    pub fn intersects(&self, other: &RectF) -> bool {
        other.right() > self.x
            && other.x < self.right()
            && other.bottom() > self.y
            && other.y < self.bottom()
    }

    /// Area shared by both rectangles, `0` when they are disjoint.
    pub fn intersection_area(&self, other: &RectF) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 { w * h } else { 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[inline]
pub(crate) fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

#[inline]
pub(crate) fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Sanitizes a layout width: non-finite or negative becomes `0`.
pub fn sanitize_width(width: f32) -> f32 {
    non_negative(width).min(MAX_EXTENT)
}

/// Sanitizes a display scale: non-finite or non-positive becomes `1`.
pub fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale.min(MAX_SCALE)
    } else {
        1.0
    }
}

/// Sanitizes a theme metric: non-finite becomes `nominal`, negative becomes `0`.
pub fn sanitize_metric(value: f32, nominal: f32) -> f32 {
    if !value.is_finite() {
        nominal
    } else {
        value.clamp(0.0, MAX_EXTENT)
    }
}

/// Sanitizes a font size: non-finite or non-positive becomes the default.
pub fn sanitize_font_size(size: f32) -> f32 {
    if size.is_finite() && size > 0.0 {
        size.min(MAX_FONT_SIZE)
    } else {
        DEFAULT_FONT_SIZE
    }
}

/// Sanitizes a measured extent, substituting `fallback` when degenerate.
pub(crate) fn sanitize_extent(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value.min(MAX_EXTENT)
    } else {
        fallback
    }
}
