//! Theme: typography, colors, and metrics.
//!
//! A theme is a plain value. Layout works on a sanitized copy, so a theme
//! with NaN or negative metrics is accepted and never reaches geometry.

use serde::{Deserialize, Serialize};

use crate::geometry::{sanitize_font_size, sanitize_metric};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorRgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorRgba {
    pub const BLACK: ColorRgba = ColorRgba::from_rgb(0, 0, 0);
    pub const WHITE: ColorRgba = ColorRgba::from_rgb(255, 255, 255);
    pub const TRANSPARENT: ColorRgba = ColorRgba::from_argb(0, 0, 0, 0);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontWeight {
    #[default]
    Normal,
    SemiBold,
    Bold,
}

impl FontWeight {
    /// CSS-style numeric weight.
    pub fn value(self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 700,
        }
    }
}

/// Text appearance for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    /// `None` selects the platform default family.
    pub font_family: Option<String>,
    pub font_size: f32,
    pub weight: FontWeight,
    pub italic: bool,
    pub underline: bool,
    pub foreground: ColorRgba,
}

impl TextStyle {
    /// 16pt regular text in the platform default family.
    pub fn new(foreground: ColorRgba) -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            weight: FontWeight::Normal,
            italic: false,
            underline: false,
            foreground,
        }
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_foreground(mut self, foreground: ColorRgba) -> Self {
        self.foreground = foreground;
        self
    }

    pub fn sanitized(&self) -> Self {
        Self {
            font_size: sanitize_font_size(self.font_size),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Typography {
    pub paragraph: TextStyle,
    pub heading1: TextStyle,
    pub heading2: TextStyle,
    pub heading3: TextStyle,
    pub heading4: TextStyle,
    pub heading5: TextStyle,
    pub heading6: TextStyle,
    pub inline_code: TextStyle,
    pub link: TextStyle,
}

impl Typography {
    fn with_colors(body: ColorRgba, heading: ColorRgba, link: ColorRgba) -> Self {
        let heading_style = |size: f32, weight: FontWeight| {
            TextStyle::new(heading)
                .with_font_size(size)
                .with_weight(weight)
        };

        Self {
            paragraph: TextStyle::new(body),
            heading1: heading_style(28.0, FontWeight::Bold),
            heading2: heading_style(24.0, FontWeight::Bold),
            heading3: heading_style(20.0, FontWeight::SemiBold),
            heading4: heading_style(18.0, FontWeight::SemiBold),
            heading5: heading_style(16.0, FontWeight::SemiBold),
            heading6: heading_style(16.0, FontWeight::SemiBold),
            inline_code: TextStyle::new(body)
                .with_font_family("Consolas")
                .with_font_size(14.0),
            link: TextStyle::new(link).with_underline(true),
        }
    }

    /// Heading style for `level`; levels above 6 use the level 6 style.
    pub fn heading(&self, level: u8) -> &TextStyle {
        match level {
            0 | 1 => &self.heading1,
            2 => &self.heading2,
            3 => &self.heading3,
            4 => &self.heading4,
            5 => &self.heading5,
            _ => &self.heading6,
        }
    }

    fn sanitized(&self) -> Self {
        Self {
            paragraph: self.paragraph.sanitized(),
            heading1: self.heading1.sanitized(),
            heading2: self.heading2.sanitized(),
            heading3: self.heading3.sanitized(),
            heading4: self.heading4.sanitized(),
            heading5: self.heading5.sanitized(),
            heading6: self.heading6.sanitized(),
            inline_code: self.inline_code.sanitized(),
            link: self.link.sanitized(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Colors {
    pub page_background: ColorRgba,
    pub inline_code_background: ColorRgba,
    pub code_block_background: ColorRgba,
    pub quote_background: ColorRgba,
    pub thematic_break: ColorRgba,
}

/// Spacing and radii in unscaled layout units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub corner_radius: f32,
    pub inline_code_corner_radius: f32,
    pub inline_code_padding: f32,
    pub block_spacing: f32,
    pub block_padding: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            corner_radius: 8.0,
            inline_code_corner_radius: 6.0,
            inline_code_padding: 3.0,
            block_spacing: 12.0,
            block_padding: 12.0,
        }
    }
}

impl Metrics {
    /// Replaces non-finite metrics with their nominal value and clamps
    /// negative ones to `0`.
    pub fn sanitized(&self) -> Self {
        let nominal = Self::default();
        Self {
            corner_radius: sanitize_metric(self.corner_radius, nominal.corner_radius),
            inline_code_corner_radius: sanitize_metric(
                self.inline_code_corner_radius,
                nominal.inline_code_corner_radius,
            ),
            inline_code_padding: sanitize_metric(
                self.inline_code_padding,
                nominal.inline_code_padding,
            ),
            block_spacing: sanitize_metric(self.block_spacing, nominal.block_spacing),
            block_padding: sanitize_metric(self.block_padding, nominal.block_padding),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub typography: Typography,
    pub colors: Colors,
    pub metrics: Metrics,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            typography: Typography::with_colors(
                ColorRgba::BLACK,
                ColorRgba::BLACK,
                ColorRgba::from_rgb(0, 102, 204),
            ),
            colors: Colors {
                page_background: ColorRgba::WHITE,
                inline_code_background: ColorRgba::from_rgb(245, 245, 245),
                code_block_background: ColorRgba::from_rgb(245, 245, 245),
                quote_background: ColorRgba::from_rgb(250, 250, 250),
                thematic_break: ColorRgba::from_rgb(220, 220, 220),
            },
            metrics: Metrics::default(),
        }
    }

    pub fn dark() -> Self {
        Self {
            typography: Typography::with_colors(
                ColorRgba::from_rgb(235, 235, 235),
                ColorRgba::from_rgb(245, 245, 245),
                ColorRgba::from_rgb(110, 170, 255),
            ),
            colors: Colors {
                page_background: ColorRgba::from_rgb(20, 20, 20),
                inline_code_background: ColorRgba::from_rgb(35, 35, 35),
                code_block_background: ColorRgba::from_rgb(35, 35, 35),
                quote_background: ColorRgba::from_rgb(30, 30, 30),
                thematic_break: ColorRgba::from_rgb(70, 70, 70),
            },
            metrics: Metrics::default(),
        }
    }

    pub fn high_contrast() -> Self {
        let white = |size: f32| {
            TextStyle::new(ColorRgba::WHITE)
                .with_font_size(size)
                .with_weight(FontWeight::Bold)
        };

        Self {
            typography: Typography {
                paragraph: white(18.0),
                heading1: white(30.0),
                heading2: white(26.0),
                heading3: white(22.0),
                heading4: white(20.0),
                heading5: white(18.0),
                heading6: white(18.0),
                inline_code: white(16.0).with_font_family("Consolas"),
                link: TextStyle::new(ColorRgba::WHITE).with_underline(true),
            },
            colors: Colors {
                page_background: ColorRgba::BLACK,
                inline_code_background: ColorRgba::BLACK,
                code_block_background: ColorRgba::BLACK,
                quote_background: ColorRgba::BLACK,
                thematic_break: ColorRgba::WHITE,
            },
            metrics: Metrics {
                corner_radius: 0.0,
                inline_code_corner_radius: 0.0,
                inline_code_padding: 0.0,
                ..Metrics::default()
            },
        }
    }

    /// Copy of the theme with every font size and metric made safe for layout.
    pub fn sanitized(&self) -> Self {
        Self {
            typography: self.typography.sanitized(),
            colors: self.colors.clone(),
            metrics: self.metrics.sanitized(),
        }
    }
}

/// Built-in theme selector, as named in configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    #[default]
    Light,
    Dark,
    HighContrast,
}

impl ThemePreset {
    pub fn theme(self) -> Theme {
        match self {
            ThemePreset::Light => Theme::light(),
            ThemePreset::Dark => Theme::dark(),
            ThemePreset::HighContrast => Theme::high_contrast(),
        }
    }
}
