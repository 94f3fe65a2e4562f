//! # jitmark_layout
//!
//! Virtualizable block layout for jitmark documents.
//!
//! [`layout`] turns a parsed [`Document`](jitmark_ast::Document) into a
//! [`MarkdownLayout`]: top-level blocks stacked vertically, each with its
//! lines and runs measured through a [`TextMeasurer`]. Renderers and
//! accessibility layers query only what is on screen with
//! [`MarkdownLayout::visible_block_indices`]. A [`LineIndex`] over the layout
//! answers pointer hit tests and turns a [`SelectionRange`] into highlight
//! rectangles and a source span.
//!
//! Degenerate numbers (NaN, infinities, negative sizes) in width, scale, theme
//! metrics, or measurements are sanitized at the boundary; output geometry is
//! always finite.

mod engine;
mod geometry;
mod inline;
mod measure;
mod selection;
mod style;
mod theme;
mod tree;

pub use engine::layout;
pub use geometry::{
    DEFAULT_FONT_SIZE, MAX_EXTENT, MAX_FONT_SIZE, MAX_SCALE, RectF, SizeF, sanitize_font_size,
    sanitize_metric, sanitize_scale, sanitize_width,
};
pub use measure::{
    FixedAdvanceMeasurer, FontMetrics, RunMeasurement, TextMeasurement, TextMeasurer,
    even_caret_x, fallback_line_height,
};
pub use selection::{HitTestResult, LineIndex, SelectionRange, caret_offset_at, caret_x_at};
pub use style::{BlockStyle, resolve_block_style};
pub use theme::{ColorRgba, Colors, FontWeight, Metrics, TextStyle, Theme, ThemePreset, Typography};
pub use tree::{
    BlockLayout, BlockQuoteLayout, CodeBlockLayout, HeadingLayout, InlineRunLayout, LineLayout,
    ListItemLayout, ListLayout, MarkdownLayout, OpaqueBlockLayout, ParagraphLayout,
    TableCellLayout, TableLayout, TableRowLayout, ThematicBreakLayout,
};
