//! # jitmark_shaping
//!
//! Text shaping and caret geometry for jitmark.
//!
//! [`TextShaper`] shapes runs through a pluggable [`ShapingBackend`] and
//! derives per-character caret positions with [`build_caret_x`]. Font
//! handles are kept in an injectable [`FontCache`] keyed by family, weight,
//! and italic.
//!
//! [`GraphemeBackend`] is a deterministic, font-free backend.
//!
//! ## Example
//!
//! ```rust
//! use jitmark_layout::{ColorRgba, TextStyle};
//! use jitmark_shaping::{GraphemeBackend, TextShaper};
//!
//! let shaper = TextShaper::new(GraphemeBackend::default());
//! let style = TextStyle::new(ColorRgba::BLACK);
//! let run = shaper.shape("caret", &style, 1.0, false);
//! assert_eq!(run.caret_x.len(), 6);
//! ```

mod backend;
mod caret;
mod font;
mod grapheme;
mod shaper;

pub use backend::{Direction, Glyph, ShapedRun, ShapingBackend};
pub use caret::{build_caret_x, even_caret_x};
pub use font::{FontCache, FontKey};
pub use grapheme::{GraphemeBackend, GraphemeFace};
pub use shaper::{ShapingResult, TextShaper};
