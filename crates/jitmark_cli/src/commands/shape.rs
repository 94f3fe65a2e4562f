//! Shape command implementation

use jitmark_core::MarkdownEngine;
use jitmark_shaping::{GraphemeBackend, TextShaper};
use miette::Result;

use crate::cli::OutputFormat;
use crate::output;

pub fn run_shape(
    engine: &MarkdownEngine,
    text: &str,
    size: Option<f32>,
    scale: f32,
    rtl: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut style = engine.theme().typography.paragraph.clone();
    if let Some(size) = size {
        style = style.with_font_size(size);
    }

    let shaper = TextShaper::new(GraphemeBackend::default());
    let result = if rtl {
        shaper.shape(text, &style, scale, true)
    } else {
        shaper.shape_auto(text, &style, scale)
    };

    match format {
        OutputFormat::Json => output::json::print_value(&result),
        OutputFormat::Text => {
            output::text::print_shaping(&result);
            Ok(())
        }
    }
}
