//! Layout command implementation

use std::path::Path;

use jitmark_core::MarkdownEngine;
use jitmark_shaping::{GraphemeBackend, TextShaper};
use miette::Result;

use crate::cli::OutputFormat;
use crate::output;

/// Overrides for the configured layout and viewport.
#[derive(Debug, Clone, Copy)]
pub struct LayoutArgs {
    pub width: Option<f32>,
    pub scale: Option<f32>,
    pub top: f32,
    pub height: Option<f32>,
    pub overscan: Option<f32>,
}

pub fn run_layout(
    engine: &MarkdownEngine,
    file: &Path,
    args: LayoutArgs,
    format: OutputFormat,
) -> Result<()> {
    let source = super::read_source(file)?;
    let model = engine.parse(&source);

    let defaults = &engine.config().layout;
    let shaper = TextShaper::new(GraphemeBackend::default());
    let layout = engine.layout_with(
        &model,
        args.width.unwrap_or(defaults.width),
        args.scale.unwrap_or(defaults.scale),
        &shaper,
    );
    let visible = layout.visible_block_indices(
        args.top,
        args.height.unwrap_or(defaults.viewport_height),
        args.overscan.unwrap_or(defaults.overscan),
    );

    match format {
        OutputFormat::Json => output::json::print_layout(&layout, &visible),
        OutputFormat::Text => {
            output::text::print_layout(&layout, &visible);
            Ok(())
        }
    }
}
