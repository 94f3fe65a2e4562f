//! Map command implementation

use std::path::Path;

use jitmark_core::MarkdownEngine;
use miette::{Result, miette};

pub fn run_map(
    engine: &MarkdownEngine,
    file: &Path,
    block: usize,
    start: usize,
    length: usize,
) -> Result<()> {
    let source = super::read_source(file)?;
    let model = engine.parse(&source);

    let block_count = model.blocks().len();
    if block >= block_count {
        return Err(miette!(
            "Block {} out of range: {} has {} top-level blocks",
            block,
            file.display(),
            block_count
        ));
    }
    let map = engine
        .offset_map(&model, block)
        .ok_or_else(|| miette!("Block {} has no inline text to map", block))?;

    let span = map.map_rendered_range_to_source_span(start, length);
    println!("rendered: {}", map.rendered_text());
    println!("span: {}..{}", span.start, span.end);
    println!("source: {}", model.slice(span).unwrap_or_default());
    Ok(())
}
