//! Command implementations

pub mod layout;
pub mod map;
pub mod parse;
pub mod plain;
pub mod shape;

use std::fs;
use std::path::{Path, PathBuf};

use jitmark_ast::MarkdownDocumentModel;
use jitmark_core::MarkdownEngine;
use miette::{Result, miette};
use rayon::prelude::*;
use tracing::debug;

/// Reads one markdown file.
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| miette!("Failed to read {}: {}", path.display(), e))
}

/// Reads and parses `files` in parallel, keeping input order.
pub fn parse_files(
    engine: &MarkdownEngine,
    files: &[PathBuf],
) -> Result<Vec<(PathBuf, MarkdownDocumentModel)>> {
    files
        .par_iter()
        .map(|path| {
            let source = read_source(path)?;
            let model = engine.parse(&source);
            debug!(
                "Parsed {}: {} blocks, {} nodes",
                path.display(),
                model.blocks().len(),
                model.source_map().len()
            );
            Ok((path.clone(), model))
        })
        .collect()
}
