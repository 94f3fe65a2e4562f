//! Parse command implementation

use std::path::PathBuf;

use jitmark_core::MarkdownEngine;
use miette::Result;

use crate::cli::OutputFormat;
use crate::output;

pub fn run_parse(engine: &MarkdownEngine, files: &[PathBuf], format: OutputFormat) -> Result<()> {
    let parsed = super::parse_files(engine, files)?;

    match format {
        OutputFormat::Json => output::json::print_documents(&parsed),
        OutputFormat::Text => {
            for (path, model) in &parsed {
                println!("{}:", path.display());
                output::text::print_tree(model);
            }
            Ok(())
        }
    }
}
