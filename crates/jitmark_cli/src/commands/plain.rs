//! Plain-text command implementation

use std::path::PathBuf;

use jitmark_core::MarkdownEngine;
use jitmark_text::extract_plain_text;
use miette::Result;

pub fn run_plain(engine: &MarkdownEngine, files: &[PathBuf]) -> Result<()> {
    for (_, model) in super::parse_files(engine, files)? {
        println!("{}", extract_plain_text(model.document()));
    }
    Ok(())
}
