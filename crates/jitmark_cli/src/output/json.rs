//! JSON output formatter

use std::path::PathBuf;

use jitmark_ast::MarkdownDocumentModel;
use jitmark_layout::MarkdownLayout;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

pub fn print_value<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

pub fn print_documents(parsed: &[(PathBuf, MarkdownDocumentModel)]) -> Result<()> {
    let output: Vec<_> = parsed
        .iter()
        .map(|(path, model)| {
            serde_json::json!({
                "path": path.display().to_string(),
                "document": model.document(),
                "source_map": model.source_map(),
            })
        })
        .collect();
    print_value(&output)
}

pub fn print_layout(layout: &MarkdownLayout, visible: &[usize]) -> Result<()> {
    print_value(&serde_json::json!({
        "layout": layout,
        "visible": visible,
    }))
}
