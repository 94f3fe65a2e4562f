//! # jitmark_parser
//!
//! Parsing pipeline for jitmark.
//!
//! This crate provides:
//! - [`MarkdownParser`], which converts `markdown-rs` mdast output into a
//!   [`MarkdownDocumentModel`](jitmark_ast::MarkdownDocumentModel) with
//!   deterministic ids and a source map
//! - the HTML materialization policy ([`ParserOptions`])
//! - the task list marker heuristic ([`detect_task_state`])
//!
//! Inline recognizers registered through a
//! [`PluginRegistry`](jitmark_plugin::PluginRegistry) run over every plain
//! text run outside links, images, and code.
//!
//! ## Example
//!
//! ```rust
//! use jitmark_parser::MarkdownParser;
//!
//! let parser = MarkdownParser::new();
//! let model = parser.parse("# Hello\n\nThis is a paragraph.");
//! assert_eq!(model.blocks().len(), 2);
//! ```

mod builder;
mod enrich;
mod error;
mod markdown;
mod options;
mod task;

pub use error::ParseError;
pub use markdown::MarkdownParser;
pub use options::ParserOptions;
pub use task::detect_task_state;
