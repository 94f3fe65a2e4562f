//! # jitmark_plugin
//!
//! Extension point for markdown enrichment plugins.
//!
//! A [`MarkdownPlugin`] contributes, through a [`PluginRegistry`]:
//! - pipeline configurators that adjust the grammar engine's parse options
//! - [`InlineRecognizer`]s that turn runs of plain text into links
//!
//! The [`github`] module provides the built-in GitHub enrichments.
//!
//! ## Example
//!
//! ```rust
//! use jitmark_plugin::PluginRegistry;
//! use jitmark_plugin::github::{GitHubEnrichmentOptions, GitHubEnrichmentsPlugin};
//!
//! let mut registry = PluginRegistry::new();
//! let plugin = GitHubEnrichmentsPlugin::new(GitHubEnrichmentOptions::for_repository("owner/repo"));
//! registry.install(&plugin).unwrap();
//! assert_eq!(registry.recognizers().len(), 2);
//! ```

mod error;
pub mod github;
mod recognizer;
mod registry;

pub use error::PluginError;
pub use recognizer::{InlineMatch, InlineRecognizer, InlineScan, is_identifier_char};
pub use registry::{MarkdownPlugin, PipelineConfigurator, PluginRegistry};
