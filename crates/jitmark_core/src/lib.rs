//! # jitmark_core
//!
//! Engine facade for jitmark.
//!
//! This crate provides:
//! - The `MarkdownEngine` tying parser, plugins, layout and text mapping together
//! - Configuration loading and schema validation
//!
//! ## Example
//!
//! ```rust,ignore
//! use jitmark_core::{EngineConfig, MarkdownEngine};
//! use jitmark_shaping::{GraphemeBackend, TextShaper};
//!
//! let config = EngineConfig::from_file(".jitmark.jsonc")?;
//! let engine = MarkdownEngine::new(config)?;
//!
//! let model = engine.parse("# Hello\n\nWorld");
//! let layout = engine.layout(&model, &TextShaper::new(GraphemeBackend::default()));
//! for index in engine.visible_blocks(&layout, 0.0) {
//!     println!("{:?}", layout.blocks()[index].bounds());
//! }
//! ```

mod config;
mod engine;
mod error;

pub use config::{EngineConfig, LayoutConfig};
pub use engine::MarkdownEngine;
pub use error::EngineError;
