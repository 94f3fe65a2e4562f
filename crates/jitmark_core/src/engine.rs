//! Markdown engine facade.

use std::sync::Arc;

use jitmark_ast::MarkdownDocumentModel;
use jitmark_layout::{MarkdownLayout, TextMeasurer, Theme};
use jitmark_parser::{MarkdownParser, ParserOptions};
use jitmark_plugin::github::GitHubEnrichmentsPlugin;
use jitmark_plugin::{MarkdownPlugin, PluginRegistry};
use jitmark_text::{SpanMappingPolicy, TextOffsetMap};
use tracing::debug;

use crate::{EngineConfig, EngineError};

/// Parses, lays out and maps markdown according to an [`EngineConfig`].
///
/// Immutable once created; share it freely between threads.
#[derive(Debug, Clone)]
pub struct MarkdownEngine {
    config: EngineConfig,
    parser: MarkdownParser,
    theme: Theme,
}

impl MarkdownEngine {
    /// Creates an engine, installing the plugins `config` enables.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_plugins(config, &[])
    }

    /// Creates an engine with `plugins` installed after the configured ones.
    pub fn with_plugins(
        config: EngineConfig,
        plugins: &[&dyn MarkdownPlugin],
    ) -> Result<Self, EngineError> {
        let mut registry = PluginRegistry::new();

        if let Some(github) = &config.github {
            registry.install(&GitHubEnrichmentsPlugin::new(github.clone()))?;
        }
        for plugin in plugins {
            registry.install(*plugin)?;
        }
        debug!("Engine plugins: {:?}", registry.installed());

        let options = ParserOptions::default().allow_html(config.allow_html);
        let parser = MarkdownParser::with_registry(options, Arc::new(registry));
        let theme = config.layout.theme.theme();

        Ok(Self {
            config,
            parser,
            theme,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parser(&self) -> &MarkdownParser {
        &self.parser
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Parses `source`. Never fails.
    pub fn parse(&self, source: &str) -> MarkdownDocumentModel {
        self.parser.parse(source)
    }

    /// Lays out `model` at the configured width and scale.
    pub fn layout(
        &self,
        model: &MarkdownDocumentModel,
        measurer: &dyn TextMeasurer,
    ) -> MarkdownLayout {
        self.layout_with(model, self.config.layout.width, self.config.layout.scale, measurer)
    }

    /// Lays out `model` at an explicit width and scale.
    pub fn layout_with(
        &self,
        model: &MarkdownDocumentModel,
        width: f32,
        scale: f32,
        measurer: &dyn TextMeasurer,
    ) -> MarkdownLayout {
        jitmark_layout::layout(model.document(), width, &self.theme, scale, measurer)
    }

    /// Indices of the top-level blocks visible in the configured viewport
    /// scrolled to `top`.
    pub fn visible_blocks(&self, layout: &MarkdownLayout, top: f32) -> Vec<usize> {
        layout.visible_block_indices(
            top,
            self.config.layout.viewport_height,
            self.config.layout.overscan,
        )
    }

    /// Text offset map of top-level block `index`.
    ///
    /// `None` when the index is out of range or the block carries no inline content.
    pub fn offset_map(&self, model: &MarkdownDocumentModel, index: usize) -> Option<TextOffsetMap> {
        let inlines = model.blocks().get(index)?.inlines()?;
        Some(TextOffsetMap::build_with_index(
            model.source(),
            model.source_index(),
            inlines,
            SpanMappingPolicy::InnerContent,
        ))
    }
}
