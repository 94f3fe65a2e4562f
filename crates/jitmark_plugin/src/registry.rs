//! Plugin registry.

use std::fmt;
use std::sync::Arc;

use markdown::ParseOptions;
use tracing::debug;

use crate::{InlineRecognizer, PluginError};

/// A callback that adjusts the grammar engine's parse options.
pub type PipelineConfigurator = Box<dyn Fn(&mut ParseOptions) + Send + Sync>;

/// A markdown enrichment plugin.
pub trait MarkdownPlugin: Send + Sync {
    /// Unique plugin name. Installing a second plugin with the same name is a no-op.
    fn name(&self) -> &str;

    /// Contributes configurators and recognizers to `registry`.
    fn register(&self, registry: &mut PluginRegistry) -> Result<(), PluginError>;
}

/// Ordered collection of pipeline configurators and inline recognizers.
///
/// Built once before parsing; read-only afterwards.
#[derive(Default)]
pub struct PluginRegistry {
    installed: Vec<String>,
    configurators: Vec<PipelineConfigurator>,
    recognizers: Vec<Arc<dyn InlineRecognizer>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a plugin unless one with the same name is already installed.
    ///
    /// Returns `Ok(false)` when the plugin was already present.
    pub fn install(&mut self, plugin: &dyn MarkdownPlugin) -> Result<bool, PluginError> {
        if self.is_installed(plugin.name()) {
            debug!("Plugin '{}' already installed", plugin.name());
            return Ok(false);
        }

        plugin.register(self)?;
        self.installed.push(plugin.name().to_string());
        debug!("Installed plugin '{}'", plugin.name());
        Ok(true)
    }

    /// Returns true if a plugin named `name` has been installed.
    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.iter().any(|n| n == name)
    }

    /// Names of installed plugins, in installation order.
    pub fn installed(&self) -> &[String] {
        &self.installed
    }

    /// Adds a pipeline configurator.
    pub fn configure_pipeline<F>(&mut self, configure: F)
    where
        F: Fn(&mut ParseOptions) + Send + Sync + 'static,
    {
        self.configurators.push(Box::new(configure));
    }

    /// Adds an inline recognizer.
    ///
    /// Recognizers run in registration order. A recognizer whose name is
    /// already registered is skipped and `Ok(false)` is returned.
    pub fn register_recognizer<R>(&mut self, recognizer: R) -> Result<bool, PluginError>
    where
        R: InlineRecognizer + 'static,
    {
        if recognizer.trigger_chars().is_empty() {
            return Err(PluginError::no_triggers(recognizer.name()));
        }
        if self.recognizers.iter().any(|r| r.name() == recognizer.name()) {
            return Ok(false);
        }

        self.recognizers.push(Arc::new(recognizer));
        Ok(true)
    }

    /// Applies every configurator, in order, to `options`.
    pub fn apply_pipeline(&self, options: &mut ParseOptions) {
        for configure in &self.configurators {
            configure(options);
        }
    }

    /// Registered recognizers in registration order.
    pub fn recognizers(&self) -> &[Arc<dyn InlineRecognizer>] {
        &self.recognizers
    }

    /// Returns true if any recognizer triggers on `c`.
    pub fn is_trigger(&self, c: char) -> bool {
        self.recognizers.iter().any(|r| r.is_trigger(c))
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("installed", &self.installed)
            .field("configurators", &self.configurators.len())
            .field(
                "recognizers",
                &self.recognizers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
