//! Engine error types.

use thiserror::Error;

/// Errors raised while configuring or driving the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Plugin error.
    #[error("Plugin error: {0}")]
    Plugin(#[from] jitmark_plugin::PluginError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
