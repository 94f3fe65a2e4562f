//! Plugin error types.

use thiserror::Error;

/// Errors raised while registering plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A recognizer declared no trigger characters and could never run.
    #[error("Recognizer '{0}' declares no trigger characters")]
    NoTriggers(String),

    /// A plugin failed to register itself.
    #[error("Failed to register plugin '{name}': {message}")]
    Registration {
        /// Plugin name.
        name: String,
        /// Error message.
        message: String,
    },
}

impl PluginError {
    /// Creates a no-triggers error.
    pub fn no_triggers(name: impl Into<String>) -> Self {
        Self::NoTriggers(name.into())
    }

    /// Creates a registration error.
    pub fn registration(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Registration {
            name: name.into(),
            message: message.into(),
        }
    }
}
