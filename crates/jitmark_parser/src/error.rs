//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
///
/// Only surfaced by [`MarkdownParser::try_parse`](crate::MarkdownParser::try_parse);
/// [`MarkdownParser::parse`](crate::MarkdownParser::parse) never fails.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar engine rejected the source.
    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource(message.into())
    }
}
