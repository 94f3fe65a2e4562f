use serde::{Deserialize, Serialize};

/// Model-building policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Materialize block-level HTML as `HtmlBlock` nodes.
    ///
    /// When off, HTML is still recognized by the grammar but dropped from the model.
    pub allow_html: bool,
}

impl ParserOptions {
    pub fn allow_html(mut self, allow: bool) -> Self {
        self.allow_html = allow;
        self
    }
}
