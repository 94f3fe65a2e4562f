use serde::{Deserialize, Serialize};

/// How rendered characters of formatted inlines map back to source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanMappingPolicy {
    /// Map only the inner content; markup delimiters produce no rendered characters.
    #[default]
    InnerContent,

    /// Map to the whole node span, delimiters included.
    ///
    /// Not supported yet: requires run-level selection. Currently behaves
    /// exactly like [`InnerContent`](Self::InnerContent).
    NodeSpan,
}
