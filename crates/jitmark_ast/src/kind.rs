//! Node kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a document node.
///
/// The discriminant values participate in [`NodeId`](crate::NodeId)
/// derivation, so existing values must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeKind {
    Document = 0,

    // Blocks
    Heading = 1,
    Paragraph = 2,
    BlockQuote = 3,
    List = 4,
    ListItem = 5,
    CodeBlock = 6,
    Table = 7,
    TableRow = 8,
    TableCell = 9,
    ThematicBreak = 10,
    HtmlBlock = 11,

    // Inlines
    Text = 12,
    Emphasis = 13,
    Strong = 14,
    Strikethrough = 15,
    Link = 16,
    Image = 17,
    InlineCode = 18,
    LineBreak = 19,
}

impl NodeKind {
    /// Returns true for block-level kinds (including the document).
    pub const fn is_block(self) -> bool {
        (self as u8) < (NodeKind::Text as u8)
    }

    /// Returns true for inline kinds.
    pub const fn is_inline(self) -> bool {
        !self.is_block()
    }

    /// Returns true if nodes of this kind own child nodes.
    pub const fn is_container(self) -> bool {
        !matches!(
            self,
            NodeKind::CodeBlock
                | NodeKind::ThematicBreak
                | NodeKind::HtmlBlock
                | NodeKind::Text
                | NodeKind::InlineCode
                | NodeKind::LineBreak
        )
    }

    /// Returns the kind name as a string.
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Document => "Document",
            NodeKind::Heading => "Heading",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::BlockQuote => "BlockQuote",
            NodeKind::List => "List",
            NodeKind::ListItem => "ListItem",
            NodeKind::CodeBlock => "CodeBlock",
            NodeKind::Table => "Table",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell => "TableCell",
            NodeKind::ThematicBreak => "ThematicBreak",
            NodeKind::HtmlBlock => "HtmlBlock",
            NodeKind::Text => "Text",
            NodeKind::Emphasis => "Emphasis",
            NodeKind::Strong => "Strong",
            NodeKind::Strikethrough => "Strikethrough",
            NodeKind::Link => "Link",
            NodeKind::Image => "Image",
            NodeKind::InlineCode => "InlineCode",
            NodeKind::LineBreak => "LineBreak",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
