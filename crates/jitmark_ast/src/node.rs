//! Block and inline node types.
//!
//! The tree is strictly owned: a parent holds its children by value in
//! document order and nothing points back up.

use serde::Serialize;

use crate::{NodeId, NodeKind, SourceSpan};

/// The root of a parsed document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub id: NodeId,
    pub span: SourceSpan,
    pub blocks: Vec<BlockNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heading {
    pub id: NodeId,
    pub span: SourceSpan,
    /// Heading level, `1..=6`.
    pub level: u8,
    pub inlines: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paragraph {
    pub id: NodeId,
    pub span: SourceSpan,
    pub inlines: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockQuote {
    pub id: NodeId,
    pub span: SourceSpan,
    pub blocks: Vec<BlockNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    pub id: NodeId,
    pub span: SourceSpan,
    pub is_ordered: bool,
    /// First number of an ordered list.
    pub start: Option<u32>,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub id: NodeId,
    pub span: SourceSpan,
    pub is_task: bool,
    /// `Some` only for task items.
    pub is_checked: Option<bool>,
    pub blocks: Vec<BlockNode>,
}

/// A fenced or indented code block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    pub id: NodeId,
    pub span: SourceSpan,
    /// Trimmed info string of a fenced block; `None` when blank or indented.
    pub info: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub id: NodeId,
    pub span: SourceSpan,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: NodeId,
    pub span: SourceSpan,
    pub is_header: bool,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub id: NodeId,
    pub span: SourceSpan,
    pub blocks: Vec<BlockNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThematicBreak {
    pub id: NodeId,
    pub span: SourceSpan,
}

/// Raw block-level HTML, only materialized when HTML is allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlBlock {
    pub id: NodeId,
    pub span: SourceSpan,
    pub html: String,
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum BlockNode {
    Heading(Heading),
    Paragraph(Paragraph),
    BlockQuote(BlockQuote),
    List(List),
    CodeBlock(CodeBlock),
    Table(Table),
    ThematicBreak(ThematicBreak),
    HtmlBlock(HtmlBlock),
}

impl BlockNode {
    pub fn id(&self) -> NodeId {
        match self {
            BlockNode::Heading(n) => n.id,
            BlockNode::Paragraph(n) => n.id,
            BlockNode::BlockQuote(n) => n.id,
            BlockNode::List(n) => n.id,
            BlockNode::CodeBlock(n) => n.id,
            BlockNode::Table(n) => n.id,
            BlockNode::ThematicBreak(n) => n.id,
            BlockNode::HtmlBlock(n) => n.id,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            BlockNode::Heading(n) => n.span,
            BlockNode::Paragraph(n) => n.span,
            BlockNode::BlockQuote(n) => n.span,
            BlockNode::List(n) => n.span,
            BlockNode::CodeBlock(n) => n.span,
            BlockNode::Table(n) => n.span,
            BlockNode::ThematicBreak(n) => n.span,
            BlockNode::HtmlBlock(n) => n.span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            BlockNode::Heading(_) => NodeKind::Heading,
            BlockNode::Paragraph(_) => NodeKind::Paragraph,
            BlockNode::BlockQuote(_) => NodeKind::BlockQuote,
            BlockNode::List(_) => NodeKind::List,
            BlockNode::CodeBlock(_) => NodeKind::CodeBlock,
            BlockNode::Table(_) => NodeKind::Table,
            BlockNode::ThematicBreak(_) => NodeKind::ThematicBreak,
            BlockNode::HtmlBlock(_) => NodeKind::HtmlBlock,
        }
    }

    /// Inline content of a text-bearing block, if any.
    pub fn inlines(&self) -> Option<&[InlineNode]> {
        match self {
            BlockNode::Heading(n) => Some(&n.inlines),
            BlockNode::Paragraph(n) => Some(&n.inlines),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Text {
    pub id: NodeId,
    pub span: SourceSpan,
    pub text: String,
}

/// Shared shape of emphasis, strong, and strikethrough.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledInline {
    pub id: NodeId,
    pub span: SourceSpan,
    pub inlines: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub id: NodeId,
    pub span: SourceSpan,
    pub url: Option<String>,
    pub title: Option<String>,
    pub inlines: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: NodeId,
    pub span: SourceSpan,
    pub url: Option<String>,
    pub title: Option<String>,
    pub alt: Vec<InlineNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineCode {
    pub id: NodeId,
    pub span: SourceSpan,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineBreak {
    pub id: NodeId,
    pub span: SourceSpan,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum InlineNode {
    Text(Text),
    Emphasis(StyledInline),
    Strong(StyledInline),
    Strikethrough(StyledInline),
    Link(Link),
    Image(Image),
    InlineCode(InlineCode),
    LineBreak(LineBreak),
}

impl InlineNode {
    pub fn id(&self) -> NodeId {
        match self {
            InlineNode::Text(n) => n.id,
            InlineNode::Emphasis(n) | InlineNode::Strong(n) | InlineNode::Strikethrough(n) => n.id,
            InlineNode::Link(n) => n.id,
            InlineNode::Image(n) => n.id,
            InlineNode::InlineCode(n) => n.id,
            InlineNode::LineBreak(n) => n.id,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            InlineNode::Text(n) => n.span,
            InlineNode::Emphasis(n) | InlineNode::Strong(n) | InlineNode::Strikethrough(n) => {
                n.span
            }
            InlineNode::Link(n) => n.span,
            InlineNode::Image(n) => n.span,
            InlineNode::InlineCode(n) => n.span,
            InlineNode::LineBreak(n) => n.span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            InlineNode::Text(_) => NodeKind::Text,
            InlineNode::Emphasis(_) => NodeKind::Emphasis,
            InlineNode::Strong(_) => NodeKind::Strong,
            InlineNode::Strikethrough(_) => NodeKind::Strikethrough,
            InlineNode::Link(_) => NodeKind::Link,
            InlineNode::Image(_) => NodeKind::Image,
            InlineNode::InlineCode(_) => NodeKind::InlineCode,
            InlineNode::LineBreak(_) => NodeKind::LineBreak,
        }
    }

    /// Child inlines; for images this is the alt text.
    pub fn children(&self) -> &[InlineNode] {
        match self {
            InlineNode::Emphasis(n) | InlineNode::Strong(n) | InlineNode::Strikethrough(n) => {
                &n.inlines
            }
            InlineNode::Link(n) => &n.inlines,
            InlineNode::Image(n) => &n.alt,
            InlineNode::Text(_) | InlineNode::InlineCode(_) | InlineNode::LineBreak(_) => &[],
        }
    }

    /// Appends the displayed text of this node to `out`.
    ///
    /// Markup delimiters contribute nothing; a line break renders as `\n`.
    pub fn push_display_text(&self, out: &mut String) {
        match self {
            InlineNode::Text(n) => out.push_str(&n.text),
            InlineNode::InlineCode(n) => out.push_str(&n.code),
            InlineNode::LineBreak(_) => out.push('\n'),
            _ => {
                for child in self.children() {
                    child.push_display_text(out);
                }
            }
        }
    }
}

/// Concatenates the displayed text of a run of inlines.
pub fn display_text(inlines: &[InlineNode]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.push_display_text(&mut out);
    }
    out
}
