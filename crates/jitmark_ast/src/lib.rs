//! # jitmark_ast
//!
//! Document model for the jitmark markdown engine.
//!
//! Every node carries a [`NodeId`] derived deterministically from its kind,
//! source span, sibling ordinal, and parent id, so re-parsing unchanged text
//! reproduces the same ids. A [`SourceMap`] indexes each id back to its kind
//! and [`SourceSpan`]. Span offsets count chars; [`SourceIndex`] converts
//! them to byte offsets.
//!
//! ## Example
//!
//! ```rust
//! use jitmark_ast::{NodeId, NodeKind, SourceSpan};
//!
//! let span = SourceSpan::new(0, 5);
//! let id = NodeId::derive(NodeKind::Paragraph, span, 0, NodeId::ROOT);
//! assert_eq!(id, NodeId::derive(NodeKind::Paragraph, span, 0, NodeId::ROOT));
//! ```

mod document;
mod id;
mod kind;
mod node;
mod source_index;
mod source_map;
mod span;
pub mod visitor;

pub use document::MarkdownDocumentModel;
pub use id::NodeId;
pub use kind::NodeKind;
pub use node::{
    BlockNode, BlockQuote, CodeBlock, Document, Heading, HtmlBlock, Image, InlineCode, InlineNode,
    LineBreak, Link, List, ListItem, Paragraph, StyledInline, Table, TableCell, TableRow, Text,
    ThematicBreak, display_text,
};
pub use source_index::SourceIndex;
pub use source_map::{SourceMap, SourceMapEntry};
pub use span::SourceSpan;

pub use visitor::{NodeRef, VisitResult, Visitor};
