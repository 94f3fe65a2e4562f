//! Pre-order traversal over the node tree.
//!
//! The tree mixes several node shapes (blocks, list items, table rows and
//! cells, inlines). [`NodeRef`] gives them one borrowed view so a single
//! [`Visitor`] can observe every node in document order.
//!
//! # Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use jitmark_ast::visitor::{NodeRef, VisitResult, Visitor, walk_document};
//! use jitmark_ast::{Document, NodeKind};
//!
//! #[derive(Default)]
//! struct CountText(usize);
//!
//! impl<'a> Visitor<'a> for CountText {
//!     fn enter_node(&mut self, node: NodeRef<'a>) -> VisitResult {
//!         if node.kind() == NodeKind::Text {
//!             self.0 += 1;
//!         }
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let mut counter = CountText::default();
//! let _ = walk_document(&mut counter, &Document::default());
//! assert_eq!(counter.0, 0);
//! ```

use std::ops::ControlFlow;

use crate::{
    BlockNode, Document, InlineNode, ListItem, NodeId, NodeKind, SourceSpan, TableCell, TableRow,
};

/// Result of a visit. `Break` stops the walk.
pub type VisitResult = ControlFlow<()>;

/// A borrowed view of any node below the document root.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Block(&'a BlockNode),
    ListItem(&'a ListItem),
    TableRow(&'a TableRow),
    TableCell(&'a TableCell),
    Inline(&'a InlineNode),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Block(n) => n.id(),
            NodeRef::ListItem(n) => n.id,
            NodeRef::TableRow(n) => n.id,
            NodeRef::TableCell(n) => n.id,
            NodeRef::Inline(n) => n.id(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            NodeRef::Block(n) => n.span(),
            NodeRef::ListItem(n) => n.span,
            NodeRef::TableRow(n) => n.span,
            NodeRef::TableCell(n) => n.span,
            NodeRef::Inline(n) => n.span(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Block(n) => n.kind(),
            NodeRef::ListItem(_) => NodeKind::ListItem,
            NodeRef::TableRow(_) => NodeKind::TableRow,
            NodeRef::TableCell(_) => NodeKind::TableCell,
            NodeRef::Inline(n) => n.kind(),
        }
    }

    /// Direct children in document order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match *self {
            NodeRef::Block(block) => match block {
                BlockNode::Heading(n) => n.inlines.iter().map(NodeRef::Inline).collect(),
                BlockNode::Paragraph(n) => n.inlines.iter().map(NodeRef::Inline).collect(),
                BlockNode::BlockQuote(n) => n.blocks.iter().map(NodeRef::Block).collect(),
                BlockNode::List(n) => n.items.iter().map(NodeRef::ListItem).collect(),
                BlockNode::Table(n) => n.rows.iter().map(NodeRef::TableRow).collect(),
                BlockNode::CodeBlock(_) | BlockNode::ThematicBreak(_) | BlockNode::HtmlBlock(_) => {
                    Vec::new()
                }
            },
            NodeRef::ListItem(n) => n.blocks.iter().map(NodeRef::Block).collect(),
            NodeRef::TableRow(n) => n.cells.iter().map(NodeRef::TableCell).collect(),
            NodeRef::TableCell(n) => n.blocks.iter().map(NodeRef::Block).collect(),
            NodeRef::Inline(n) => n.children().iter().map(NodeRef::Inline).collect(),
        }
    }
}

/// Read-only traversal callbacks.
pub trait Visitor<'a> {
    /// Called before a node's children are walked.
    fn enter_node(&mut self, _node: NodeRef<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }

    /// Called after a node's children are walked.
    fn exit_node(&mut self, _node: NodeRef<'a>) -> VisitResult {
        ControlFlow::Continue(())
    }
}

/// Walks one node and its subtree.
pub fn walk_node<'a, V: Visitor<'a> + ?Sized>(visitor: &mut V, node: NodeRef<'a>) -> VisitResult {
    visitor.enter_node(node)?;
    for child in node.children() {
        walk_node(visitor, child)?;
    }
    visitor.exit_node(node)
}

/// Walks every top-level block of a document.
pub fn walk_document<'a, V: Visitor<'a> + ?Sized>(
    visitor: &mut V,
    document: &'a Document,
) -> VisitResult {
    for block in &document.blocks {
        walk_node(visitor, NodeRef::Block(block))?;
    }
    ControlFlow::Continue(())
}

/// Collects every node of a document in pre-order.
pub fn collect_nodes(document: &Document) -> Vec<NodeRef<'_>> {
    struct Collector<'a>(Vec<NodeRef<'a>>);

    impl<'a> Visitor<'a> for Collector<'a> {
        fn enter_node(&mut self, node: NodeRef<'a>) -> VisitResult {
            self.0.push(node);
            ControlFlow::Continue(())
        }
    }

    let mut collector = Collector(Vec::new());
    let _ = walk_document(&mut collector, document);
    collector.0
}
