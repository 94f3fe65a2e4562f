//! Conversion from the grammar engine's mdast to the document model.

use std::collections::HashMap;

use jitmark_ast::{
    BlockNode, BlockQuote, CodeBlock, Document, Heading, HtmlBlock, Image, InlineCode, InlineNode,
    LineBreak, Link, List, ListItem, MarkdownDocumentModel, NodeId, NodeKind, Paragraph,
    SourceIndex, SourceMap, SourceMapEntry, SourceSpan, StyledInline, Table, TableCell, TableRow,
    Text, ThematicBreak,
};
use jitmark_plugin::PluginRegistry;
use markdown::mdast::Node;
use tracing::{debug, trace};

use crate::ParserOptions;
use crate::enrich::{TextPiece, enrich_text};
use crate::task::task_state_of;

/// Target of a link or image reference definition.
#[derive(Debug, Clone)]
struct Definition {
    url: String,
    title: Option<String>,
}

/// An inline child awaiting conversion.
enum Pending<'n> {
    Node(&'n Node),
    Piece(TextPiece),
}

/// Builds one [`MarkdownDocumentModel`] from one mdast tree.
///
/// Ids follow pre-order structure: each node's id is derived from its kind,
/// span, ordinal among its siblings, and its parent's id. Source map entries
/// are collected as each node completes, so children precede their parent.
///
/// The grammar engine reports byte offsets; every span is converted to char
/// offsets through one [`SourceIndex`] built up front.
pub(crate) struct DocumentBuilder<'a> {
    source: &'a str,
    index: SourceIndex,
    options: ParserOptions,
    registry: &'a PluginRegistry,
    definitions: HashMap<String, Definition>,
    entries: Vec<SourceMapEntry>,
}

impl<'a> DocumentBuilder<'a> {
    pub(crate) fn new(source: &'a str, options: ParserOptions, registry: &'a PluginRegistry) -> Self {
        Self {
            source,
            index: SourceIndex::new(source),
            options,
            registry,
            definitions: HashMap::new(),
            entries: Vec::with_capacity(512),
        }
    }

    pub(crate) fn build(mut self, root: &Node) -> MarkdownDocumentModel {
        self.collect_definitions(root);

        let blocks = self.convert_blocks(children_of(root), NodeId::ROOT);
        let document = Document {
            id: NodeId::ROOT,
            span: SourceSpan::new(0, self.index.char_len()),
            blocks,
        };

        MarkdownDocumentModel::with_index(
            self.source.to_string(),
            self.index,
            document,
            SourceMap::new(self.entries),
        )
    }

    fn collect_definitions(&mut self, node: &Node) {
        if let Node::Definition(definition) = node {
            self.definitions
                .entry(normalize_identifier(&definition.identifier))
                .or_insert_with(|| Definition {
                    url: definition.url.clone(),
                    title: definition.title.clone(),
                });
        }
        for child in children_of(node) {
            self.collect_definitions(child);
        }
    }

    fn resolve(&self, identifier: &str) -> Option<&Definition> {
        self.definitions.get(&normalize_identifier(identifier))
    }

    fn span(&self, node: &Node) -> SourceSpan {
        node.position()
            .map(|position| {
                self.index
                    .span_from_bytes(position.start.offset..position.end.offset)
            })
            .unwrap_or(SourceSpan::EMPTY)
    }

    fn record(&mut self, id: NodeId, kind: NodeKind, span: SourceSpan) {
        self.entries.push(SourceMapEntry::new(id, kind, span));
    }

    fn convert_blocks(&mut self, children: &[Node], parent: NodeId) -> Vec<BlockNode> {
        let mut blocks = Vec::with_capacity(children.len());
        for (ordinal, child) in children.iter().enumerate() {
            if let Some(block) = self.convert_block(child, ordinal, parent) {
                blocks.push(block);
            }
        }
        blocks
    }

    fn convert_block(&mut self, node: &Node, ordinal: usize, parent: NodeId) -> Option<BlockNode> {
        let span = self.span(node);

        let block = match node {
            Node::Heading(heading) => {
                let id = NodeId::derive(NodeKind::Heading, span, ordinal, parent);
                let inlines = self.convert_inlines(&heading.children, id, true);
                BlockNode::Heading(Heading {
                    id,
                    span,
                    level: heading.depth.clamp(1, 6),
                    inlines,
                })
            }

            Node::Paragraph(paragraph) => {
                let id = NodeId::derive(NodeKind::Paragraph, span, ordinal, parent);
                let inlines = self.convert_inlines(&paragraph.children, id, true);
                BlockNode::Paragraph(Paragraph { id, span, inlines })
            }

            Node::Blockquote(quote) => {
                let id = NodeId::derive(NodeKind::BlockQuote, span, ordinal, parent);
                let blocks = self.convert_blocks(&quote.children, id);
                BlockNode::BlockQuote(BlockQuote { id, span, blocks })
            }

            Node::List(list) => {
                let id = NodeId::derive(NodeKind::List, span, ordinal, parent);
                let items = list
                    .children
                    .iter()
                    .filter(|child| matches!(child, Node::ListItem(_)))
                    .enumerate()
                    .map(|(item_ordinal, child)| self.convert_list_item(child, item_ordinal, id))
                    .collect();
                BlockNode::List(List {
                    id,
                    span,
                    is_ordered: list.ordered,
                    start: list.ordered.then_some(list.start.unwrap_or(1)),
                    items,
                })
            }

            Node::Code(code) => {
                let id = NodeId::derive(NodeKind::CodeBlock, span, ordinal, parent);
                let info = code
                    .lang
                    .as_deref()
                    .map(str::trim)
                    .filter(|info| !info.is_empty())
                    .map(str::to_string);
                BlockNode::CodeBlock(CodeBlock {
                    id,
                    span,
                    info,
                    code: code.value.clone(),
                })
            }

            Node::Table(table) => self.convert_table(table, span, ordinal, parent),

            Node::ThematicBreak(_) => {
                let id = NodeId::derive(NodeKind::ThematicBreak, span, ordinal, parent);
                BlockNode::ThematicBreak(ThematicBreak { id, span })
            }

            Node::Html(html) => {
                if !self.options.allow_html {
                    debug!("Dropping HTML block at {}..{}", span.start, span.end);
                    return None;
                }
                let id = NodeId::derive(NodeKind::HtmlBlock, span, ordinal, parent);
                BlockNode::HtmlBlock(HtmlBlock {
                    id,
                    span,
                    html: html.value.clone(),
                })
            }

            Node::Definition(_) => return None,

            other => {
                trace!("Skipping unsupported block node: {}", node_name(other));
                return None;
            }
        };

        self.record(block.id(), block.kind(), block.span());
        Some(block)
    }

    fn convert_list_item(&mut self, node: &Node, ordinal: usize, parent: NodeId) -> ListItem {
        let span = self.span(node);
        let id = NodeId::derive(NodeKind::ListItem, span, ordinal, parent);
        let blocks = self.convert_blocks(children_of(node), id);
        let (is_task, is_checked) = self
            .index
            .slice(self.source, span)
            .map_or((false, None), task_state_of);

        self.record(id, NodeKind::ListItem, span);
        ListItem {
            id,
            span,
            is_task,
            is_checked,
            blocks,
        }
    }

    fn convert_table(
        &mut self,
        table: &markdown::mdast::Table,
        span: SourceSpan,
        ordinal: usize,
        parent: NodeId,
    ) -> BlockNode {
        let id = NodeId::derive(NodeKind::Table, span, ordinal, parent);

        let mut rows = Vec::with_capacity(table.children.len());
        for (row_ordinal, row) in table.children.iter().enumerate() {
            let Node::TableRow(row_node) = row else {
                continue;
            };
            let row_span = self.span(row);
            let row_id = NodeId::derive(NodeKind::TableRow, row_span, row_ordinal, id);

            let cells = row_node
                .children
                .iter()
                .filter(|cell| matches!(cell, Node::TableCell(_)))
                .enumerate()
                .map(|(cell_ordinal, cell)| self.convert_table_cell(cell, cell_ordinal, row_id))
                .collect();

            self.record(row_id, NodeKind::TableRow, row_span);
            rows.push(TableRow {
                id: row_id,
                span: row_span,
                is_header: row_ordinal == 0,
                cells,
            });
        }

        BlockNode::Table(Table { id, span, rows })
    }

    /// Cells hold inline content directly; it is wrapped in one paragraph.
    fn convert_table_cell(&mut self, node: &Node, ordinal: usize, parent: NodeId) -> TableCell {
        let span = self.span(node);
        let id = NodeId::derive(NodeKind::TableCell, span, ordinal, parent);

        let children = children_of(node);
        let mut blocks = Vec::new();
        if !children.is_empty() {
            let paragraph_span = children
                .iter()
                .filter(|child| child.position().is_some())
                .map(|child| self.span(child))
                .reduce(|hull, child| hull.merge(&child))
                .unwrap_or(span);
            let paragraph_id = NodeId::derive(NodeKind::Paragraph, paragraph_span, 0, id);
            let inlines = self.convert_inlines(children, paragraph_id, true);

            self.record(paragraph_id, NodeKind::Paragraph, paragraph_span);
            blocks.push(BlockNode::Paragraph(Paragraph {
                id: paragraph_id,
                span: paragraph_span,
                inlines,
            }));
        }

        self.record(id, NodeKind::TableCell, span);
        TableCell { id, span, blocks }
    }

    /// Converts inline children. With `enrich`, text runs pass through the
    /// registered recognizers first and ordinals count the split pieces.
    fn convert_inlines(&mut self, children: &[Node], parent: NodeId, enrich: bool) -> Vec<InlineNode> {
        let mut pending = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Node::Text(text) if enrich => {
                    let span = self.span(child);
                    pending.extend(
                        enrich_text(self.registry, self.source, &self.index, &text.value, span)
                            .into_iter()
                            .map(Pending::Piece),
                    );
                }
                _ => pending.push(Pending::Node(child)),
            }
        }

        let mut inlines = Vec::with_capacity(pending.len());
        for (ordinal, item) in pending.into_iter().enumerate() {
            let converted = match item {
                Pending::Node(node) => self.convert_inline(node, ordinal, parent, enrich),
                Pending::Piece(piece) => Some(self.convert_piece(piece, ordinal, parent)),
            };
            if let Some(inline) = converted {
                inlines.push(inline);
            }
        }
        inlines
    }

    fn convert_piece(&mut self, piece: TextPiece, ordinal: usize, parent: NodeId) -> InlineNode {
        match piece {
            TextPiece::Text { value, span } => self.text_node(value, span, ordinal, parent),
            TextPiece::Link {
                value,
                span,
                url,
                title,
            } => {
                let id = NodeId::derive(NodeKind::Link, span, ordinal, parent);
                let child = self.text_node(value, span, 0, id);
                self.record(id, NodeKind::Link, span);
                InlineNode::Link(Link {
                    id,
                    span,
                    url: Some(url),
                    title,
                    inlines: vec![child],
                })
            }
        }
    }

    fn text_node(&mut self, text: String, span: SourceSpan, ordinal: usize, parent: NodeId) -> InlineNode {
        let id = NodeId::derive(NodeKind::Text, span, ordinal, parent);
        self.record(id, NodeKind::Text, span);
        InlineNode::Text(Text { id, span, text })
    }

    fn convert_inline(
        &mut self,
        node: &Node,
        ordinal: usize,
        parent: NodeId,
        enrich: bool,
    ) -> Option<InlineNode> {
        let span = self.span(node);

        let inline = match node {
            Node::Text(text) => return Some(self.text_node(text.value.clone(), span, ordinal, parent)),

            Node::Emphasis(emphasis) => {
                let id = NodeId::derive(NodeKind::Emphasis, span, ordinal, parent);
                let inlines = self.convert_inlines(&emphasis.children, id, enrich);
                InlineNode::Emphasis(StyledInline { id, span, inlines })
            }

            Node::Strong(strong) => {
                let id = NodeId::derive(NodeKind::Strong, span, ordinal, parent);
                let inlines = self.convert_inlines(&strong.children, id, enrich);
                InlineNode::Strong(StyledInline { id, span, inlines })
            }

            Node::Delete(delete) => {
                let id = NodeId::derive(NodeKind::Strikethrough, span, ordinal, parent);
                let inlines = self.convert_inlines(&delete.children, id, enrich);
                InlineNode::Strikethrough(StyledInline { id, span, inlines })
            }

            Node::InlineCode(code) => {
                let id = NodeId::derive(NodeKind::InlineCode, span, ordinal, parent);
                InlineNode::InlineCode(InlineCode {
                    id,
                    span,
                    code: code.value.clone(),
                })
            }

            Node::Break(_) => {
                let id = NodeId::derive(NodeKind::LineBreak, span, ordinal, parent);
                InlineNode::LineBreak(LineBreak { id, span })
            }

            Node::Link(link) => {
                let id = NodeId::derive(NodeKind::Link, span, ordinal, parent);
                let inlines = self.convert_inlines(&link.children, id, false);
                InlineNode::Link(Link {
                    id,
                    span,
                    url: Some(link.url.clone()),
                    title: link.title.clone(),
                    inlines,
                })
            }

            Node::LinkReference(reference) => {
                let id = NodeId::derive(NodeKind::Link, span, ordinal, parent);
                let inlines = self.convert_inlines(&reference.children, id, false);
                let target = self.resolve(&reference.identifier).cloned();
                InlineNode::Link(Link {
                    id,
                    span,
                    url: target.as_ref().map(|t| t.url.clone()),
                    title: target.and_then(|t| t.title),
                    inlines,
                })
            }

            Node::Image(image) => {
                let id = NodeId::derive(NodeKind::Image, span, ordinal, parent);
                let alt = self.alt_inlines(&image.alt, span, id);
                InlineNode::Image(Image {
                    id,
                    span,
                    url: Some(image.url.clone()),
                    title: image.title.clone(),
                    alt,
                })
            }

            Node::ImageReference(reference) => {
                let id = NodeId::derive(NodeKind::Image, span, ordinal, parent);
                let alt = self.alt_inlines(&reference.alt, span, id);
                let target = self.resolve(&reference.identifier).cloned();
                InlineNode::Image(Image {
                    id,
                    span,
                    url: target.as_ref().map(|t| t.url.clone()),
                    title: target.and_then(|t| t.title),
                    alt,
                })
            }

            other => {
                trace!("Skipping unsupported inline node: {}", node_name(other));
                return None;
            }
        };

        self.record(inline.id(), inline.kind(), inline.span());
        Some(inline)
    }

    /// Alt text becomes one text child, located inside the image source when possible.
    fn alt_inlines(&mut self, alt: &str, image_span: SourceSpan, image_id: NodeId) -> Vec<InlineNode> {
        if alt.is_empty() {
            return Vec::new();
        }

        let span = self
            .index
            .slice(self.source, image_span)
            .and_then(|raw| raw.find(alt).map(|offset| raw[..offset].chars().count()))
            .map(|offset| {
                let start = image_span.start + offset;
                SourceSpan::new(start, start + alt.chars().count())
            })
            .unwrap_or(image_span);

        vec![self.text_node(alt.to_string(), span, 0, image_id)]
    }
}

fn children_of(node: &Node) -> &[Node] {
    node.children().map(Vec::as_slice).unwrap_or(&[])
}

/// Case-folded, whitespace-collapsed reference identifier.
fn normalize_identifier(identifier: &str) -> String {
    identifier
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn node_name(node: &Node) -> &'static str {
    match node {
        Node::Html(_) => "html",
        Node::FootnoteDefinition(_) => "footnoteDefinition",
        Node::FootnoteReference(_) => "footnoteReference",
        Node::Math(_) | Node::InlineMath(_) => "math",
        Node::Yaml(_) | Node::Toml(_) => "frontmatter",
        _ => "other",
    }
}
