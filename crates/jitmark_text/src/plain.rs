//! Plain-text extraction for copy and export.

use jitmark_ast::{BlockNode, Document, InlineNode};

/// Flattens a document to plain text.
///
/// Blocks are separated by `\n`, table cells by `\t`. Code blocks are copied
/// verbatim; thematic breaks and HTML blocks contribute nothing but still
/// take a separator.
pub fn extract_plain_text(document: &Document) -> String {
    let mut out = String::new();
    append_blocks(&mut out, &document.blocks);
    out
}

fn append_blocks(out: &mut String, blocks: &[BlockNode]) {
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        append_block(out, block);
    }
}

fn append_block(out: &mut String, block: &BlockNode) {
    match block {
        BlockNode::Paragraph(p) => append_inlines(out, &p.inlines),
        BlockNode::Heading(h) => append_inlines(out, &h.inlines),
        BlockNode::BlockQuote(q) => append_blocks(out, &q.blocks),
        BlockNode::List(list) => {
            for (i, item) in list.items.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                append_blocks(out, &item.blocks);
            }
        }
        BlockNode::CodeBlock(code) => out.push_str(&code.code),
        BlockNode::Table(table) => {
            for (r, row) in table.rows.iter().enumerate() {
                if r > 0 {
                    out.push('\n');
                }
                for (c, cell) in row.cells.iter().enumerate() {
                    if c > 0 {
                        out.push('\t');
                    }
                    for block in &cell.blocks {
                        append_block(out, block);
                    }
                }
            }
        }
        BlockNode::ThematicBreak(_) | BlockNode::HtmlBlock(_) => {}
    }
}

fn append_inlines(out: &mut String, inlines: &[InlineNode]) {
    for inline in inlines {
        inline.push_display_text(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jitmark_ast::{
        CodeBlock, List, ListItem, NodeId, Paragraph, SourceSpan, Table, TableCell, TableRow,
        Text, ThematicBreak,
    };
    use pretty_assertions::assert_eq;

    fn para(value: &str) -> BlockNode {
        BlockNode::Paragraph(Paragraph {
            id: NodeId::default(),
            span: SourceSpan::default(),
            inlines: vec![InlineNode::Text(Text {
                id: NodeId::default(),
                span: SourceSpan::default(),
                text: value.to_string(),
            })],
        })
    }

    fn cell(value: &str) -> TableCell {
        TableCell {
            id: NodeId::default(),
            span: SourceSpan::default(),
            blocks: vec![para(value)],
        }
    }

    #[test]
    fn test_blocks_joined_by_newline() {
        let document = Document {
            blocks: vec![
                para("one"),
                BlockNode::ThematicBreak(ThematicBreak {
                    id: NodeId::default(),
                    span: SourceSpan::default(),
                }),
                BlockNode::CodeBlock(CodeBlock {
                    id: NodeId::default(),
                    span: SourceSpan::default(),
                    info: None,
                    code: "let x;".to_string(),
                }),
            ],
            ..Document::default()
        };
        assert_eq!(extract_plain_text(&document), "one\n\nlet x;");
    }

    #[test]
    fn test_list_items() {
        let item = |value: &str| ListItem {
            id: NodeId::default(),
            span: SourceSpan::default(),
            is_task: false,
            is_checked: None,
            blocks: vec![para(value)],
        };
        let document = Document {
            blocks: vec![BlockNode::List(List {
                id: NodeId::default(),
                span: SourceSpan::default(),
                is_ordered: false,
                start: None,
                items: vec![item("a"), item("b")],
            })],
            ..Document::default()
        };
        assert_eq!(extract_plain_text(&document), "a\nb");
    }

    #[test]
    fn test_table_cells_joined_by_tab() {
        let row = |a: &str, b: &str| TableRow {
            id: NodeId::default(),
            span: SourceSpan::default(),
            is_header: false,
            cells: vec![cell(a), cell(b)],
        };
        let document = Document {
            blocks: vec![BlockNode::Table(Table {
                id: NodeId::default(),
                span: SourceSpan::default(),
                rows: vec![row("h1", "h2"), row("c1", "c2")],
            })],
            ..Document::default()
        };
        assert_eq!(extract_plain_text(&document), "h1\th2\nc1\tc2");
    }
}
