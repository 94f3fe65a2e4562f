//! Block layout.

use jitmark_ast::{
    BlockNode, BlockQuote, CodeBlock, Document, List, ListItem, NodeKind, Table, TableRow,
};
use tracing::debug;

use crate::geometry::{RectF, sanitize_extent, sanitize_scale, sanitize_width};
use crate::measure::{
    RunMeasurement, TextMeasurement, TextMeasurer, even_caret_x, fallback_line_height,
};
use crate::style::{BlockStyle, resolve_block_style};
use crate::theme::{TextStyle, Theme};
use crate::tree::{
    BlockLayout, BlockQuoteLayout, CodeBlockLayout, HeadingLayout, InlineRunLayout, LineLayout,
    ListItemLayout, ListLayout, MarkdownLayout, OpaqueBlockLayout, ParagraphLayout,
    TableCellLayout, TableLayout, TableRowLayout, ThematicBreakLayout,
};

/// Lays out `document` at `width`.
///
/// Pure and synchronous. Width, scale, theme metrics, and measurer output are
/// sanitized first, so every rectangle in the result is finite whatever the
/// input.
pub fn layout(
    document: &Document,
    width: f32,
    theme: &Theme,
    scale: f32,
    measurer: &dyn TextMeasurer,
) -> MarkdownLayout {
    let safe_width = sanitize_width(width);
    let safe_scale = sanitize_scale(scale);
    if safe_width != width || safe_scale != scale {
        debug!(
            "Sanitized layout input: width {} -> {}, scale {} -> {}",
            width, safe_width, scale, safe_scale
        );
    }

    let cx = LayoutContext {
        theme: theme.sanitized(),
        scale: safe_scale,
        measurer,
    };

    let mut y = 0.0;
    let blocks: Vec<BlockLayout> = document
        .blocks
        .iter()
        .map(|block| cx.layout_block(block, safe_width, &mut y))
        .collect();

    debug!("Laid out {} block(s), height {}", blocks.len(), y);

    MarkdownLayout {
        width: safe_width,
        height: y.max(0.0),
        blocks,
    }
}

/// Sanitized inputs shared by one layout pass.
pub(crate) struct LayoutContext<'a> {
    pub(crate) theme: Theme,
    pub(crate) scale: f32,
    measurer: &'a dyn TextMeasurer,
}

impl LayoutContext<'_> {
    pub(crate) fn measure(&self, text: &str, style: &TextStyle) -> TextMeasurement {
        let m = self.measurer.measure(text, style, self.scale);
        TextMeasurement::new(
            sanitize_extent(m.width, 0.0),
            sanitize_extent(m.height, self.line_height(style)),
        )
    }

    /// Measures a run and turns its caret stops into absolute x positions for
    /// a run whose text starts at `left`.
    pub(crate) fn measure_run(&self, text: &str, style: &TextStyle, left: f32) -> RunMeasurement {
        let m = self.measurer.measure_run(text, style, self.scale);
        let width = sanitize_extent(m.width, 0.0);
        let height = sanitize_extent(m.height, self.line_height(style));

        let len = text.chars().count();
        let mut carets = if m.caret_x.len() == len + 1 && len > 0 {
            m.caret_x
        } else {
            even_caret_x(len, width)
        };
        let mut floor = 0.0f32;
        for x in &mut carets {
            let value = *x;
            if value.is_finite() {
                floor = floor.max(value.clamp(0.0, width));
            }
            *x = floor;
        }
        let caret_x = carets
            .into_iter()
            .map(|x| if m.is_rtl { left + width - x } else { left + x })
            .collect();

        RunMeasurement {
            width,
            height,
            caret_x,
            is_rtl: m.is_rtl,
        }
    }

    pub(crate) fn line_height(&self, style: &TextStyle) -> f32 {
        sanitize_extent(
            self.measurer.line_height(style, self.scale),
            fallback_line_height(style, self.scale),
        )
    }

    /// Lays out one block with its top at `*y`, then advances `*y` past the
    /// block and its trailing spacing.
    fn layout_block(&self, block: &BlockNode, width: f32, y: &mut f32) -> BlockLayout {
        let style = resolve_block_style(block.kind(), &self.theme);
        let padding = style.padding * self.scale;
        let content_width = (width - padding * 2.0).max(0.0);
        let top = *y;

        let layout = match block {
            BlockNode::Paragraph(p) => {
                let lines = self.layout_inlines(
                    &p.inlines,
                    &self.theme.typography.paragraph,
                    content_width,
                    padding,
                    top + padding,
                );
                BlockLayout::Paragraph(ParagraphLayout {
                    id: p.id,
                    span: p.span,
                    bounds: RectF::new(0.0, top, width, padding * 2.0 + lines_height(&lines)),
                    style,
                    lines,
                })
            }
            BlockNode::Heading(h) => {
                let lines = self.layout_inlines(
                    &h.inlines,
                    self.theme.typography.heading(h.level),
                    content_width,
                    padding,
                    top + padding,
                );
                BlockLayout::Heading(HeadingLayout {
                    id: h.id,
                    span: h.span,
                    bounds: RectF::new(0.0, top, width, padding * 2.0 + lines_height(&lines)),
                    style,
                    level: h.level,
                    lines,
                })
            }
            BlockNode::CodeBlock(code) => {
                BlockLayout::CodeBlock(self.layout_code_block(code, width, style, top))
            }
            BlockNode::BlockQuote(quote) => {
                BlockLayout::BlockQuote(self.layout_block_quote(quote, width, style, top))
            }
            BlockNode::List(list) => BlockLayout::List(self.layout_list(list, width, style, top)),
            BlockNode::Table(table) => {
                BlockLayout::Table(self.layout_table(table, width, style, top))
            }
            BlockNode::ThematicBreak(hr) => BlockLayout::ThematicBreak(ThematicBreakLayout {
                id: hr.id,
                span: hr.span,
                bounds: RectF::new(0.0, top, width, self.scale),
                style,
            }),
            BlockNode::HtmlBlock(html) => BlockLayout::Opaque(OpaqueBlockLayout {
                id: html.id,
                kind: NodeKind::HtmlBlock,
                span: html.span,
                bounds: RectF::new(0.0, top, width, self.theme.metrics.block_spacing * self.scale),
                style,
            }),
        };

        *y = top + layout.bounds().height + style.spacing_after * self.scale;
        layout
    }

    /// Lays out `blocks` stacked from `top`; returns them with the y below the
    /// last one.
    fn layout_children(&self, blocks: &[BlockNode], width: f32, top: f32) -> (Vec<BlockLayout>, f32) {
        let mut y = top;
        let children = blocks
            .iter()
            .map(|child| self.layout_block(child, width, &mut y))
            .collect();
        (children, y)
    }

    fn layout_code_block(
        &self,
        code: &CodeBlock,
        width: f32,
        style: BlockStyle,
        top: f32,
    ) -> CodeBlockLayout {
        let text_style = &self.theme.typography.inline_code;
        let padding = style.padding * self.scale;
        let content_width = (width - padding * 2.0).max(0.0);
        let line_height = self.line_height(text_style);

        let normalized = code.code.replace("\r\n", "\n").replace('\r', "\n");
        let mut lines = Vec::new();
        let mut line_y = top + padding;
        let mut node_text_offset = 0;
        for text in normalized.split('\n') {
            let m = self.measure_run(text, text_style, padding);
            let run = InlineRunLayout {
                id: code.id,
                kind: NodeKind::InlineCode,
                span: code.span,
                bounds: RectF::new(padding, line_y, m.width.min(content_width), line_height),
                style: text_style.clone(),
                text: text.to_string(),
                node_text_offset,
                caret_x: m.caret_x,
                is_rtl: m.is_rtl,
                url: None,
                is_strikethrough: false,
                is_code_block_line: true,
            };
            lines.push(LineLayout {
                y: line_y,
                height: line_height,
                runs: vec![run],
            });
            line_y += line_height;
            node_text_offset += text.chars().count() + 1;
        }

        CodeBlockLayout {
            id: code.id,
            span: code.span,
            bounds: RectF::new(0.0, top, width, padding * 2.0 + lines_height(&lines)),
            style,
            lines,
        }
    }

    fn layout_block_quote(
        &self,
        quote: &BlockQuote,
        width: f32,
        style: BlockStyle,
        top: f32,
    ) -> BlockQuoteLayout {
        let padding = style.padding * self.scale;
        let content_width = (width - padding * 2.0).max(0.0);

        let (mut blocks, bottom) = self.layout_children(&quote.blocks, content_width, top + padding);
        blocks.iter_mut().for_each(|child| child.translate_x(padding));

        let content_height = (bottom - (top + padding)).max(0.0);
        BlockQuoteLayout {
            id: quote.id,
            span: quote.span,
            bounds: RectF::new(0.0, top, width, padding * 2.0 + content_height),
            style,
            blocks,
        }
    }

    fn layout_list(&self, list: &List, width: f32, style: BlockStyle, top: f32) -> ListLayout {
        let marker_style = &self.theme.typography.paragraph;
        let marker_gap = (self.theme.metrics.block_padding / 2.0).max(4.0) * self.scale;
        let fallback_line_height = self.line_height(marker_style);

        let markers: Vec<(String, f32)> = list
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let text = marker_text(list, item, i);
                let width = self.measure(&text, marker_style).width;
                (text, width)
            })
            .collect();

        let gutter = markers.iter().map(|(_, w)| *w).fold(0.0, f32::max) + marker_gap;
        let item_content_width = (width - gutter).max(0.0);

        let mut y = top;
        let mut items = Vec::with_capacity(list.items.len());
        for (item, (marker_text, marker_width)) in list.items.iter().zip(markers) {
            let item_top = y;
            let (mut blocks, bottom) = self.layout_children(&item.blocks, item_content_width, item_top);
            blocks.iter_mut().for_each(|child| child.translate_x(gutter));
            y = bottom;

            let (marker_y, marker_height) = blocks
                .first()
                .map(|first| match first.lines().first() {
                    Some(line) => (line.y, line.height),
                    None => (first.bounds().y, fallback_line_height),
                })
                .unwrap_or((item_top, fallback_line_height));

            items.push(ListItemLayout {
                id: item.id,
                span: item.span,
                bounds: RectF::new(0.0, item_top, width, y - item_top),
                style: resolve_block_style(NodeKind::ListItem, &self.theme),
                marker_text,
                marker_bounds: RectF::new(0.0, marker_y, marker_width, marker_height),
                blocks,
            });
        }

        ListLayout {
            id: list.id,
            span: list.span,
            bounds: RectF::new(0.0, top, width, y - top),
            style,
            is_ordered: list.is_ordered,
            items,
        }
    }

    fn layout_table(&self, table: &Table, width: f32, style: BlockStyle, top: f32) -> TableLayout {
        let padding = style.padding * self.scale;
        let content_width = (width - padding * 2.0).max(0.0);
        let column_count = table.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
        let column_width = if column_count == 0 {
            0.0
        } else {
            content_width / column_count as f32
        };
        let cell_padding = self.theme.metrics.block_padding / 2.0 * self.scale;

        let mut y = top + padding;
        let rows = table
            .rows
            .iter()
            .map(|row| {
                let row_layout = self.layout_table_row(row, padding, y, column_width, cell_padding);
                y += row_layout.bounds.height;
                row_layout
            })
            .collect();

        TableLayout {
            id: table.id,
            span: table.span,
            bounds: RectF::new(0.0, top, width, (y + padding) - top),
            style,
            column_count,
            rows,
        }
    }

    fn layout_table_row(
        &self,
        row: &TableRow,
        left: f32,
        top: f32,
        column_width: f32,
        cell_padding: f32,
    ) -> TableRowLayout {
        let inner_width = (column_width - cell_padding * 2.0).max(0.0);

        let mut cells: Vec<TableCellLayout> = row
            .cells
            .iter()
            .enumerate()
            .map(|(column, cell)| {
                let x = left + column as f32 * column_width;
                let (mut blocks, bottom) =
                    self.layout_children(&cell.blocks, inner_width, top + cell_padding);
                blocks.iter_mut().for_each(|child| child.translate_x(x + cell_padding));
                TableCellLayout {
                    id: cell.id,
                    span: cell.span,
                    bounds: RectF::new(x, top, column_width, bottom + cell_padding - top),
                    blocks,
                }
            })
            .collect();

        let row_height = cells.iter().map(|cell| cell.bounds.height).fold(0.0, f32::max);
        for cell in &mut cells {
            cell.bounds.height = row_height;
        }

        TableRowLayout {
            id: row.id,
            span: row.span,
            bounds: RectF::new(left, top, column_width * row.cells.len() as f32, row_height),
            is_header: row.is_header,
            cells,
        }
    }
}

fn marker_text(list: &List, item: &ListItem, index: usize) -> String {
    if item.is_task {
        let marker = if item.is_checked == Some(true) { "☑" } else { "☐" };
        return marker.to_string();
    }
    if list.is_ordered {
        let start = u64::from(list.start.unwrap_or(1));
        format!("{}.", start + index as u64)
    } else {
        "•".to_string()
    }
}

fn lines_height(lines: &[LineLayout]) -> f32 {
    lines.iter().map(|line| line.height).sum()
}
