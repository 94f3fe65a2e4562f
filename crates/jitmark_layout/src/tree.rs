//! Layout tree types and the viewport query.

use jitmark_ast::{NodeId, NodeKind, SourceSpan};
use serde::Serialize;

use crate::geometry::{RectF, finite_or_zero, non_negative};
use crate::style::BlockStyle;
use crate::theme::TextStyle;

/// Laid-out document: top-level blocks stacked vertically in document order.
///
/// Top-level block rectangles never overlap and their tops are
/// non-decreasing, which is what makes [`visible_block_indices`] a binary
/// search.
///
/// [`visible_block_indices`]: MarkdownLayout::visible_block_indices
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkdownLayout {
    pub width: f32,
    pub height: f32,
    pub blocks: Vec<BlockLayout>,
}

impl MarkdownLayout {
    pub fn blocks(&self) -> &[BlockLayout] {
        &self.blocks
    }

    /// Indices of top-level blocks intersecting the vertical band
    /// `[viewport_top - overscan, viewport_top + viewport_height + overscan]`.
    ///
    /// Degenerate arguments are sanitized: a non-finite top becomes `0`, a
    /// non-finite or negative height or overscan becomes `0`.
    pub fn visible_block_indices(
        &self,
        viewport_top: f32,
        viewport_height: f32,
        overscan: f32,
    ) -> Vec<usize> {
        let top = finite_or_zero(viewport_top);
        let overscan = non_negative(overscan);
        let band_top = top - overscan;
        let band_bottom = top + non_negative(viewport_height) + overscan;

        let first = self
            .blocks
            .partition_point(|block| block.bounds().bottom() <= band_top);

        self.blocks[first..]
            .iter()
            .take_while(|block| block.bounds().y < band_bottom)
            .enumerate()
            .filter(|(_, block)| block.bounds().bottom() > band_top)
            .map(|(offset, _)| first + offset)
            .collect()
    }
}

/// One line of inline runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayout {
    pub y: f32,
    pub height: f32,
    pub runs: Vec<InlineRunLayout>,
}

/// A measured piece of text on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineRunLayout {
    /// Id of the inline node the text came from.
    pub id: NodeId,
    pub kind: NodeKind,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: TextStyle,
    pub text: String,
    /// Char offset of `text` inside the displayed text of its node.
    pub node_text_offset: usize,
    /// Absolute x of the caret before each char of `text`, then after the
    /// last one, in logical order. Decreasing for right-to-left runs; empty
    /// for empty text.
    pub caret_x: Vec<f32>,
    pub is_rtl: bool,
    pub url: Option<String>,
    pub is_strikethrough: bool,
    pub is_code_block_line: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
    pub lines: Vec<LineLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
    pub level: u8,
    pub lines: Vec<LineLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlockLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
    pub lines: Vec<LineLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockQuoteLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
    pub blocks: Vec<BlockLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
    pub is_ordered: bool,
    pub items: Vec<ListItemLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItemLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
    /// `•`, `N.`, `☐`, or `☑`.
    pub marker_text: String,
    /// Aligned to the first line of the item's first block.
    pub marker_bounds: RectF,
    pub blocks: Vec<BlockLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
    pub column_count: usize,
    pub rows: Vec<TableRowLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRowLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub is_header: bool,
    pub cells: Vec<TableCellLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCellLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub blocks: Vec<BlockLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThematicBreakLayout {
    pub id: NodeId,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
}

/// A block laid out as an opaque placeholder (raw HTML).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpaqueBlockLayout {
    pub id: NodeId,
    pub kind: NodeKind,
    pub span: SourceSpan,
    pub bounds: RectF,
    pub style: BlockStyle,
}

/// A laid-out block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum BlockLayout {
    Paragraph(ParagraphLayout),
    Heading(HeadingLayout),
    CodeBlock(CodeBlockLayout),
    BlockQuote(BlockQuoteLayout),
    List(ListLayout),
    Table(TableLayout),
    ThematicBreak(ThematicBreakLayout),
    Opaque(OpaqueBlockLayout),
}

impl BlockLayout {
    pub fn id(&self) -> NodeId {
        match self {
            BlockLayout::Paragraph(b) => b.id,
            BlockLayout::Heading(b) => b.id,
            BlockLayout::CodeBlock(b) => b.id,
            BlockLayout::BlockQuote(b) => b.id,
            BlockLayout::List(b) => b.id,
            BlockLayout::Table(b) => b.id,
            BlockLayout::ThematicBreak(b) => b.id,
            BlockLayout::Opaque(b) => b.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            BlockLayout::Paragraph(_) => NodeKind::Paragraph,
            BlockLayout::Heading(_) => NodeKind::Heading,
            BlockLayout::CodeBlock(_) => NodeKind::CodeBlock,
            BlockLayout::BlockQuote(_) => NodeKind::BlockQuote,
            BlockLayout::List(_) => NodeKind::List,
            BlockLayout::Table(_) => NodeKind::Table,
            BlockLayout::ThematicBreak(_) => NodeKind::ThematicBreak,
            BlockLayout::Opaque(b) => b.kind,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            BlockLayout::Paragraph(b) => b.span,
            BlockLayout::Heading(b) => b.span,
            BlockLayout::CodeBlock(b) => b.span,
            BlockLayout::BlockQuote(b) => b.span,
            BlockLayout::List(b) => b.span,
            BlockLayout::Table(b) => b.span,
            BlockLayout::ThematicBreak(b) => b.span,
            BlockLayout::Opaque(b) => b.span,
        }
    }

    pub fn bounds(&self) -> RectF {
        match self {
            BlockLayout::Paragraph(b) => b.bounds,
            BlockLayout::Heading(b) => b.bounds,
            BlockLayout::CodeBlock(b) => b.bounds,
            BlockLayout::BlockQuote(b) => b.bounds,
            BlockLayout::List(b) => b.bounds,
            BlockLayout::Table(b) => b.bounds,
            BlockLayout::ThematicBreak(b) => b.bounds,
            BlockLayout::Opaque(b) => b.bounds,
        }
    }

    pub fn style(&self) -> &BlockStyle {
        match self {
            BlockLayout::Paragraph(b) => &b.style,
            BlockLayout::Heading(b) => &b.style,
            BlockLayout::CodeBlock(b) => &b.style,
            BlockLayout::BlockQuote(b) => &b.style,
            BlockLayout::List(b) => &b.style,
            BlockLayout::Table(b) => &b.style,
            BlockLayout::ThematicBreak(b) => &b.style,
            BlockLayout::Opaque(b) => &b.style,
        }
    }

    /// Lines of a text-bearing block; empty for containers.
    pub fn lines(&self) -> &[LineLayout] {
        match self {
            BlockLayout::Paragraph(b) => &b.lines,
            BlockLayout::Heading(b) => &b.lines,
            BlockLayout::CodeBlock(b) => &b.lines,
            _ => &[],
        }
    }

    /// Appends every line in this block's subtree in document order.
    pub fn collect_lines<'a>(&'a self, out: &mut Vec<&'a LineLayout>) {
        out.extend(self.lines());
        match self {
            BlockLayout::BlockQuote(b) => b.blocks.iter().for_each(|child| child.collect_lines(out)),
            BlockLayout::List(b) => b
                .items
                .iter()
                .flat_map(|item| &item.blocks)
                .for_each(|child| child.collect_lines(out)),
            BlockLayout::Table(b) => b
                .rows
                .iter()
                .flat_map(|row| &row.cells)
                .flat_map(|cell| &cell.blocks)
                .for_each(|child| child.collect_lines(out)),
            _ => {}
        }
    }

    /// Visits every rectangle in this block's subtree, including run and
    /// marker rectangles.
    pub fn for_each_rect(&self, f: &mut dyn FnMut(RectF)) {
        f(self.bounds());
        for line in self.lines() {
            for run in &line.runs {
                f(run.bounds);
            }
        }
        match self {
            BlockLayout::BlockQuote(b) => b.blocks.iter().for_each(|child| child.for_each_rect(f)),
            BlockLayout::List(b) => {
                for item in &b.items {
                    f(item.bounds);
                    f(item.marker_bounds);
                    item.blocks.iter().for_each(|child| child.for_each_rect(f));
                }
            }
            BlockLayout::Table(b) => {
                for row in &b.rows {
                    f(row.bounds);
                    for cell in &row.cells {
                        f(cell.bounds);
                        cell.blocks.iter().for_each(|child| child.for_each_rect(f));
                    }
                }
            }
            _ => {}
        }
    }

    /// Shifts the whole subtree horizontally.
    pub(crate) fn translate_x(&mut self, dx: f32) {
        match self {
            BlockLayout::Paragraph(b) => {
                b.bounds = b.bounds.translate(dx, 0.0);
                translate_lines(&mut b.lines, dx);
            }
            BlockLayout::Heading(b) => {
                b.bounds = b.bounds.translate(dx, 0.0);
                translate_lines(&mut b.lines, dx);
            }
            BlockLayout::CodeBlock(b) => {
                b.bounds = b.bounds.translate(dx, 0.0);
                translate_lines(&mut b.lines, dx);
            }
            BlockLayout::BlockQuote(b) => {
                b.bounds = b.bounds.translate(dx, 0.0);
                b.blocks.iter_mut().for_each(|child| child.translate_x(dx));
            }
            BlockLayout::List(b) => {
                b.bounds = b.bounds.translate(dx, 0.0);
                for item in &mut b.items {
                    item.bounds = item.bounds.translate(dx, 0.0);
                    item.marker_bounds = item.marker_bounds.translate(dx, 0.0);
                    item.blocks.iter_mut().for_each(|child| child.translate_x(dx));
                }
            }
            BlockLayout::Table(b) => {
                b.bounds = b.bounds.translate(dx, 0.0);
                for row in &mut b.rows {
                    row.bounds = row.bounds.translate(dx, 0.0);
                    for cell in &mut row.cells {
                        cell.bounds = cell.bounds.translate(dx, 0.0);
                        cell.blocks.iter_mut().for_each(|child| child.translate_x(dx));
                    }
                }
            }
            BlockLayout::ThematicBreak(b) => b.bounds = b.bounds.translate(dx, 0.0),
            BlockLayout::Opaque(b) => b.bounds = b.bounds.translate(dx, 0.0),
        }
    }
}

fn translate_lines(lines: &mut [LineLayout], dx: f32) {
    for run in lines.iter_mut().flat_map(|line| line.runs.iter_mut()) {
        run.bounds = run.bounds.translate(dx, 0.0);
        run.caret_x.iter_mut().for_each(|x| *x += dx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stacked(heights: &[f32], gap: f32) -> MarkdownLayout {
        let mut y = 0.0;
        let blocks = heights
            .iter()
            .enumerate()
            .map(|(i, &height)| {
                let block = BlockLayout::ThematicBreak(ThematicBreakLayout {
                    id: NodeId::from_raw(i as u64 + 1),
                    span: SourceSpan::EMPTY,
                    bounds: RectF::new(0.0, y, 100.0, height),
                    style: BlockStyle::TRANSPARENT,
                });
                y += height + gap;
                block
            })
            .collect();
        MarkdownLayout {
            width: 100.0,
            height: y,
            blocks,
        }
    }

    fn linear_scan(layout: &MarkdownLayout, top: f32, height: f32, overscan: f32) -> Vec<usize> {
        let band = RectF::new(0.0, top - overscan, 1.0, height + overscan * 2.0);
        layout
            .blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| {
                let bounds = b.bounds();
                bounds.bottom() > band.y && bounds.y < band.bottom()
            })
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_visible_blocks_in_band() {
        let layout = stacked(&[10.0; 10], 5.0);
        // Blocks start every 15 units.
        assert_eq!(layout.visible_block_indices(20.0, 20.0, 0.0), vec![1, 2]);
        assert_eq!(layout.visible_block_indices(20.0, 20.0, 11.0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_edges_do_not_count() {
        let layout = stacked(&[10.0, 10.0], 0.0);
        assert_eq!(layout.visible_block_indices(10.0, 0.0, 0.0), Vec::<usize>::new());
        assert_eq!(layout.visible_block_indices(10.0, 1.0, 0.0), vec![1]);
    }

    #[test]
    fn test_matches_linear_scan() {
        let layout = stacked(&[3.0, 0.0, 12.0, 7.5, 0.0, 0.0, 20.0, 1.0], 2.0);
        for top in [-10.0, 0.0, 3.0, 4.5, 11.0, 30.0, 80.0] {
            for height in [0.0, 1.0, 10.0, 100.0] {
                assert_eq!(
                    layout.visible_block_indices(top, height, 1.5),
                    linear_scan(&layout, top, height, 1.5),
                    "top={top} height={height}"
                );
            }
        }
    }

    #[test]
    fn test_degenerate_viewport() {
        let layout = stacked(&[10.0; 4], 0.0);
        assert_eq!(layout.visible_block_indices(f32::NAN, f32::INFINITY, f32::NAN), Vec::<usize>::new());
        assert_eq!(layout.visible_block_indices(5.0, -3.0, -1.0), vec![0]);
        assert!(MarkdownLayout::default().visible_block_indices(0.0, 100.0, 0.0).is_empty());
    }

    #[test]
    fn test_translate_moves_runs() {
        let mut block = BlockLayout::Paragraph(ParagraphLayout {
            id: NodeId::ROOT,
            span: SourceSpan::EMPTY,
            bounds: RectF::new(0.0, 0.0, 50.0, 10.0),
            style: BlockStyle::TRANSPARENT,
            lines: vec![LineLayout {
                y: 0.0,
                height: 10.0,
                runs: vec![InlineRunLayout {
                    id: NodeId::ROOT,
                    kind: NodeKind::Text,
                    span: SourceSpan::EMPTY,
                    bounds: RectF::new(2.0, 0.0, 5.0, 10.0),
                    style: crate::Theme::light().typography.paragraph,
                    text: "hi".to_string(),
                    node_text_offset: 0,
                    caret_x: vec![2.0, 4.5, 7.0],
                    is_rtl: false,
                    url: None,
                    is_strikethrough: false,
                    is_code_block_line: false,
                }],
            }],
        });

        block.translate_x(8.0);
        assert_eq!(block.bounds().x, 8.0);
        assert_eq!(block.lines()[0].runs[0].bounds.x, 10.0);
        assert_eq!(block.lines()[0].runs[0].caret_x, vec![10.0, 12.5, 15.0]);
    }
}
