//! Hit testing and selection geometry over a laid-out document.
//!
//! Positions address a caret stop inside one run of one line: `(line, run,
//! text_offset)`, where `text_offset` counts chars of the run text. Lines are
//! numbered in document order across the whole layout, nested blocks
//! included.

use std::cmp::Ordering;
use std::ops::ControlFlow;

use jitmark_ast::visitor::walk_document;
use jitmark_ast::{
    BlockNode, InlineNode, MarkdownDocumentModel, NodeId, NodeKind, NodeRef, SourceSpan,
    VisitResult, Visitor,
};
use serde::Serialize;

use crate::geometry::RectF;
use crate::tree::{InlineRunLayout, LineLayout, MarkdownLayout};

/// A caret position found by hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitTestResult {
    pub line_index: usize,
    pub run_index: usize,
    /// Char offset into the run text, `0..=len`.
    pub text_offset: usize,
    /// Absolute x of the caret.
    pub caret_x: f32,
}

impl HitTestResult {
    /// Document-order key of the position.
    pub fn position(&self) -> (usize, usize, usize) {
        (self.line_index, self.run_index, self.text_offset)
    }

    fn cmp_position(&self, other: &HitTestResult) -> Ordering {
        self.position().cmp(&other.position())
    }
}

/// A selection between two caret positions.
///
/// `anchor` is where the selection started and `active` where it currently
/// ends; either may come first in document order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectionRange {
    pub anchor: HitTestResult,
    pub active: HitTestResult,
}

impl SelectionRange {
    pub fn new(anchor: HitTestResult, active: HitTestResult) -> Self {
        Self { anchor, active }
    }

    /// An empty selection at `caret`.
    pub fn collapsed(caret: HitTestResult) -> Self {
        Self::new(caret, caret)
    }

    /// Moves the active end, keeping the anchor.
    pub fn extend_to(self, active: HitTestResult) -> Self {
        Self::new(self.anchor, active)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor.position() == self.active.position()
    }

    /// The earlier end in document order.
    pub fn start(&self) -> HitTestResult {
        match self.anchor.cmp_position(&self.active) {
            Ordering::Greater => self.active,
            _ => self.anchor,
        }
    }

    /// The later end in document order.
    pub fn end(&self) -> HitTestResult {
        match self.anchor.cmp_position(&self.active) {
            Ordering::Greater => self.anchor,
            _ => self.active,
        }
    }

    /// The same range with `anchor` first.
    pub fn normalized(&self) -> Self {
        Self::new(self.start(), self.end())
    }
}

/// Flat, document-order view of every line in a layout.
///
/// Build one per layout and reuse it for every pointer event.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    lines: Vec<&'a LineLayout>,
}

impl<'a> LineIndex<'a> {
    pub fn new(layout: &'a MarkdownLayout) -> Self {
        let mut lines = Vec::new();
        for block in &layout.blocks {
            block.collect_lines(&mut lines);
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> Option<&'a LineLayout> {
        self.lines.get(index).copied()
    }

    /// The caret position under (`x`, `y`).
    ///
    /// Returns `None` when no line's vertical band contains `y`. When lines
    /// share a band (table cells), the one horizontally closest to `x` wins.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<HitTestResult> {
        self.hit(x, y, false)
    }

    /// Like [`hit_test`](Self::hit_test), but snaps to the vertically
    /// nearest line when `y` falls between or outside lines.
    pub fn hit_test_nearest(&self, x: f32, y: f32) -> Option<HitTestResult> {
        self.hit(x, y, true)
    }

    /// Highlight rectangles for `range`, one per touched line.
    ///
    /// The first line starts at the start caret, the last line ends at the
    /// end caret, and lines in between are covered from their leftmost to
    /// their rightmost run. Empty rectangles are skipped.
    pub fn selection_rects(&self, range: &SelectionRange) -> Vec<RectF> {
        if range.is_collapsed() {
            return Vec::new();
        }
        let (start, end) = (range.start(), range.end());
        let last = end.line_index.min(self.lines.len().saturating_sub(1));

        let mut rects = Vec::new();
        for line_index in start.line_index..=last {
            let Some(line) = self.line(line_index) else {
                break;
            };
            let Some((line_left, line_right)) = line_extent(line) else {
                continue;
            };
            let from = if line_index == start.line_index {
                self.caret_x(&start)
            } else {
                line_left
            };
            let to = if line_index == end.line_index {
                self.caret_x(&end)
            } else {
                line_right
            };
            let rect = RectF::new(from.min(to), line.y, (to - from).abs(), line.height);
            if rect.width > 0.0 && rect.height > 0.0 {
                rects.push(rect);
            }
        }
        rects
    }

    /// Source offset, in chars, of a caret position.
    pub fn source_offset(
        &self,
        model: &MarkdownDocumentModel,
        position: &HitTestResult,
    ) -> Option<usize> {
        let run = self.run(position)?;
        let len = run.text.chars().count();
        let offset = position.text_offset.min(len);

        let source_offset = if run.kind == NodeKind::InlineCode {
            let (span, code) = find_code(model, run.id)?;
            let raw = model.slice(span)?;
            let content_start = raw
                .find(code)
                .map_or(0, |byte| raw[..byte].chars().count());
            (span.start + content_start + run.node_text_offset + offset).min(span.end)
        } else if run.span.len() == len {
            run.span.start + offset
        } else {
            // Escaped or decoded text: the run only knows its node span.
            run.span.start + (run.node_text_offset + offset).min(run.span.len())
        };

        Some(source_offset.min(model.source_index().char_len()))
    }

    /// Source span covered by `range`.
    pub fn source_span(
        &self,
        model: &MarkdownDocumentModel,
        range: &SelectionRange,
    ) -> Option<SourceSpan> {
        let start = self.source_offset(model, &range.start())?;
        let end = self.source_offset(model, &range.end())?;
        Some(SourceSpan::new(start.min(end), start.max(end)))
    }

    /// Source text covered by `range`.
    pub fn selected_source<'m>(
        &self,
        model: &'m MarkdownDocumentModel,
        range: &SelectionRange,
    ) -> Option<&'m str> {
        model.slice(self.source_span(model, range)?)
    }

    fn run(&self, position: &HitTestResult) -> Option<&'a InlineRunLayout> {
        self.line(position.line_index)?.runs.get(position.run_index)
    }

    /// Current caret x of `position`, falling back to the recorded value when
    /// the position no longer resolves.
    fn caret_x(&self, position: &HitTestResult) -> f32 {
        self.run(position)
            .map_or(position.caret_x, |run| caret_x_at(run, position.text_offset))
    }

    fn hit(&self, x: f32, y: f32, nearest: bool) -> Option<HitTestResult> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let mut best: Option<(usize, f32, f32)> = None;
        for (line_index, line) in self.lines.iter().enumerate() {
            let Some((left, right)) = line_extent(line) else {
                continue;
            };
            let dy = distance_to(y, line.y, line.y + line.height);
            if !nearest && dy > 0.0 {
                continue;
            }
            let dx = distance_to(x, left, right);
            let is_better = best.is_none_or(|(_, best_dy, best_dx)| {
                dy < best_dy || (dy == best_dy && dx < best_dx)
            });
            if is_better {
                best = Some((line_index, dy, dx));
            }
        }

        let (line_index, _, _) = best?;
        let line = self.lines[line_index];
        let run_index = run_at(line, x)?;
        let run = &line.runs[run_index];
        let text_offset = caret_offset_at(run, x);
        Some(HitTestResult {
            line_index,
            run_index,
            text_offset,
            caret_x: caret_x_at(run, text_offset),
        })
    }
}

/// Char offset of the caret stop of `run` closest to `x`.
///
/// Runs without caret stops map `x` proportionally across their bounds.
pub fn caret_offset_at(run: &InlineRunLayout, x: f32) -> usize {
    if run.caret_x.is_empty() {
        let len = run.text.chars().count();
        if len == 0 || run.bounds.width <= 0.0 {
            return 0;
        }
        let fraction = ((x - run.bounds.x) / run.bounds.width).clamp(0.0, 1.0);
        return (fraction * len as f32).round() as usize;
    }

    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (offset, caret) in run.caret_x.iter().enumerate() {
        let distance = (caret - x).abs();
        if distance < best_distance {
            best = offset;
            best_distance = distance;
        }
    }
    best
}

/// Absolute x of the caret before char `offset` of `run`.
pub fn caret_x_at(run: &InlineRunLayout, offset: usize) -> f32 {
    if let Some(&x) = run
        .caret_x
        .get(offset)
        .or_else(|| run.caret_x.last().filter(|_| offset > 0))
    {
        return x;
    }
    let len = run.text.chars().count();
    if len == 0 {
        return run.bounds.x;
    }
    run.bounds.x + run.bounds.width * offset.min(len) as f32 / len as f32
}

/// Leftmost and rightmost run edges, `None` for a line without runs.
fn line_extent(line: &LineLayout) -> Option<(f32, f32)> {
    line.runs.iter().fold(None, |extent, run| {
        let (left, right) = (run.bounds.x, run.bounds.right());
        Some(match extent {
            Some((l, r)) => (f32::min(l, left), f32::max(r, right)),
            None => (left, right),
        })
    })
}

/// Index of the run under `x`, or the horizontally closest one.
fn run_at(line: &LineLayout, x: f32) -> Option<usize> {
    line.runs
        .iter()
        .enumerate()
        .map(|(index, run)| (index, distance_to(x, run.bounds.x, run.bounds.right())))
        .fold(None, |best: Option<(usize, f32)>, (index, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((index, distance)),
        })
        .map(|(index, _)| index)
}

/// Distance from `value` to the interval `[low, high)`, `0` inside it.
fn distance_to(value: f32, low: f32, high: f32) -> f32 {
    if value < low {
        low - value
    } else if value >= high {
        value - high
    } else {
        0.0
    }
}

/// Finds the code node with `id` and returns its span and content.
fn find_code(model: &MarkdownDocumentModel, id: NodeId) -> Option<(SourceSpan, &str)> {
    struct CodeContentFinder<'a> {
        id: NodeId,
        found: Option<(SourceSpan, &'a str)>,
    }

    impl<'a> Visitor<'a> for CodeContentFinder<'a> {
        fn enter_node(&mut self, node: NodeRef<'a>) -> VisitResult {
            if node.id() != self.id {
                return ControlFlow::Continue(());
            }
            self.found = match node {
                NodeRef::Block(BlockNode::CodeBlock(code)) => Some((code.span, code.code.as_str())),
                NodeRef::Inline(InlineNode::InlineCode(code)) => {
                    Some((code.span, code.code.as_str()))
                }
                _ => None,
            };
            ControlFlow::Break(())
        }
    }

    let mut finder = CodeContentFinder { id, found: None };
    walk_document(&mut finder, model.document()).break_value()?;
    finder.found
}
