//! Inline run layout: styling, tokenizing, and line breaking.

use std::mem;
use std::ops::Range;

use jitmark_ast::{InlineNode, NodeId, NodeKind, SourceSpan};

use crate::engine::LayoutContext;
use crate::geometry::RectF;
use crate::theme::{FontWeight, TextStyle, Theme};
use crate::tree::{InlineRunLayout, LineLayout};

/// A styled piece of inline text.
#[derive(Debug, Clone)]
struct Segment<'a> {
    id: NodeId,
    kind: NodeKind,
    span: SourceSpan,
    style: TextStyle,
    text: &'a str,
    url: Option<&'a str>,
    is_strikethrough: bool,
}

impl Segment<'_> {
    /// Source span of the token covering `chars` of the segment text. Exact
    /// when the text is a verbatim copy of its source, otherwise the whole
    /// segment span.
    fn token_span(&self, chars: Range<usize>, is_verbatim: bool) -> SourceSpan {
        if is_verbatim {
            SourceSpan::new(self.span.start + chars.start, self.span.start + chars.end)
        } else {
            self.span
        }
    }
}

fn flatten<'a>(
    inlines: &'a [InlineNode],
    style: &TextStyle,
    url: Option<&'a str>,
    is_strikethrough: bool,
    theme: &Theme,
    out: &mut Vec<Segment<'a>>,
) {
    for inline in inlines {
        match inline {
            InlineNode::Text(text) => out.push(Segment {
                id: text.id,
                kind: if url.is_some() {
                    NodeKind::Link
                } else {
                    NodeKind::Text
                },
                span: text.span,
                style: style.clone(),
                text: &text.text,
                url,
                is_strikethrough,
            }),
            InlineNode::InlineCode(code) => out.push(Segment {
                id: code.id,
                kind: NodeKind::InlineCode,
                span: code.span,
                style: theme.typography.inline_code.clone(),
                text: &code.code,
                url: None,
                is_strikethrough,
            }),
            InlineNode::LineBreak(br) => out.push(Segment {
                id: br.id,
                kind: NodeKind::LineBreak,
                span: br.span,
                style: style.clone(),
                text: "\n",
                url: None,
                is_strikethrough,
            }),
            InlineNode::Emphasis(e) => flatten(
                &e.inlines,
                &style.clone().with_italic(true),
                url,
                is_strikethrough,
                theme,
                out,
            ),
            InlineNode::Strong(s) => flatten(
                &s.inlines,
                &style.clone().with_weight(FontWeight::Bold),
                url,
                is_strikethrough,
                theme,
                out,
            ),
            InlineNode::Strikethrough(s) => flatten(&s.inlines, style, url, true, theme, out),
            InlineNode::Link(link) => {
                let link_style = style
                    .clone()
                    .with_foreground(theme.typography.link.foreground)
                    .with_underline(theme.typography.link.underline);
                flatten(
                    &link.inlines,
                    &link_style,
                    link.url.as_deref(),
                    is_strikethrough,
                    theme,
                    out,
                );
            }
            // An image is measured as its alt text.
            InlineNode::Image(image) => {
                flatten(&image.alt, style, url, is_strikethrough, theme, out)
            }
        }
    }
}

/// Splits `text` into alternating whitespace / non-whitespace byte ranges.
fn tokens(text: &str) -> impl Iterator<Item = (Range<usize>, bool)> + '_ {
    let mut rest = text.char_indices().peekable();
    std::iter::from_fn(move || {
        let (start, first) = rest.next()?;
        let is_whitespace = first.is_whitespace();
        let mut end = start + first.len_utf8();
        while let Some(&(i, c)) = rest.peek() {
            if c.is_whitespace() != is_whitespace {
                break;
            }
            end = i + c.len_utf8();
            rest.next();
        }
        Some((start..end, is_whitespace))
    })
}

struct LineBuilder {
    left: f32,
    base_line_height: f32,
    x: f32,
    y: f32,
    height: f32,
    runs: Vec<InlineRunLayout>,
    lines: Vec<LineLayout>,
}

impl LineBuilder {
    fn new(left: f32, top: f32, base_line_height: f32) -> Self {
        Self {
            left,
            base_line_height,
            x: left,
            y: top,
            height: base_line_height,
            runs: Vec::new(),
            lines: Vec::new(),
        }
    }

    fn flush(&mut self) {
        self.lines.push(LineLayout {
            y: self.y,
            height: self.height,
            runs: mem::take(&mut self.runs),
        });
        self.x = self.left;
        self.y += self.height;
        self.height = self.base_line_height;
    }

    /// The current line always ends up in the output, so a block has at
    /// least one line.
    fn finish(mut self) -> Vec<LineLayout> {
        self.flush();
        self.lines
    }
}

impl LayoutContext<'_> {
    /// Breaks `inlines` into lines no wider than `content_width`, starting at
    /// (`left`, `top`).
    ///
    /// Only non-whitespace tokens wrap, and never as the first run of a line,
    /// so an over-long word overflows rather than looping.
    pub(crate) fn layout_inlines(
        &self,
        inlines: &[InlineNode],
        base_style: &TextStyle,
        content_width: f32,
        left: f32,
        top: f32,
    ) -> Vec<LineLayout> {
        let mut segments = Vec::new();
        flatten(inlines, base_style, None, false, &self.theme, &mut segments);

        let inline_code_padding = self.theme.metrics.inline_code_padding * self.scale;
        let mut builder = LineBuilder::new(left, top, self.line_height(base_style));

        for segment in &segments {
            if segment.kind == NodeKind::LineBreak {
                builder.flush();
                continue;
            }

            let is_verbatim = segment.span.len() == segment.text.chars().count();
            let mut token_start = 0usize;
            for (range, is_whitespace) in tokens(segment.text) {
                let text = &segment.text[range];
                let token_chars = token_start..token_start + text.chars().count();
                token_start = token_chars.end;
                let is_code = segment.kind == NodeKind::InlineCode;
                let text_padding = if is_code { inline_code_padding } else { 0.0 };
                let mut m = self.measure_run(text, &segment.style, builder.x + text_padding);
                let width = m.width + text_padding * 2.0;
                let height = m.height + text_padding * 2.0;

                if !is_whitespace
                    && !builder.runs.is_empty()
                    && (builder.x - left) + width > content_width
                {
                    let wrapped_from = builder.x;
                    builder.flush();
                    let dx = builder.x - wrapped_from;
                    m.caret_x.iter_mut().for_each(|x| *x += dx);
                }

                builder.runs.push(InlineRunLayout {
                    id: segment.id,
                    kind: segment.kind,
                    span: segment.token_span(token_chars.clone(), is_verbatim),
                    bounds: RectF::new(builder.x, builder.y, width, height),
                    style: segment.style.clone(),
                    text: text.to_string(),
                    node_text_offset: token_chars.start,
                    caret_x: m.caret_x,
                    is_rtl: m.is_rtl,
                    url: segment.url.map(str::to_string),
                    is_strikethrough: segment.is_strikethrough,
                    is_code_block_line: false,
                });
                builder.x += width;
                builder.height = builder.height.max(height);
            }
        }

        builder.finish()
    }
}
