//! End-to-end properties of the parse, layout and shaping pipeline.

use jitmark_ast::visitor::collect_nodes;
use jitmark_ast::{BlockNode, InlineNode, MarkdownDocumentModel, NodeId, SourceSpan};
use jitmark_core::{EngineConfig, MarkdownEngine};
use jitmark_layout::{
    BlockLayout, FixedAdvanceMeasurer, MarkdownLayout, RectF, TextMeasurer, Theme, layout,
};
use jitmark_parser::MarkdownParser;
use jitmark_plugin::github::GitHubEnrichmentOptions;
use jitmark_shaping::{Glyph, GraphemeBackend, TextShaper, build_caret_x};
use jitmark_text::{SpanMappingPolicy, TextOffsetMap};
use rayon::prelude::*;
use rstest::rstest;

const CORPUS: &[&str] = &[
    "",
    "plain",
    "# Title\n\nHello **world** from *Skia*.",
    "Setext\n======\n\nline one  \nline two\\\nline three",
    "> quote with `code` and [link](https://example.com \"t\")\n>\n> > nested",
    "- a\n- b\n  - nested\n- [ ] todo\n- [x] done\n\n3. three\n4. four",
    "```rust\nfn main() {}\r\n```\n\n    indented\n    code",
    "| a | b |\n|---|:-:|\n| 1 | ~~2~~ |\n| ![alt](i.png) | `x` |",
    "***\n\n<div>html</div>\n\ntext <span>inline</span>",
    "[ref] and ![img][ref]\n\n[ref]: https://example.com/r",
    "héllo wörld 日本語 👍🏽 שלום مرحبا\n\n* émphasis *",
    "@octocat fixed #12 in 0123456789abcdef0123456789abcdef01234567",
    "Escaped \\@user and \\#1 and &#64;user",
    "1. a\n\n   para\n\n   > q\n2. b\n\n- ```\n  code in item\n  ```",
];

fn github_engine(allow_short_shas: bool) -> MarkdownEngine {
    let github = GitHubEnrichmentOptions {
        allow_short_shas,
        ..GitHubEnrichmentOptions::for_repository("octo/repo")
    };
    MarkdownEngine::new(EngineConfig {
        github: Some(github),
        ..EngineConfig::default()
    })
    .unwrap()
}

fn links(model: &MarkdownDocumentModel) -> Vec<(SourceSpan, Option<String>)> {
    collect_nodes(model.document())
        .into_iter()
        .filter_map(|node| match node {
            jitmark_ast::visitor::NodeRef::Inline(InlineNode::Link(link)) => {
                Some((link.span, link.url.clone()))
            }
            _ => None,
        })
        .collect()
}

fn shaper() -> TextShaper<GraphemeBackend> {
    TextShaper::new(GraphemeBackend::default())
}

fn all_rects(layout: &MarkdownLayout) -> Vec<RectF> {
    let mut rects = Vec::new();
    for block in layout.blocks() {
        block.for_each_rect(&mut |rect| rects.push(rect));
    }
    rects
}

mod determinism {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(model: &MarkdownDocumentModel) -> Vec<(NodeId, SourceSpan)> {
        collect_nodes(model.document())
            .iter()
            .map(|node| (node.id(), node.span()))
            .collect()
    }

    #[test]
    fn same_ids_across_parses_and_parsers() {
        let engine = github_engine(true);
        for source in CORPUS {
            let first = ids(&engine.parse(source));
            let second = ids(&engine.parse(source));
            let fresh = ids(&github_engine(true).parse(source));
            assert_eq!(first, second, "{source:?}");
            assert_eq!(first, fresh, "{source:?}");
        }
    }

    #[test]
    fn same_ids_across_threads() {
        let engine = github_engine(true);
        let expected: Vec<_> = CORPUS.iter().map(|s| ids(&engine.parse(s))).collect();
        let parallel: Vec<_> = CORPUS.par_iter().map(|s| ids(&engine.parse(s))).collect();
        assert_eq!(expected, parallel);
    }

    #[test]
    fn layout_is_deterministic() {
        let engine = github_engine(true);
        let shaper = shaper();
        for source in CORPUS {
            let model = engine.parse(source);
            assert_eq!(engine.layout(&model, &shaper), engine.layout(&model, &shaper));
        }
    }
}

mod spans {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_span_is_inside_the_source() {
        let engine = github_engine(true);
        for source in CORPUS {
            let model = engine.parse(source);
            let char_len = source.chars().count();
            assert_eq!(model.document().span, SourceSpan::new(0, char_len));
            for node in collect_nodes(model.document()) {
                let span = node.span();
                assert!(span.start <= span.end, "{source:?}: {span:?}");
                assert!(span.end <= char_len, "{source:?}: {span:?}");
                assert!(model.slice(span).is_some(), "{source:?}: {span:?}");
            }
            for entry in model.source_map().entries() {
                assert!(entry.span.end <= char_len);
            }
        }
    }

    #[test]
    fn non_ascii_spans_count_chars() {
        let engine = github_engine(true);
        let source = "héllo wörld 日本語 👍🏽\n\n> *émphasis* in `cödé`\n\n- 項目 @bob";
        let model = engine.parse(source);
        assert_eq!(model.document().span.end, source.chars().count());

        for node in collect_nodes(model.document()) {
            let span = node.span();
            let slice = model.slice(span).unwrap();
            assert_eq!(slice.chars().count(), span.len(), "{span:?}");
            if let jitmark_ast::visitor::NodeRef::Inline(InlineNode::Text(text)) = node
                && text.text.chars().count() == span.len()
            {
                assert_eq!(slice, text.text, "{span:?}");
            }
        }
    }

    #[rstest]
    #[case::after_two_byte_char("é @bob", (2, 6))]
    #[case::after_cjk("日本 @bob", (3, 7))]
    #[case::after_emoji("👍🏽 @bob", (3, 7))]
    fn mention_span_counts_chars(#[case] source: &str, #[case] expected: (usize, usize)) {
        let model = github_engine(true).parse(source);
        assert_eq!(model.document().span, SourceSpan::new(0, source.chars().count()));

        let links = links(&model);
        assert_eq!(links.len(), 1);
        let span = links[0].0;
        assert_eq!((span.start, span.end), expected);
        assert_eq!(model.slice(span), Some("@bob"));
    }

    #[test]
    fn empty_input_has_no_blocks() {
        let model = MarkdownParser::new().parse("");
        assert!(model.blocks().is_empty());
        assert_eq!(model.source(), "");
    }
}

mod enrichment {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::glued_mention("a@bob", vec![])]
    #[case::trailing_punctuation("@bob!", vec![(0, 4)])]
    #[case::csharp("C# #7", vec![(3, 5)])]
    #[case::in_code("`@bob`", vec![])]
    fn mention_and_issue_boundaries(#[case] source: &str, #[case] expected: Vec<(usize, usize)>) {
        let model = github_engine(true).parse(source);
        let spans: Vec<(usize, usize)> = links(&model)
            .iter()
            .map(|(span, _)| (span.start, span.end))
            .collect();
        assert_eq!(spans, expected);
    }

    #[test]
    fn full_sha_links_once() {
        let sha = "0123456789abcdef0123456789abcdef01234567";
        let source = format!("fixed in {sha}.");
        let model = github_engine(false).parse(&source);

        let links = links(&model);
        assert_eq!(links.len(), 1);
        assert_eq!(model.slice(links[0].0), Some(sha));
        assert_eq!(
            links[0].1.as_deref(),
            Some(format!("https://github.com/octo/repo/commit/{sha}").as_str())
        );
    }

    #[test]
    fn thirty_nine_hex_chars_do_not_link() {
        let source = format!("fixed in {}.", &"0123456789abcdef".repeat(3)[..39]);
        assert!(links(&github_engine(false).parse(&source)).is_empty());
    }

    #[test]
    fn short_sha_needs_short_mode() {
        let source = "fixed in abc1234.";
        assert_eq!(links(&github_engine(true).parse(source)).len(), 1);
        assert!(links(&github_engine(false).parse(source)).is_empty());
    }
}

mod offset_map {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rendered_word_maps_to_source_word() {
        let source = "Hello **world** from *Skia*.";
        let model = MarkdownParser::new().parse(source);
        let inlines = model.blocks()[0].inlines().unwrap();
        let map = TextOffsetMap::build_for_inlines(source, inlines, SpanMappingPolicy::InnerContent);

        let start = map.rendered_text().find("world").unwrap();
        let span = map.map_rendered_range_to_source_span(start, 5);
        assert_eq!(span.slice(source), Some("world"));

        let start = map.rendered_text().find("Skia").unwrap();
        let span = map.map_rendered_range_to_source_span(start, 4);
        assert_eq!(span.slice(source), Some("Skia"));
    }

    #[test]
    fn rendered_word_after_wide_chars() {
        let source = "日本 **wörld** ok";
        let model = MarkdownParser::new().parse(source);
        let inlines = model.blocks()[0].inlines().unwrap();
        let map = TextOffsetMap::build_for_inlines(source, inlines, SpanMappingPolicy::InnerContent);

        assert_eq!(map.rendered_text(), "日本 wörld ok");
        let span = map.map_rendered_range_to_source_span(3, 5);
        assert_eq!(span, SourceSpan::new(5, 10));
        assert_eq!(model.slice(span), Some("wörld"));
    }

    #[test]
    fn every_paragraph_maps_inside_its_block() {
        let parser = MarkdownParser::new();
        for source in CORPUS {
            let model = parser.parse(source);
            for block in model.blocks() {
                let Some(inlines) = block.inlines() else {
                    continue;
                };
                let map = TextOffsetMap::build_for_inlines(source, inlines, SpanMappingPolicy::default());
                let span = map.map_rendered_range_to_source_span(0, map.len());
                if !span.is_empty() {
                    assert!(block.span().encloses(&span), "{source:?}: {span:?}");
                }
            }
        }
    }
}

mod tasks {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case("- [ ] todo", true, Some(false))]
    #[case("- [x] done", true, Some(true))]
    #[case("- [X] done", true, Some(true))]
    #[case("- plain", false, None)]
    fn task_state(#[case] source: &str, #[case] is_task: bool, #[case] checked: Option<bool>) {
        let model = MarkdownParser::new().parse(source);
        let BlockNode::List(list) = &model.blocks()[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].is_task, is_task);
        assert_eq!(list.items[0].is_checked, checked);
    }
}

mod carets {
    use super::*;
    use pretty_assertions::assert_eq;
    use jitmark_layout::{ColorRgba, TextStyle};

    const TEXTS: &[&str] = &[
        "a",
        "hello world",
        "e\u{301}e\u{301}",
        "👍🏽👨‍👩‍👧",
        "日本語テキスト",
        "שלום עולם",
        "مرحبا بالعالم",
        "mixed שלום text",
        " leading and trailing ",
    ];

    #[test]
    fn carets_are_monotonic_and_reach_width() {
        let shaper = shaper();
        for text in TEXTS {
            for scale in [0.5, 1.0, 2.5, f32::NAN, -1.0] {
                for rtl in [false, true] {
                    let style = TextStyle::new(ColorRgba::BLACK);
                    let result = shaper.shape(text, &style, scale, rtl);
                    let len = text.chars().count();

                    assert_eq!(result.caret_x.len(), len + 1, "{text:?}");
                    assert!(
                        result.caret_x.windows(2).all(|p| p[0] <= p[1]),
                        "{text:?}: {:?}",
                        result.caret_x
                    );
                    assert!(result.caret_x[len] >= result.width);
                    assert!(result.caret_x.iter().all(|x| x.is_finite()));
                    assert!(result.width >= shaper.measure(text, &style, scale).width - 1e-3);
                }
            }
        }
    }

    #[test]
    fn arbitrary_glyph_soup_is_monotonic() {
        // Deterministic pseudo-random glyph positions and clusters.
        let mut seed = 0x2545_f491_u32;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };

        for _ in 0..500 {
            let len = (next() % 20) as usize + 1;
            let glyphs: Vec<Glyph> = (0..next() % 24)
                .map(|_| Glyph::new((next() % 26) as usize, (next() % 400) as f32 / 4.0))
                .collect();
            let width = (next() % 120) as f32;

            let caret = build_caret_x(len, &glyphs, width);
            assert_eq!(caret.len(), len + 1);
            assert!(caret.windows(2).all(|p| p[0] <= p[1]), "{glyphs:?} -> {caret:?}");
            assert!(caret[len] >= width);
        }
    }
}

mod layout_invariants {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEGENERATE: &[f32] = &[f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -10.0, 0.0];

    fn hostile_theme(value: f32) -> Theme {
        let mut theme = Theme::default();
        theme.metrics.block_padding = value;
        theme.metrics.block_spacing = value;
        theme.metrics.inline_code_padding = value;
        theme.metrics.corner_radius = value;
        theme.typography.paragraph.font_size = value;
        theme.typography.heading1.font_size = value;
        theme.typography.inline_code.font_size = value;
        theme
    }

    fn list_source(items: usize) -> String {
        (0..items).map(|i| format!("{}. item {}\n", i + 1, i)).collect()
    }

    fn assert_finite(layout: &MarkdownLayout) {
        assert!(layout.width.is_finite() && layout.height.is_finite());
        for block in layout.blocks() {
            let style = block.style();
            assert!(style.padding.is_finite() && style.spacing_after.is_finite());
            assert!(style.corner_radius.is_finite());
            for line in block.lines() {
                assert!(line.y.is_finite() && line.height.is_finite());
            }
        }
        for rect in all_rects(layout) {
            assert!(rect.is_finite(), "{rect:?}");
            assert!(rect.width >= 0.0 && rect.height >= 0.0, "{rect:?}");
        }
    }

    #[test]
    fn degenerate_width_and_scale() {
        let parser = MarkdownParser::new();
        let measurer = FixedAdvanceMeasurer::default();
        for source in CORPUS {
            let model = parser.parse(source);
            for &value in DEGENERATE.iter().chain([1.0, 1e30].iter()) {
                let width_only = layout(model.document(), value, &Theme::default(), 1.0, &measurer);
                assert_finite(&width_only);
                let scale_only = layout(model.document(), 400.0, &Theme::default(), value, &measurer);
                assert_finite(&scale_only);
            }
        }
    }

    #[test]
    fn degenerate_theme_metrics() {
        let parser = MarkdownParser::new();
        let shaper = shaper();
        for source in CORPUS {
            let model = parser.parse(source);
            for &value in DEGENERATE {
                let result = layout(model.document(), 300.0, &hostile_theme(value), value, &shaper);
                assert_finite(&result);
            }
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(50)]
    #[case(2000)]
    fn large_item_counts(#[case] items: usize) {
        let source = list_source(items);
        let model = MarkdownParser::new().parse(&source);
        let measurer: &dyn TextMeasurer = &FixedAdvanceMeasurer::default();

        for &value in [f32::NAN, f32::INFINITY, 1.0].iter() {
            let result = layout(model.document(), value, &hostile_theme(value), value, measurer);
            assert_finite(&result);
            if items > 0 {
                let BlockLayout::List(list) = &result.blocks()[0] else {
                    panic!("expected list layout");
                };
                assert_eq!(list.items.len(), items);
            }
        }
    }

    #[test]
    fn top_level_blocks_never_overlap() {
        let parser = MarkdownParser::new();
        let shaper = shaper();
        for source in CORPUS {
            let model = parser.parse(source);
            for width in [0.0, 40.0, 300.0, 1200.0] {
                for scale in [0.5, 1.0, 3.0] {
                    let result = layout(model.document(), width, &Theme::default(), scale, &shaper);
                    let blocks = result.blocks();
                    for (i, a) in blocks.iter().enumerate() {
                        for b in &blocks[i + 1..] {
                            assert_eq!(
                                a.bounds().intersection_area(&b.bounds()),
                                0.0,
                                "{source:?} at width {width}"
                            );
                            assert!(a.bounds().bottom() <= b.bounds().y);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn visible_query_matches_linear_scan() {
        let engine = github_engine(true);
        let source = CORPUS.join("\n\n");
        let model = engine.parse(&source);
        let result = engine.layout(&model, &shaper());

        let mut top = -50.0;
        while top < result.height + 50.0 {
            for (height, overscan) in [(0.0, 0.0), (40.0, 0.0), (120.0, 30.0)] {
                let expected: Vec<usize> = result
                    .blocks()
                    .iter()
                    .enumerate()
                    .filter(|(_, block)| {
                        let bounds = block.bounds();
                        bounds.bottom() > top - overscan && bounds.y < top + height + overscan
                    })
                    .map(|(index, _)| index)
                    .collect();
                assert_eq!(result.visible_block_indices(top, height, overscan), expected);
            }
            top += 17.0;
        }
    }
}
