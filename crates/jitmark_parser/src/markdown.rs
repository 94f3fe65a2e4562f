//! Markdown parser using markdown-rs (wooorm/markdown-rs).
//!
//! Grammar recognition is delegated to the `markdown` crate's mdast output;
//! this module owns the conversion into the jitmark document model.

use std::sync::Arc;

use jitmark_ast::MarkdownDocumentModel;
use jitmark_plugin::PluginRegistry;
use markdown::{Constructs, ParseOptions, to_mdast};
use tracing::{debug, warn};

use crate::ParseError;
use crate::ParserOptions;
use crate::builder::DocumentBuilder;

/// Markdown parser.
///
/// Configured once at construction; parsing is a pure function of the source
/// and may run on any number of threads at once.
///
/// Supports CommonMark plus GFM (tables, strikethrough, autolinks, task
/// lists, footnotes) and whatever the registered plugins enable.
#[derive(Debug, Clone)]
pub struct MarkdownParser {
    options: ParserOptions,
    constructs: Constructs,
    gfm_strikethrough_single_tilde: bool,
    math_text_single_dollar: bool,
    registry: Arc<PluginRegistry>,
}

impl MarkdownParser {
    /// Creates a parser with default options and no plugins.
    pub fn new() -> Self {
        Self::with_registry(ParserOptions::default(), Arc::new(PluginRegistry::new()))
    }

    /// Creates a parser with the given options and no plugins.
    pub fn with_options(options: ParserOptions) -> Self {
        Self::with_registry(options, Arc::new(PluginRegistry::new()))
    }

    /// Creates a parser whose grammar is configured by `registry`.
    pub fn with_registry(options: ParserOptions, registry: Arc<PluginRegistry>) -> Self {
        let mut parse_options = ParseOptions::gfm();
        registry.apply_pipeline(&mut parse_options);
        debug!(
            "Markdown parser configured with {} recognizer(s)",
            registry.recognizers().len()
        );

        Self {
            options,
            constructs: parse_options.constructs,
            gfm_strikethrough_single_tilde: parse_options.gfm_strikethrough_single_tilde,
            math_text_single_dollar: parse_options.math_text_single_dollar,
            registry,
        }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Rebuilds the grammar options; `ParseOptions` itself cannot be shared
    /// between threads.
    fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::gfm();
        options.constructs = self.constructs.clone();
        options.gfm_strikethrough_single_tilde = self.gfm_strikethrough_single_tilde;
        options.math_text_single_dollar = self.math_text_single_dollar;
        options
    }

    /// Parses `source` into a document model.
    ///
    /// Never fails: if the grammar engine rejects the input, the failure is
    /// logged and an empty document over `source` is returned.
    pub fn parse(&self, source: &str) -> MarkdownDocumentModel {
        match self.try_parse(source) {
            Ok(model) => model,
            Err(e) => {
                warn!("{}", e);
                MarkdownDocumentModel::new(
                    source.to_string(),
                    Default::default(),
                    Default::default(),
                )
            }
        }
    }

    /// Parses `source`, surfacing grammar engine failures.
    pub fn try_parse(&self, source: &str) -> Result<MarkdownDocumentModel, ParseError> {
        let mdast = to_mdast(source, &self.parse_options())
            .map_err(|e| ParseError::invalid_source(e.to_string()))?;

        Ok(DocumentBuilder::new(source, self.options, &self.registry).build(&mdast))
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jitmark_ast::{BlockNode, InlineNode, NodeKind, visitor::collect_nodes};
    use jitmark_plugin::github::{GitHubEnrichmentOptions, GitHubEnrichmentsPlugin};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn github_parser(options: GitHubEnrichmentOptions) -> MarkdownParser {
        let mut registry = PluginRegistry::new();
        registry
            .install(&GitHubEnrichmentsPlugin::new(options))
            .unwrap();
        MarkdownParser::with_registry(ParserOptions::default(), Arc::new(registry))
    }

    fn first_paragraph(model: &MarkdownDocumentModel) -> &[InlineNode] {
        match &model.blocks()[0] {
            BlockNode::Paragraph(p) => &p.inlines,
            other => panic!("expected paragraph, got {:?}", other.kind()),
        }
    }

    fn links(inlines: &[InlineNode]) -> Vec<&jitmark_ast::Link> {
        inlines
            .iter()
            .filter_map(|inline| match inline {
                InlineNode::Link(link) => Some(link),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_simple_markdown() {
        let model = MarkdownParser::new().parse("# Hello\n\nThis is a paragraph.");
        assert_eq!(model.blocks().len(), 2);
        assert_eq!(model.blocks()[0].kind(), NodeKind::Heading);
        assert_eq!(model.blocks()[1].kind(), NodeKind::Paragraph);
    }

    #[test]
    fn test_parse_empty_document() {
        let model = MarkdownParser::new().parse("");
        assert!(model.blocks().is_empty());
        assert!(model.source_map().is_empty());
    }

    #[test]
    fn test_parse_multiple_headings() {
        let model = MarkdownParser::new().parse("# H1\n## H2\n### H3\n#### H4\n##### H5\n###### H6");
        assert_eq!(model.blocks().len(), 6);
        for (i, block) in model.blocks().iter().enumerate() {
            let BlockNode::Heading(heading) = block else {
                panic!("expected heading");
            };
            assert_eq!(heading.level as usize, i + 1);
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "# T\n\n- [ ] a\n- b *c*\n\n> q\n\n| x | y |\n|---|---|\n| 1 | 2 |\n";
        let parser = MarkdownParser::new();
        let first = parser.parse(source);
        let second = parser.parse(source);

        let ids = |model: &MarkdownDocumentModel| {
            collect_nodes(model.document())
                .iter()
                .map(|n| n.id())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        assert!(!ids(&first).is_empty());
    }

    #[test]
    fn test_spans_within_source() {
        let source = "Hello **world** from *Skia*.\n\n```rust\nfn main() {}\n```\n";
        let model = MarkdownParser::new().parse(source);
        for node in collect_nodes(model.document()) {
            let span = node.span();
            assert!(span.start <= span.end && span.end <= source.chars().count());
        }
    }

    #[test]
    fn test_fenced_and_indented_code_share_kind() {
        let model = MarkdownParser::new().parse("```rust\nfn main() {}\n```\n\n    indented\n");
        let BlockNode::CodeBlock(fenced) = &model.blocks()[0] else {
            panic!("expected code block");
        };
        let BlockNode::CodeBlock(indented) = &model.blocks()[1] else {
            panic!("expected code block");
        };
        assert_eq!(fenced.info.as_deref(), Some("rust"));
        assert_eq!(fenced.code, "fn main() {}");
        assert_eq!(indented.info, None);
        assert_eq!(indented.code, "indented");
    }

    #[test]
    fn test_html_dropped_by_default() {
        let source = "<div>\nhi\n</div>\n\ntext";
        let model = MarkdownParser::new().parse(source);
        assert_eq!(model.blocks().len(), 1);
        assert_eq!(model.blocks()[0].kind(), NodeKind::Paragraph);
    }

    #[test]
    fn test_html_kept_when_allowed() {
        let source = "<div>\nhi\n</div>\n\ntext";
        let model =
            MarkdownParser::with_options(ParserOptions::default().allow_html(true)).parse(source);
        assert_eq!(model.blocks()[0].kind(), NodeKind::HtmlBlock);
        assert_eq!(model.blocks().len(), 2);
    }

    #[test]
    fn test_task_items() {
        let model = MarkdownParser::new().parse("- [ ] todo\n- [x] done\n- plain\n");
        let BlockNode::List(list) = &model.blocks()[0] else {
            panic!("expected list");
        };
        let states: Vec<_> = list
            .items
            .iter()
            .map(|item| (item.is_task, item.is_checked))
            .collect();
        assert_eq!(
            states,
            vec![(true, Some(false)), (true, Some(true)), (false, None)]
        );
    }

    #[test]
    fn test_ordered_list_start() {
        let model = MarkdownParser::new().parse("3. a\n4. b\n");
        let BlockNode::List(list) = &model.blocks()[0] else {
            panic!("expected list");
        };
        assert!(list.is_ordered);
        assert_eq!(list.start, Some(3));
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_table_cells_wrap_paragraph() {
        let model = MarkdownParser::new().parse("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let BlockNode::Table(table) = &model.blocks()[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[0].is_header);
        assert!(!table.rows[1].is_header);
        let cell = &table.rows[1].cells[1];
        assert_eq!(cell.blocks.len(), 1);
        assert_eq!(cell.blocks[0].kind(), NodeKind::Paragraph);
    }

    #[test]
    fn test_strikethrough() {
        let model = MarkdownParser::new().parse("~~gone~~");
        assert_eq!(first_paragraph(&model)[0].kind(), NodeKind::Strikethrough);
    }

    #[test]
    fn test_mention_enrichment() {
        let source = "@bob!";
        let model = github_parser(GitHubEnrichmentOptions::default()).parse(source);
        let inlines = first_paragraph(&model);
        let found = links(inlines);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span.slice(source), Some("@bob"));
        assert_eq!(found[0].url.as_deref(), Some("https://github.com/bob"));
        assert_eq!(jitmark_ast::display_text(&found[0].inlines), "@bob");
        assert_eq!(model.source_map().span_of(found[0].id), Some(found[0].span));
    }

    #[rstest]
    #[case::emphasis("*@bob*", NodeKind::Emphasis, (1, 5))]
    #[case::strong("**@bob** hi", NodeKind::Strong, (2, 6))]
    #[case::strikethrough("~~see @bob~~", NodeKind::Strikethrough, (6, 10))]
    fn test_mention_inside_styled_text(
        #[case] source: &str,
        #[case] kind: NodeKind,
        #[case] expected: (usize, usize),
    ) {
        let parser = github_parser(GitHubEnrichmentOptions::default());
        let model = parser.parse(source);
        let styled = &first_paragraph(&model)[0];
        assert_eq!(styled.kind(), kind);

        let found = links(styled.children());
        assert_eq!(found.len(), 1);
        assert_eq!((found[0].span.start, found[0].span.end), expected);
        assert_eq!(model.slice(found[0].span), Some("@bob"));
        assert_eq!(model.source_map().span_of(found[0].id), Some(found[0].span));

        // Same link as an unstyled mention.
        let plain = parser.parse("@bob");
        let top = links(first_paragraph(&plain));
        assert_eq!(found[0].url, top[0].url);
        assert_eq!(
            jitmark_ast::display_text(&found[0].inlines),
            jitmark_ast::display_text(&top[0].inlines)
        );
    }

    #[test]
    fn test_mention_glued_to_word() {
        let model = github_parser(GitHubEnrichmentOptions::default()).parse("a@bob");
        assert!(links(first_paragraph(&model)).is_empty());
    }

    #[test]
    fn test_no_enrichment_inside_code_or_links() {
        let source = "`@bob` [@bob](https://example.com)";
        let model = github_parser(GitHubEnrichmentOptions::default()).parse(source);
        let inlines = first_paragraph(&model);
        let found = links(inlines);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_commit_sha() {
        let sha = "0123456789abcdef0123456789abcdef01234567";
        let source = format!("fixed in {sha}.");
        let model =
            github_parser(GitHubEnrichmentOptions::for_repository("owner/repo")).parse(&source);
        let found = links(first_paragraph(&model));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span.len(), 40);
        assert_eq!(found[0].span.slice(&source), Some(sha));

        let short = format!("fixed in {}.", &sha[..39]);
        let model = github_parser(GitHubEnrichmentOptions {
            allow_short_shas: false,
            ..GitHubEnrichmentOptions::for_repository("owner/repo")
        })
        .parse(&short);
        assert!(links(first_paragraph(&model)).is_empty());
    }

    #[test]
    fn test_enrichment_keeps_ids_deterministic() {
        let source = "ping @bob about #12";
        let parser = github_parser(GitHubEnrichmentOptions::for_repository("o/r"));
        let a = parser.parse(source);
        let b = parser.parse(source);
        assert_eq!(first_paragraph(&a), first_paragraph(&b));
        assert_eq!(links(first_paragraph(&a)).len(), 2);
    }
}
