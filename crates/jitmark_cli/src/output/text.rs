//! Text output formatter

use std::fmt::Write;
use std::ops::ControlFlow;

use jitmark_ast::MarkdownDocumentModel;
use jitmark_ast::visitor::{NodeRef, VisitResult, Visitor, walk_document};
use jitmark_layout::MarkdownLayout;
use jitmark_shaping::ShapingResult;
use tracing::warn;

/// Renders one node per line, indented by depth.
#[derive(Default)]
struct TreePrinter {
    depth: usize,
    out: String,
}

impl<'a> Visitor<'a> for TreePrinter {
    fn enter_node(&mut self, node: NodeRef<'a>) -> VisitResult {
        let span = node.span();
        let written = writeln!(
            self.out,
            "{:indent$}{} {}..{} {}",
            "",
            node.kind(),
            span.start,
            span.end,
            node.id(),
            indent = 2 + self.depth * 2
        );
        if written.is_err() {
            return ControlFlow::Break(());
        }
        self.depth += 1;
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, _node: NodeRef<'a>) -> VisitResult {
        self.depth = self.depth.saturating_sub(1);
        ControlFlow::Continue(())
    }
}

pub fn print_tree(model: &MarkdownDocumentModel) {
    let mut printer = TreePrinter::default();
    match walk_document(&mut printer, model.document()) {
        ControlFlow::Continue(()) => print!("{}", printer.out),
        ControlFlow::Break(()) => warn!("Node tree listing failed to format"),
    }
}

pub fn print_layout(layout: &MarkdownLayout, visible: &[usize]) {
    println!("size: {:.1} x {:.1}", layout.width, layout.height);
    for (index, block) in layout.blocks().iter().enumerate() {
        let bounds = block.bounds();
        println!(
            "[{}] {} {:.1} {:.1} {:.1} {:.1}",
            index,
            block.kind(),
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        );
    }
    println!("visible: {}", join(visible.iter().map(|i| i.to_string())));
}

pub fn print_shaping(result: &ShapingResult) {
    println!("width: {:.2}", result.width);
    println!("height: {:.2}", result.height);
    println!("direction: {}", if result.is_rtl { "rtl" } else { "ltr" });
    println!(
        "carets: {}",
        join(result.caret_x.iter().map(|x| format!("{:.2}", x)))
    );
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(" ")
}
