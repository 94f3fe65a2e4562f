//! Block style resolution.

use jitmark_ast::NodeKind;
use serde::Serialize;

use crate::theme::{ColorRgba, Theme};

/// Box decoration of a laid-out block, in unscaled units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockStyle {
    pub background: ColorRgba,
    pub corner_radius: f32,
    pub padding: f32,
    pub spacing_after: f32,
}

impl BlockStyle {
    pub const TRANSPARENT: BlockStyle = BlockStyle {
        background: ColorRgba::TRANSPARENT,
        corner_radius: 0.0,
        padding: 0.0,
        spacing_after: 12.0,
    };
}

/// Resolves the decoration for a block of `kind`.
///
/// Code blocks and block quotes get a padded, rounded background; tables are
/// padded; list items add no spacing of their own.
pub fn resolve_block_style(kind: NodeKind, theme: &Theme) -> BlockStyle {
    let metrics = &theme.metrics;
    let base = BlockStyle {
        spacing_after: metrics.block_spacing,
        ..BlockStyle::TRANSPARENT
    };

    match kind {
        NodeKind::CodeBlock => BlockStyle {
            background: theme.colors.code_block_background,
            corner_radius: metrics.corner_radius,
            padding: metrics.block_padding,
            ..base
        },
        NodeKind::BlockQuote => BlockStyle {
            background: theme.colors.quote_background,
            corner_radius: metrics.corner_radius,
            padding: metrics.block_padding,
            ..base
        },
        NodeKind::Table => BlockStyle {
            padding: metrics.block_padding,
            ..base
        },
        NodeKind::ListItem | NodeKind::TableRow | NodeKind::TableCell => BlockStyle {
            spacing_after: 0.0,
            ..base
        },
        _ => base,
    }
}
