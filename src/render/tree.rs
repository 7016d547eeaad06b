//! # Declarative Visual Trees
//!
//! Widgets that do not draw raw pixels emit a small declarative tree;
//! lowering it is a pure function: the tree is painted into a grayscale
//! surface (text keeps its anti-aliased coverage) and the whole surface is
//! dithered to a packed image in one pass. Widgets that need exact bits,
//! QR codes above all, bypass this and draw directly.
//!
//! Layout is a single vertical flow, the same model the slot canvases
//! use: children stack top to bottom, each spanning the full width, and
//! the finished block is centered vertically in the target canvas.

use crate::raster::MonoImage;
use crate::render::GraySurface;
use crate::render::dither::{self, DitherConfig};
use crate::render::text::{self, HAlign, StyledLine, TextStyle};

/// A node of declarative widget output.
#[derive(Debug, Clone)]
pub enum VisualNode {
    /// Children stacked vertically with `gap` pixels between them.
    Column { gap: u32, children: Vec<VisualNode> },
    /// A paragraph wrapped against the available width at lowering time.
    Text {
        content: String,
        style: TextStyle,
        align: HAlign,
        max_lines: usize,
        min_px: u32,
    },
    /// Pre-laid-out lines, each with its own size and weight.
    Lines { lines: Vec<StyledLine>, align: HAlign },
    /// Fixed vertical gap.
    Spacer(u32),
    /// Full-width horizontal rule.
    Rule { thickness: u32 },
    /// Continuous-tone bitmap, centered horizontally, never rescaled here
    /// (the widget prepares it at the size it wants).
    Bitmap(GraySurface),
}

impl VisualNode {
    /// Convenience constructor for a wrapped paragraph.
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        VisualNode::Text {
            content: content.into(),
            style,
            align: HAlign::Center,
            max_lines: usize::MAX,
            min_px: style.px.min(12),
        }
    }
}

/// Lower a tree to a packed monochrome image of exactly `width × height`.
pub fn lower(node: &VisualNode, width: u32, height: u32, config: &DitherConfig) -> MonoImage {
    let mut surface = GraySurface::new(width, height);
    let content_height = measure(node, width);
    let top = (height.saturating_sub(content_height) / 2) as i32;
    paint(node, &mut surface, top, width);
    dither::atkinson(&surface, config)
}

/// Height the node will occupy at the given width.
fn measure(node: &VisualNode, width: u32) -> u32 {
    match node {
        VisualNode::Column { gap, children } => {
            let heights: u32 = children.iter().map(|c| measure(c, width)).sum();
            heights + gap * children.len().saturating_sub(1) as u32
        }
        VisualNode::Text {
            content,
            style,
            max_lines,
            min_px,
            ..
        } => {
            let lines = text::wrap(content, *style, width, *max_lines, *min_px);
            text::block_height(&lines)
        }
        VisualNode::Lines { lines, .. } => text::block_height(lines),
        VisualNode::Spacer(h) => *h,
        VisualNode::Rule { thickness } => *thickness,
        VisualNode::Bitmap(bitmap) => bitmap.height(),
    }
}

/// Paint the node at vertical offset `y`, returning the height consumed.
fn paint(node: &VisualNode, surface: &mut GraySurface, y: i32, width: u32) -> u32 {
    match node {
        VisualNode::Column { gap, children } => {
            let mut cursor = y;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    cursor += *gap as i32;
                }
                cursor += paint(child, surface, cursor, width) as i32;
            }
            (cursor - y).max(0) as u32
        }
        VisualNode::Text {
            content,
            style,
            align,
            max_lines,
            min_px,
        } => {
            let lines = text::wrap(content, *style, width, *max_lines, *min_px);
            text::draw_block(surface, 0, y, width, &lines, *align)
        }
        VisualNode::Lines { lines, align } => text::draw_block(surface, 0, y, width, lines, *align),
        VisualNode::Spacer(h) => *h,
        VisualNode::Rule { thickness } => {
            for dy in 0..*thickness as i32 {
                for x in 0..width as i32 {
                    surface.set(x, y + dy, 255);
                }
            }
            *thickness
        }
        VisualNode::Bitmap(bitmap) => {
            let offset_x = (width.saturating_sub(bitmap.width()) / 2) as i32;
            for sy in 0..bitmap.height() as i32 {
                for sx in 0..bitmap.width() as i32 {
                    let sample = bitmap.get(sx, sy);
                    if sample > 0 {
                        surface.darken(offset_x + sx, y + sy, sample);
                    }
                }
            }
            bitmap.height()
        }
    }
}
