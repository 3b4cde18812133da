//! Node geometry and line drawing.

use crate::animation::easing::divide_scale;
use crate::canvas::{Canvas, Color, Paint, StrokeCap};

/// Nodes in the row.
pub const NODES: usize = 5;
/// Line segments per node.
pub const LINES: u32 = 4;
/// Horizontal gap divided by this gives the node size.
pub const SIZE_FACTOR: f32 = 2.8;
/// The smaller surface side divided by this gives the stroke width.
pub const STROKE_FACTOR: f32 = 90.0;
/// Rotation of every line while its node is folded.
pub const LINE_ROTATION: f32 = 120.0;

pub const FORE_COLOR: Color = Color::from_hex(0x673AB7);
pub const BACK_COLOR: Color = Color::from_hex(0xBDBDBD);

/// Layout of one node on a surface of a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeGeometry {
    /// Horizontal distance between node origins
    pub gap: f32,
    /// Total width spanned by a node's lines
    pub size: f32,
    /// Length of, and spacing between, a node's lines
    pub line_gap: f32,
    /// Stroke width for the surface
    pub stroke_width: f32,
}

impl NodeGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        let gap = width / (NODES as f32 + 1.0);
        let size = gap / SIZE_FACTOR;
        Self {
            gap,
            size,
            line_gap: 2.0 * size / LINES as f32,
            stroke_width: width.min(height) / STROKE_FACTOR,
        }
    }

    /// Origin of node `i`, vertically centered.
    pub fn origin(&self, i: usize, height: f32) -> (f32, f32) {
        (self.gap * (i as f32 + 1.0), height / 2.0)
    }
}

/// Draw line `j` of a node, rotated by the second half-phase of its scale.
///
/// `_sc1` is the first half-phase; the current fold does not use it.
pub fn draw_one_twenty_line(
    canvas: &mut impl Canvas,
    j: u32,
    size: f32,
    _sc1: f32,
    sc2: f32,
    paint: &Paint,
) {
    canvas.save();
    canvas.translate(j as f32 * size, 0.0);
    canvas.rotate(LINE_ROTATION * (1.0 - sc2));
    canvas.draw_line(0.0, 0.0, size, 0.0, paint);
    canvas.restore();
}

/// Draw node `i` at the given animation scale.
///
/// Stroke width, color and cap are derived from the surface, so any paint
/// handed in is only used as a template.
pub fn draw_node(canvas: &mut impl Canvas, i: usize, scale: f32, paint: &Paint) {
    let w = canvas.width();
    let h = canvas.height();
    let geometry = NodeGeometry::new(w, h);
    let paint = paint
        .stroke_width(geometry.stroke_width)
        .color(FORE_COLOR)
        .cap(StrokeCap::Round);
    let (x, y) = geometry.origin(i, h);

    let sc1 = divide_scale(scale, 0, 2);
    let sc2 = divide_scale(scale, 1, 2);

    canvas.save();
    canvas.translate(x, y);
    for j in 0..LINES {
        draw_one_twenty_line(canvas, j, geometry.line_gap, sc1, sc2, &paint);
    }
    canvas.restore();
}
