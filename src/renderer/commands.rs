//! Draw command recording.
//!
//! [`CommandCanvas`] flattens every canvas call into surface-space
//! [`DrawCommand`]s. The GPU renderer consumes the list; tests compare it.

use crate::canvas::{Canvas, Color, Paint, StrokeCap};
use crate::transform::{Transform, TransformStack};

/// A single draw operation in surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear {
        color: Color,
    },

    /// Stroke a straight segment.
    Line {
        /// Start point in surface pixels
        from: (f32, f32),
        /// End point in surface pixels
        to: (f32, f32),
        /// Stroke width in surface pixels
        width: f32,
        color: Color,
        cap: StrokeCap,
    },
}

/// Canvas that records instead of rasterizing.
#[derive(Debug, Clone)]
pub struct CommandCanvas {
    width: f32,
    height: f32,
    stack: TransformStack,
    commands: Vec<DrawCommand>,
}

impl CommandCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            stack: TransformStack::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { .. }))
            .count()
    }

    /// Current save depth. Zero after a balanced frame.
    pub fn save_depth(&self) -> usize {
        self.stack.depth()
    }
}

impl Canvas for CommandCanvas {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        if !self.stack.restore() {
            log::warn!("restore called without a matching save");
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.stack.concat(Transform::translate(dx, dy));
    }

    fn rotate(&mut self, degrees: f32) {
        self.stack.concat(Transform::rotate_degrees(degrees));
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, paint: &Paint) {
        let transform = self.stack.current();
        self.commands.push(DrawCommand::Line {
            from: transform.transform_point(x0, y0),
            to: transform.transform_point(x1, y1),
            width: paint.stroke_width,
            color: paint.color,
            cap: paint.cap,
        });
    }

    fn draw_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }
}
