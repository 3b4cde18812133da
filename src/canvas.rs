//! Immediate-mode drawing contract between the animation and its host.
//!
//! The animation only ever needs a stroked line, a background fill and a
//! save/restore stack of translations and rotations. Anything that can do
//! those implements [`Canvas`]: the recording canvas feeding the GPU
//! renderer, and the software canvas used for snapshots.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build an opaque color from `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// How the ends of a stroked line are finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke style for line drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub stroke_width: f32,
    pub color: Color,
    pub cap: StrokeCap,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            stroke_width: 1.0,
            color: Color::BLACK,
            cap: StrokeCap::Butt,
        }
    }
}

impl Paint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }
}

/// A 2D drawing surface with a transform stack.
///
/// Coordinates are in pixels with the origin at the top-left corner and y
/// growing downward. Rotations are in degrees and turn clockwise on screen.
pub trait Canvas {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Push the current transform.
    fn save(&mut self);
    /// Pop back to the last saved transform. Unbalanced calls are ignored.
    fn restore(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, degrees: f32);

    /// Stroke a line in the current coordinate space.
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, paint: &Paint);

    /// Fill the whole surface, ignoring the transform.
    fn draw_color(&mut self, color: Color);
}
