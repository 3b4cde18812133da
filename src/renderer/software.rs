//! CPU rasterization through tiny-skia.
//!
//! Produces the same picture as the GPU path without needing a compositor
//! or an adapter, which makes it the backend for snapshots and visual tests.

use std::path::Path;

use image::RgbaImage;
use resvg::tiny_skia;

use crate::canvas::{Canvas, Color, Paint, StrokeCap};
use crate::error::SnapshotError;
use crate::transform::{Transform, TransformStack};

pub struct PixmapCanvas {
    pixmap: tiny_skia::Pixmap,
    stack: TransformStack,
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, SnapshotError> {
        let pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or(SnapshotError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            stack: TransformStack::new(),
        })
    }

    /// Color of a single pixel, unpremultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn to_rgba_image(&self) -> Result<RgbaImage, SnapshotError> {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data).ok_or(
            SnapshotError::InvalidSize {
                width: self.pixmap.width(),
                height: self.pixmap.height(),
            },
        )
    }

    pub fn save_png(&self, path: &Path) -> Result<(), SnapshotError> {
        self.to_rgba_image()?.save(path)?;
        Ok(())
    }
}

fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn skia_cap(cap: StrokeCap) -> tiny_skia::LineCap {
    match cap {
        StrokeCap::Butt => tiny_skia::LineCap::Butt,
        StrokeCap::Round => tiny_skia::LineCap::Round,
        StrokeCap::Square => tiny_skia::LineCap::Square,
    }
}

impl Canvas for PixmapCanvas {
    fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    fn height(&self) -> f32 {
        self.pixmap.height() as f32
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
        // Endpoints are mapped up front so the stroke width stays in surface pixels.
        let transform = self.stack.current();
        let (sx, sy) = transform.transform_point(x0, y0);
        let (ex, ey) = transform.transform_point(x1, y1);

        let mut builder = tiny_skia::PathBuilder::new();
        builder.move_to(sx, sy);
        builder.line_to(ex, ey);
        let Some(path) = builder.finish() else {
            return;
        };

        let mut skia_paint = tiny_skia::Paint::default();
        skia_paint.set_color(skia_color(paint.color));
        skia_paint.anti_alias = true;

        let stroke = tiny_skia::Stroke {
            width: paint.stroke_width,
            line_cap: skia_cap(paint.cap),
            ..Default::default()
        };

        self.pixmap.stroke_path(
            &path,
            &skia_paint,
            &stroke,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    fn draw_color(&mut self, color: Color) {
        self.pixmap.fill(skia_color(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(matches!(
            PixmapCanvas::new(0, 10),
            Err(SnapshotError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear_fills_every_pixel() {
        let mut canvas = PixmapCanvas::new(8, 4).unwrap();
        canvas.draw_color(Color::from_hex(0xBDBDBD));
        assert_eq!(canvas.pixel(0, 0), Some([0xBD, 0xBD, 0xBD, 0xFF]));
        assert_eq!(canvas.pixel(7, 3), Some([0xBD, 0xBD, 0xBD, 0xFF]));
    }

    #[test]
    fn test_line_is_rasterized_under_transform() {
        let mut canvas = PixmapCanvas::new(40, 40).unwrap();
        canvas.draw_color(Color::WHITE);
        let paint = Paint::new().stroke_width(4.0).color(Color::BLACK);
        canvas.save();
        canvas.translate(20.0, 5.0);
        canvas.rotate(90.0);
        canvas.draw_line(0.0, 0.0, 30.0, 0.0, &paint);
        canvas.restore();

        // Vertical line at x = 20 from y = 5 to y = 35.
        assert_eq!(canvas.pixel(20, 20), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(5, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_image_export_matches_dimensions() {
        let canvas = PixmapCanvas::new(12, 7).unwrap();
        let image = canvas.to_rgba_image().unwrap();
        assert_eq!(image.dimensions(), (12, 7));
    }
}
