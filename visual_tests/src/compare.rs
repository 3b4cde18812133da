use crate::{Result, VisualTestError};
use image::{Rgba, RgbaImage};
use image_compare::Algorithm;
use std::path::Path;

/// Channel difference above which a pixel is highlighted in diffs.
const DIFF_TOLERANCE: u8 = 10;

/// Channel difference above which a pixel counts as changed. Edge pixels of
/// two anti-aliased renderings of the same line stay below it.
pub const CHANGE_TOLERANCE: u8 = 48;

/// Result of comparing two images
pub struct CompareResult {
    /// MSSIM score from 0.0 to 1.0
    pub similarity: f64,
    /// Pixels whose largest channel difference exceeds [`CHANGE_TOLERANCE`]
    pub changed_pixels: usize,
}

/// Compare two PNG files
pub fn compare_files(reference: &Path, captured: &Path) -> Result<CompareResult> {
    let reference = image::open(reference)?.to_rgba8();
    let captured = image::open(captured)?.to_rgba8();
    compare_images(&reference, &captured)
}

/// Compare two frames with MSSIM on their RGB channels
pub fn compare_images(reference: &RgbaImage, captured: &RgbaImage) -> Result<CompareResult> {
    if reference.dimensions() != captured.dimensions() {
        return Err(VisualTestError::Compare(format!(
            "Image dimensions don't match: reference {:?} vs captured {:?}",
            reference.dimensions(),
            captured.dimensions()
        )));
    }

    let ref_rgb = image::DynamicImage::ImageRgba8(reference.clone()).to_rgb8();
    let cap_rgb = image::DynamicImage::ImageRgba8(captured.clone()).to_rgb8();

    let result =
        image_compare::rgb_similarity_structure(&Algorithm::MSSIMSimple, &ref_rgb, &cap_rgb)
            .map_err(|e| VisualTestError::Compare(format!("SSIM comparison failed: {}", e)))?;

    let changed_pixels = reference
        .pixels()
        .zip(captured.pixels())
        .filter(|(a, b)| pixel_difference(a, b) > CHANGE_TOLERANCE)
        .count();

    Ok(CompareResult {
        similarity: result.score,
        changed_pixels,
    })
}

/// Red where the frames differ, the captured frame dimmed elsewhere
pub fn diff_image(reference: &RgbaImage, captured: &RgbaImage) -> RgbaImage {
    let (width, height) = reference.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        let ref_pixel = reference.get_pixel(x, y);
        let Some(cap_pixel) = captured.get_pixel_checked(x, y) else {
            return Rgba([255, 0, 255, 255]);
        };

        let diff = pixel_difference(ref_pixel, cap_pixel);
        if diff > DIFF_TOLERANCE {
            let intensity = (diff as f32 / 255.0 * 200.0 + 55.0) as u8;
            Rgba([intensity, 0, 0, 255])
        } else {
            Rgba([cap_pixel[0] / 3, cap_pixel[1] / 3, cap_pixel[2] / 3, 255])
        }
    })
}

/// Write the diff of two PNG files
pub fn generate_diff_image(reference: &Path, captured: &Path, output: &Path) -> Result<()> {
    let reference = image::open(reference)?.to_rgba8();
    let captured = image::open(captured)?.to_rgba8();
    diff_image(&reference, &captured).save(output)?;
    Ok(())
}

/// Largest channel difference between two pixels
fn pixel_difference(a: &Rgba<u8>, b: &Rgba<u8>) -> u8 {
    let dr = a[0].abs_diff(b[0]);
    let dg = a[1].abs_diff(b[1]);
    let db = a[2].abs_diff(b[2]);
    dr.max(dg).max(db)
}
