//! Visual regression checks for the one-twenty line view.
//!
//! Each scenario is replayed on a fresh view, rasterized on the CPU and
//! compared against `references/<name>.png`. A missing reference is an
//! error; set `UPDATE_REFERENCES` to rewrite references from current frames.

mod capture;
mod compare;

pub use capture::{capture_scenario, render_scenario, replay, CaptureConfig, Scenario};
pub use compare::{
    compare_files, compare_images, diff_image, generate_diff_image, CompareResult,
    CHANGE_TOLERANCE,
};

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualTestError {
    #[error("Failed to capture frame: {0}")]
    Capture(String),
    #[error("Failed to compare images: {0}")]
    Compare(String),
    #[error("Reference image not found: {0}")]
    ReferenceNotFound(PathBuf),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] onetwenty::SnapshotError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, VisualTestError>;

/// Configuration for a visual test
#[derive(Clone)]
pub struct VisualTestConfig {
    pub scenario: Scenario,
    /// Frame size in pixels
    pub width: u32,
    pub height: u32,
    /// Similarity threshold (0.0 to 1.0, default 0.99)
    pub similarity_threshold: f64,
    /// Changed pixels allowed before the frame counts as different
    pub max_changed_pixels: usize,
}

impl VisualTestConfig {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            width: 600,
            height: 300,
            similarity_threshold: 0.99,
            max_changed_pixels: 64,
        }
    }
}

/// Result of a visual test
pub struct VisualTestResult {
    /// Whether similarity and changed pixels are both within bounds
    pub passed: bool,
    /// The similarity score (0.0 to 1.0)
    pub similarity: f64,
    pub changed_pixels: usize,
    pub captured_path: PathBuf,
    pub reference_path: PathBuf,
    /// Path to diff image (if generated on failure)
    pub diff_path: Option<PathBuf>,
}

/// Get the path to the references directory
pub fn references_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("references")
}

pub fn reference_path(name: &str) -> PathBuf {
    references_dir().join(format!("{}.png", name))
}

/// Get the path to the output directory for test artifacts
pub fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("output")
}

pub fn captured_path(name: &str) -> PathBuf {
    output_dir().join(format!("{}_captured.png", name))
}

pub fn diff_path(name: &str) -> PathBuf {
    output_dir().join(format!("{}_diff.png", name))
}

/// Run a visual regression test
pub fn run_visual_test(config: &VisualTestConfig) -> Result<VisualTestResult> {
    std::fs::create_dir_all(output_dir())?;
    let name = &config.scenario.name;
    run_against(
        config,
        &reference_path(name),
        &captured_path(name),
        &diff_path(name),
    )
}

fn run_against(
    config: &VisualTestConfig,
    ref_path: &Path,
    cap_path: &Path,
    diff_file: &Path,
) -> Result<VisualTestResult> {
    if !ref_path.exists() {
        return Err(VisualTestError::ReferenceNotFound(ref_path.to_path_buf()));
    }

    capture_scenario(&CaptureConfig {
        scenario: config.scenario.clone(),
        output_path: cap_path.to_path_buf(),
        width: config.width,
        height: config.height,
    })?;

    let compare_result = compare_files(ref_path, cap_path)?;
    let passed = compare_result.similarity >= config.similarity_threshold
        && compare_result.changed_pixels <= config.max_changed_pixels;

    let diff = if !passed {
        generate_diff_image(ref_path, cap_path, diff_file)?;
        Some(diff_file.to_path_buf())
    } else {
        None
    };

    Ok(VisualTestResult {
        passed,
        similarity: compare_result.similarity,
        changed_pixels: compare_result.changed_pixels,
        captured_path: cap_path.to_path_buf(),
        reference_path: ref_path.to_path_buf(),
        diff_path: diff,
    })
}

/// Render a scenario straight into its reference image
pub fn update_reference(config: &VisualTestConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(references_dir())?;

    let ref_path = reference_path(&config.scenario.name);
    capture_scenario(&CaptureConfig {
        scenario: config.scenario.clone(),
        output_path: ref_path.clone(),
        width: config.width,
        height: config.height,
    })?;

    println!("Updated reference: {}", ref_path.display());
    Ok(ref_path)
}

/// Check if we're in update references mode
pub fn should_update_references() -> bool {
    std::env::var("UPDATE_REFERENCES").is_ok()
}
