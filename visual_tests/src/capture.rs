use crate::{Result, VisualTestError};
use onetwenty::animation::{FrameHost, PauseInterrupted};
use image::RgbaImage;
use onetwenty::view::{render_frame, render_frame_png, OneTwentyLineView};
use std::path::PathBuf;
use std::time::Duration;

/// A reproducible view state: a number of completed taps, then a partial
/// transition.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Name used for reference and output files
    pub name: String,
    /// Taps run until their node settles
    pub settled_taps: usize,
    /// Ticks of one more transition, `0` to leave the cursor node idle
    pub extra_ticks: usize,
}

impl Scenario {
    pub fn new(name: impl Into<String>, settled_taps: usize, extra_ticks: usize) -> Self {
        Self {
            name: name.into(),
            settled_taps,
            extra_ticks,
        }
    }
}

/// Configuration for capturing a frame
pub struct CaptureConfig {
    pub scenario: Scenario,
    /// Path where the frame will be saved
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Host that never waits, so scenarios replay instantly.
struct ImmediateHost;

impl FrameHost for ImmediateHost {
    fn request_redraw(&mut self) {}

    fn pause(&mut self, _duration: Duration) -> std::result::Result<(), PauseInterrupted> {
        Ok(())
    }
}

/// Upper bound on ticks for a single transition.
const MAX_TICKS: usize = 1000;

/// Replay a scenario on a fresh view.
pub fn replay(scenario: &Scenario) -> Result<OneTwentyLineView> {
    let mut host = ImmediateHost;
    let mut view = OneTwentyLineView::new();

    for tap in 0..scenario.settled_taps {
        view.handle_tap(&mut host);
        if !(0..MAX_TICKS).any(|_| view.tick().is_some()) {
            return Err(VisualTestError::Capture(format!(
                "tap {} of '{}' never settled",
                tap + 1,
                scenario.name
            )));
        }
    }

    if scenario.extra_ticks > 0 {
        view.handle_tap(&mut host);
        for _ in 0..scenario.extra_ticks {
            if view.tick().is_some() {
                break;
            }
        }
    }

    Ok(view)
}

/// Render a scenario's frame in memory
pub fn render_scenario(scenario: &Scenario, width: u32, height: u32) -> Result<RgbaImage> {
    let view = replay(scenario)?;
    Ok(render_frame(&view, width, height)?.to_rgba_image()?)
}

/// Render a scenario's frame to a PNG file
pub fn capture_scenario(config: &CaptureConfig) -> Result<()> {
    let view = replay(&config.scenario)?;
    render_frame_png(&view, config.width, config.height, &config.output_path)?;

    if !config.output_path.exists() {
        return Err(VisualTestError::Capture(format!(
            "Frame was not written to {}",
            config.output_path.display()
        )));
    }

    Ok(())
}
