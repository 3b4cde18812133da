//! The one-twenty line view.
//!
//! A row of [`NODES`] nodes, each made of [`LINES`] short strokes folded at
//! 120 degrees. A tap unfolds the node under the chain cursor; once it
//! settles the cursor moves to its neighbor and the next tap continues the
//! sweep, bouncing back at either end of the row.

mod chain;
mod draw;

use std::path::Path;

pub use chain::{Node, NodeChain, Settled, Sweep};
pub use draw::{
    draw_node, draw_one_twenty_line, NodeGeometry, BACK_COLOR, FORE_COLOR, LINES, LINE_ROTATION,
    NODES, SIZE_FACTOR, STROKE_FACTOR,
};

use crate::animation::{Animator, FrameHost};
use crate::canvas::{Canvas, Paint};
use crate::error::SnapshotError;
use crate::renderer::software::PixmapCanvas;

/// Owns the node chain and the frame driver.
///
/// The host calls [`handle_tap`](Self::handle_tap) on primary pointer-down
/// and [`render`](Self::render) whenever the surface must be painted.
#[derive(Debug, Clone)]
pub struct OneTwentyLineView {
    chain: NodeChain,
    animator: Animator,
}

impl Default for OneTwentyLineView {
    fn default() -> Self {
        Self::new()
    }
}

impl OneTwentyLineView {
    pub fn new() -> Self {
        Self {
            chain: NodeChain::new(NODES, LINES),
            animator: Animator::new(),
        }
    }

    /// Build a view and hand it to the Wayland host, full screen.
    ///
    /// Blocks until the surface is closed.
    pub fn create() -> Result<(), crate::AppError> {
        crate::App::with_config(crate::AppConfig::fullscreen()).run(Self::new())
    }

    pub fn chain(&self) -> &NodeChain {
        &self.chain
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Paint the background and every visible node, then advance the
    /// animation by one tick when it is running.
    pub fn render(&mut self, canvas: &mut impl Canvas, paint: &Paint, host: &mut impl FrameHost) {
        canvas.draw_color(BACK_COLOR);
        self.chain.draw(canvas, paint);
        let chain = &mut self.chain;
        self.animator.animate(host, |animator| {
            if chain.update().is_some() {
                animator.stop();
            }
        });
    }

    /// One animation step, independent of pacing and redraw scheduling.
    ///
    /// Returns the node that settled on this tick, if any; the driver is
    /// stopped in that case.
    pub fn tick(&mut self) -> Option<Settled> {
        let settled = self.chain.update()?;
        self.animator.stop();
        Some(settled)
    }

    /// Start the cursor node's transition and the frame driver.
    ///
    /// Ignored while the cursor node is still moving.
    pub fn handle_tap(&mut self, host: &mut impl FrameHost) {
        if self.chain.start_updating() {
            self.animator.start(host);
        } else {
            log::debug!("tap ignored, node {} still moving", self.chain.current_index());
        }
    }
}

/// Rasterize the view's current frame on the CPU.
///
/// The animation is not advanced.
pub fn render_frame(
    view: &OneTwentyLineView,
    width: u32,
    height: u32,
) -> Result<PixmapCanvas, SnapshotError> {
    let mut canvas = PixmapCanvas::new(width, height)?;
    canvas.draw_color(BACK_COLOR);
    view.chain.draw(&mut canvas, &Paint::default());
    Ok(canvas)
}

/// [`render_frame`] written as a PNG.
pub fn render_frame_png(
    view: &OneTwentyLineView,
    width: u32,
    height: u32,
    path: &Path,
) -> Result<(), SnapshotError> {
    render_frame(view, width, height)?.save_png(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::PauseInterrupted;
    use crate::renderer::commands::CommandCanvas;
    use std::time::Duration;

    #[derive(Default)]
    struct NullHost {
        redraws: usize,
    }

    impl FrameHost for NullHost {
        fn request_redraw(&mut self) {
            self.redraws += 1;
        }

        fn pause(&mut self, _duration: Duration) -> Result<(), PauseInterrupted> {
            Ok(())
        }
    }

    #[test]
    fn test_fresh_view_is_idle() {
        let view = OneTwentyLineView::new();
        assert!(!view.is_animating());
        assert_eq!(view.chain().capacity(), NODES);
    }

    #[test]
    fn test_tap_starts_driver_once() {
        let mut host = NullHost::default();
        let mut view = OneTwentyLineView::new();
        view.handle_tap(&mut host);
        view.handle_tap(&mut host);
        assert!(view.is_animating());
        assert_eq!(host.redraws, 1);
    }

    #[test]
    fn test_tick_stops_driver_on_settle() {
        let mut host = NullHost::default();
        let mut view = OneTwentyLineView::new();
        view.handle_tap(&mut host);
        let settled = (0..1000).find_map(|_| view.tick());
        assert_eq!(settled, Some(Settled { index: 0, scale: 1.0 }));
        assert!(!view.is_animating());
        assert_eq!(view.chain().current_index(), 1);
    }

    #[test]
    fn test_idle_render_does_not_request_frames() {
        let mut host = NullHost::default();
        let mut view = OneTwentyLineView::new();
        let mut canvas = CommandCanvas::new(600.0, 300.0);
        view.render(&mut canvas, &Paint::default(), &mut host);
        assert_eq!(host.redraws, 0);
        assert_eq!(canvas.line_count(), LINES as usize);
    }
}
