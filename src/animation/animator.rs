//! Boolean-gated frame driver.
//!
//! The driver does not own a timer. The host calls [`Animator::animate`]
//! from its paint path; while the driver is running that runs one tick,
//! waits out the pacing step and asks the host for another frame, which in
//! turn paints and calls `animate` again.

use std::time::Duration;

use thiserror::Error;

/// Pause between two animation ticks.
pub const FRAME_DELAY: Duration = Duration::from_millis(50);

/// The pacing pause was cut short.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("frame pause interrupted")]
pub struct PauseInterrupted;

/// Services the animation needs from whatever hosts the drawing surface.
pub trait FrameHost {
    /// Schedule another paint of the surface.
    fn request_redraw(&mut self);

    /// Block the UI thread for `duration`.
    fn pause(&mut self, duration: Duration) -> Result<(), PauseInterrupted>;
}

/// Host that sleeps the calling thread and remembers redraw requests.
#[derive(Debug, Default)]
pub struct ThreadHost {
    redraw_requested: bool,
}

impl ThreadHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return and clear the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl FrameHost for ThreadHost {
    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn pause(&mut self, duration: Duration) -> Result<(), PauseInterrupted> {
        std::thread::sleep(duration);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    running: bool,
    frame_delay: Duration,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    pub fn new() -> Self {
        Self {
            running: false,
            frame_delay: FRAME_DELAY,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Switch to running and request the first frame. No-op when already running.
    pub fn start(&mut self, host: &mut impl FrameHost) {
        if self.running {
            return;
        }
        self.running = true;
        log::debug!("animator started");
        host.request_redraw();
    }

    /// Switch to idle. No-op when already idle.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::debug!("animator stopped");
    }

    /// Run one tick if running, then pace and request the next frame.
    ///
    /// `tick` receives the driver so it can stop it. An interrupted pause is
    /// ignored and the frame loop continues as usual.
    pub fn animate<F>(&mut self, host: &mut impl FrameHost, tick: F)
    where
        F: FnOnce(&mut Self),
    {
        if !self.running {
            return;
        }
        tick(self);
        if let Err(err) = host.pause(self.frame_delay) {
            log::debug!("ignoring {}", err);
        }
        host.request_redraw();
    }
}
