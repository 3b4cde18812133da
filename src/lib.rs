//! A row of folding lines that unfold one node per tap.
//!
//! The animation model ([`animation`], [`view`]) is independent of any
//! windowing system and draws through the [`canvas::Canvas`] trait. [`App`]
//! hosts a view on a Wayland layer shell surface and presents frames with
//! wgpu; [`renderer::software`] rasterizes the same frames on the CPU.

pub mod animation;
pub mod canvas;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod transform;
pub mod view;

use std::time::Duration;

use animation::ThreadHost;
use canvas::Paint;
use platform::{create_wayland_app, pump_events, Anchor, Event, Layer, WaylandWindowWrapper};
use renderer::{CommandCanvas, GpuContext, Renderer};
use view::{OneTwentyLineView, BACK_COLOR};

pub use error::{AppError, SnapshotError};

pub mod prelude {
    pub use crate::animation::{AnimationState, Animator, FrameHost, ThreadHost};
    pub use crate::canvas::{Canvas, Color, Paint, StrokeCap};
    pub use crate::platform::{Anchor, Layer};
    pub use crate::renderer::{CommandCanvas, DrawCommand, PixmapCanvas};
    pub use crate::view::{
        render_frame, render_frame_png, NodeChain, OneTwentyLineView, Settled, Sweep,
    };
    pub use crate::{App, AppConfig, AppError};
}

/// Sleep between loop iterations when no frame is due.
const IDLE_SLEEP: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub width: u32,
    pub height: u32,
    pub anchor: Anchor,
    pub layer: Layer,
    pub namespace: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            anchor: Anchor::TOP | Anchor::LEFT | Anchor::RIGHT,
            layer: Layer::Top,
            namespace: "onetwenty".to_string(),
        }
    }
}

impl AppConfig {
    /// Cover the whole output, above other surfaces.
    pub fn fullscreen() -> Self {
        Self {
            anchor: Anchor::all(),
            layer: Layer::Overlay,
            ..Self::default()
        }
    }
}

pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn width(mut self, width: u32) -> Self {
        self.config.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.config.height = height;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.config.anchor = anchor;
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.config.layer = layer;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.config.namespace = namespace.into();
        self
    }

    /// Show `view` and drive it until the compositor closes the surface.
    pub fn run(self, mut view: OneTwentyLineView) -> Result<(), AppError> {
        // A second run in the same process keeps the first logger.
        let _ = env_logger::try_init();

        let (connection, mut event_queue, mut wayland_state, qh) = create_wayland_app()?;

        wayland_state.create_layer_surface(
            &qh,
            self.config.width,
            self.config.height,
            self.config.anchor,
            self.config.layer,
            &self.config.namespace,
        );

        while !wayland_state.configured && !wayland_state.exit {
            event_queue.blocking_dispatch(&mut wayland_state)?;
        }

        if wayland_state.exit {
            return Err(AppError::ClosedBeforeConfigure);
        }

        let wl_surface = wayland_state
            .surface
            .clone()
            .ok_or(AppError::ClosedBeforeConfigure)?;

        let gpu_context = GpuContext::new()?;
        let window_handle = WaylandWindowWrapper::new(&connection, &wl_surface);

        let scale = wayland_state.scale_factor.max(1.0) as u32;
        let physical_width = wayland_state.width * scale;
        let physical_height = wayland_state.height * scale;

        log::info!(
            "Creating surface: logical {}x{}, physical {}x{}, scale {}",
            wayland_state.width,
            wayland_state.height,
            physical_width,
            physical_height,
            scale
        );

        let mut surface =
            gpu_context.create_surface(window_handle, physical_width, physical_height)?;

        let mut renderer = Renderer::new(
            gpu_context.device.clone(),
            gpu_context.queue.clone(),
            surface.format(),
        );
        renderer.set_screen_size(surface.width() as f32, surface.height() as f32);
        renderer.set_scale_factor(wayland_state.scale_factor);
        renderer.set_background(BACK_COLOR);

        let mut host = ThreadHost::new();
        let paint = Paint::default();
        let mut needs_paint = true;

        loop {
            pump_events(&mut event_queue, &mut wayland_state)?;

            if wayland_state.exit {
                log::info!("Layer surface closed, exiting");
                break;
            }

            for event in wayland_state.take_events() {
                match event {
                    Event::Tap { x, y } => {
                        log::debug!("tap at ({x}, {y})");
                        view.handle_tap(&mut host);
                    }
                    Event::Resized { width, height } => {
                        log::debug!("resized to {width}x{height}");
                        needs_paint = true;
                    }
                }
            }

            let scale = wayland_state.scale_factor.max(1.0) as u32;
            let physical_width = wayland_state.width * scale;
            let physical_height = wayland_state.height * scale;

            if surface.width() != physical_width || surface.height() != physical_height {
                log::info!(
                    "Resizing surface to {}x{} (physical), scale {}",
                    physical_width,
                    physical_height,
                    scale
                );
                surface.resize(physical_width, physical_height);
                renderer.set_screen_size(surface.width() as f32, surface.height() as f32);
                needs_paint = true;
            }
            renderer.set_scale_factor(wayland_state.scale_factor);

            if host.take_redraw_request() || needs_paint {
                needs_paint = false;

                let mut canvas =
                    CommandCanvas::new(wayland_state.width as f32, wayland_state.height as f32);
                view.render(&mut canvas, &paint, &mut host);
                renderer.render(&mut surface, canvas.commands());

                wl_surface.commit();
            } else {
                std::thread::sleep(IDLE_SLEEP);
            }

            connection.flush()?;
        }

        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fullscreen_anchors_every_edge() {
        let config = AppConfig::fullscreen();
        assert!(config.anchor.is_all());
        assert_eq!(config.layer, Layer::Overlay);
        assert_eq!(config.namespace, "onetwenty");
    }

    #[test]
    fn test_builder_overrides_config() {
        let app = App::new().width(320).height(240).namespace("demo");
        assert_eq!(app.config().width, 320);
        assert_eq!(app.config().height, 240);
        assert_eq!(app.config().namespace, "demo");
    }
}
