//! Drawing backends behind the [`Canvas`](crate::canvas::Canvas) trait.
//!
//! - [`commands::CommandCanvas`] records surface-space draw commands
//! - [`render::Renderer`] presents recorded commands on a wgpu surface
//! - [`software::PixmapCanvas`] rasterizes on the CPU for snapshots

pub mod commands;
pub mod gpu;
pub mod gpu_context;
pub mod pipeline;
pub mod render;
pub mod software;

pub use commands::{CommandCanvas, DrawCommand};
pub use gpu_context::{GpuContext, SurfaceState};
pub use render::Renderer;
pub use software::PixmapCanvas;
