use std::sync::Arc;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::{Adapter, Device, Instance, Queue, Surface, SurfaceConfiguration, TextureFormat};

use crate::error::AppError;

pub struct GpuContext {
    pub instance: Instance,
    pub adapter: Adapter,
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
}

impl GpuContext {
    pub fn new() -> Result<Self, AppError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::VULKAN | wgpu::Backends::GL,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;

        log::info!("Using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("OneTwenty Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            trace: wgpu::Trace::Off,
        }))?;

        Ok(Self {
            instance,
            adapter,
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    pub fn create_surface<W>(
        &self,
        window: W,
        width: u32,
        height: u32,
    ) -> Result<SurfaceState, AppError>
    where
        W: HasWindowHandle + HasDisplayHandle,
    {
        // SAFETY: the Wayland surface outlives the wgpu surface; both are
        // owned by the app loop and the GPU surface is dropped first.
        let surface = unsafe {
            self.instance
                .create_surface_unsafe(wgpu::SurfaceTargetUnsafe::from_window(&window)?)?
        };

        let caps = surface.get_capabilities(&self.adapter);
        let format = pick_format(&caps.formats).ok_or(AppError::NoSurfaceFormat)?;

        log::info!("Using surface format: {:?}", format);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&self.device, &config);

        Ok(SurfaceState {
            surface,
            config,
            device: self.device.clone(),
        })
    }
}

/// Prefer plain 8-bit formats so colors reach the compositor unconverted.
fn pick_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    formats
        .iter()
        .find(|f| matches!(f, TextureFormat::Bgra8Unorm | TextureFormat::Rgba8Unorm))
        .or_else(|| {
            formats
                .iter()
                .find(|f| !matches!(f, TextureFormat::Rgba16Unorm))
        })
        .copied()
}

pub struct SurfaceState {
    pub surface: Surface<'static>,
    pub config: SurfaceConfiguration,
    device: Arc<Device>,
}

impl SurfaceState {
    /// Reconfigure for a new size. Zero-sized requests are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reapply the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn format(&self) -> TextureFormat {
        self.config.format
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_unorm_8bit() {
        let formats = [
            TextureFormat::Rgba16Unorm,
            TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Bgra8Unorm,
        ];
        assert_eq!(pick_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn test_falls_back_past_16bit() {
        let formats = [TextureFormat::Rgba16Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(pick_format(&formats), Some(TextureFormat::Bgra8UnormSrgb));
    }

    #[test]
    fn test_no_formats() {
        assert_eq!(pick_format(&[]), None);
    }
}
