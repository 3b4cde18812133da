use thiserror::Error;

/// Failures while bringing up or driving the Wayland/GPU host.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to connect to Wayland: {0}")]
    Connect(#[from] wayland_client::ConnectError),
    #[error("failed to initialize the Wayland registry: {0}")]
    Registry(#[from] wayland_client::globals::GlobalError),
    #[error("required Wayland global `{0}` is not available")]
    MissingGlobal(&'static str),
    #[error("failed to dispatch Wayland events: {0}")]
    Dispatch(#[from] wayland_client::DispatchError),
    #[error("Wayland connection error: {0}")]
    Connection(#[from] wayland_backend::client::WaylandError),
    #[error("layer surface was closed before it was configured")]
    ClosedBeforeConfigure,
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to create GPU surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("GPU surface reports no usable texture format")]
    NoSurfaceFormat,
    #[error("window handle unavailable: {0}")]
    Handle(#[from] raw_window_handle::HandleError),
}

/// Failures while rendering a frame to an image.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("invalid snapshot size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
