/// Input and surface events delivered to the app loop.
///
/// Coordinates are in logical (surface-local) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Primary pointer button pressed, or a touch point went down.
    Tap { x: f32, y: f32 },
    /// The compositor assigned a new logical size.
    Resized { width: u32, height: u32 },
}
