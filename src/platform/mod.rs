mod event;
pub mod wayland;

pub use event::Event;
pub use wayland::{create_wayland_app, pump_events, WaylandState, WaylandWindowWrapper};

pub use smithay_client_toolkit::shell::wlr_layer::{Anchor, Layer};
