pub mod animator;
pub mod easing;
mod state;

pub use animator::{Animator, FrameHost, PauseInterrupted, ThreadHost, FRAME_DELAY};
pub use state::AnimationState;
