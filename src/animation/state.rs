use super::easing::update_value;

/// Per-node animation state.
///
/// A node is idle while `dir == 0.0`. Starting a transition points `dir`
/// at the opposite extreme of `prev_scale`; each [`update`](Self::update)
/// then moves `scale` one step until the node settles on its new target.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AnimationState {
    /// Current animated scale. May drift slightly past a target before it snaps.
    pub scale: f32,
    /// `1.0` or `-1.0` while a transition runs, `0.0` when idle.
    pub dir: f32,
    /// Last settled scale.
    pub prev_scale: f32,
}

impl AnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.dir == 0.0
    }

    /// Advance the transition by one tick.
    ///
    /// `rate` is the segment count handed to the mirror blend for both sides
    /// of the midpoint. Returns the settled scale when the accumulated
    /// displacement exceeds a full unit; the state is then idle again.
    pub fn update(&mut self, rate: u32) -> Option<f32> {
        self.scale += update_value(self.scale, self.dir, rate, rate);
        if (self.scale - self.prev_scale).abs() > 1.0 {
            self.scale = self.prev_scale + self.dir;
            self.dir = 0.0;
            self.prev_scale = self.scale;
            return Some(self.prev_scale);
        }
        None
    }

    /// Begin a transition toward the opposite extreme.
    ///
    /// Returns `false` without touching the state while a transition is
    /// already running.
    pub fn start_updating(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.dir = 1.0 - 2.0 * self.prev_scale;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 4;

    fn run_until_settled(state: &mut AnimationState) -> (usize, f32) {
        for tick in 1..=1000 {
            if let Some(settled) = state.update(RATE) {
                return (tick, settled);
            }
        }
        panic!("state never settled: {:?}", state);
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = AnimationState::new();
        assert!(state.is_idle());
        assert_eq!(state.scale, 0.0);
        assert_eq!(state.prev_scale, 0.0);
    }

    #[test]
    fn test_start_from_zero_moves_forward() {
        let mut state = AnimationState::new();
        assert!(state.start_updating());
        assert_eq!(state.dir, 1.0);
    }

    #[test]
    fn test_start_is_guarded_while_running() {
        let mut state = AnimationState::new();
        assert!(state.start_updating());
        assert!(!state.start_updating());
        assert_eq!(state.dir, 1.0);
    }

    #[test]
    fn test_idle_update_never_settles() {
        let mut state = AnimationState::new();
        for _ in 0..200 {
            assert_eq!(state.update(RATE), None);
        }
        assert_eq!(state.scale, 0.0);
    }

    #[test]
    fn test_first_ticks_move_by_small_step() {
        let mut state = AnimationState::new();
        state.start_updating();
        assert_eq!(state.update(RATE), None);
        assert!((state.scale - 0.0125).abs() < 1e-6);
        assert_eq!(state.update(RATE), None);
        assert!((state.scale - 0.025).abs() < 1e-6);
        assert_eq!(state.prev_scale, 0.0);
    }

    #[test]
    fn test_settles_once_and_goes_idle() {
        let mut state = AnimationState::new();
        state.start_updating();
        let (ticks, settled) = run_until_settled(&mut state);
        assert!((80..=82).contains(&ticks), "settled after {} ticks", ticks);
        assert_eq!(settled, 1.0);
        assert_eq!(state.scale, 1.0);
        assert_eq!(state.prev_scale, 1.0);
        assert!(state.is_idle());
        assert_eq!(state.update(RATE), None);
    }

    #[test]
    fn test_direction_inverts_after_settle() {
        let mut state = AnimationState::new();
        state.start_updating();
        run_until_settled(&mut state);

        assert!(state.start_updating());
        assert_eq!(state.dir, -1.0);
        let (_, settled) = run_until_settled(&mut state);
        assert_eq!(settled, 0.0);
        assert_eq!(state.prev_scale, 0.0);
    }
}
