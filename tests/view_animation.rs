use std::time::Duration;

use onetwenty::animation::{FrameHost, PauseInterrupted, FRAME_DELAY};
use onetwenty::canvas::Paint;
use onetwenty::renderer::{CommandCanvas, DrawCommand};
use onetwenty::view::{OneTwentyLineView, Settled, Sweep, BACK_COLOR, LINES, NODES};

/// Records what the view asks of its host.
#[derive(Default)]
struct RecordingHost {
    redraw_requested: bool,
    pauses: Vec<Duration>,
    interrupt: bool,
}

impl RecordingHost {
    fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

impl FrameHost for RecordingHost {
    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn pause(&mut self, duration: Duration) -> Result<(), PauseInterrupted> {
        self.pauses.push(duration);
        if self.interrupt {
            Err(PauseInterrupted)
        } else {
            Ok(())
        }
    }
}

const WIDTH: f32 = 600.0;
const HEIGHT: f32 = 300.0;

fn frame(view: &mut OneTwentyLineView, host: &mut RecordingHost) -> Vec<DrawCommand> {
    let mut canvas = CommandCanvas::new(WIDTH, HEIGHT);
    view.render(&mut canvas, &Paint::default(), host);
    assert_eq!(canvas.save_depth(), 0);
    canvas.take_commands()
}

/// Render frames for as long as the view keeps asking for them.
fn run_to_rest(view: &mut OneTwentyLineView, host: &mut RecordingHost) -> usize {
    let mut frames = 0;
    while host.take_redraw() {
        frame(view, host);
        frames += 1;
        assert!(frames < 1000, "animation never came to rest");
    }
    frames
}

#[test]
fn idle_view_draws_background_and_root_node() {
    let mut host = RecordingHost::default();
    let mut view = OneTwentyLineView::new();

    let commands = frame(&mut view, &mut host);

    assert_eq!(commands[0], DrawCommand::Clear { color: BACK_COLOR });
    assert_eq!(commands.len(), 1 + LINES as usize);
    assert!(!host.redraw_requested);
    assert!(host.pauses.is_empty());
}

#[test]
fn tap_starts_transition_with_first_step() {
    let mut host = RecordingHost::default();
    let mut view = OneTwentyLineView::new();

    view.handle_tap(&mut host);
    assert!(view.is_animating());
    assert!(host.take_redraw());

    frame(&mut view, &mut host);

    let state = view.chain().current().state;
    assert_eq!(state.dir, 1.0);
    assert!((state.scale - 0.0125).abs() < 1e-6);
    assert_eq!(host.pauses, vec![FRAME_DELAY]);
    assert!(host.redraw_requested);
}

#[test]
fn settle_stops_driver_and_moves_cursor() {
    let mut host = RecordingHost::default();
    let mut view = OneTwentyLineView::new();

    view.handle_tap(&mut host);
    let frames = run_to_rest(&mut view, &mut host);

    assert!((79..=83).contains(&frames), "settled after {frames} frames");
    assert!(!view.is_animating());
    let root = view.chain().node(0).unwrap();
    assert_eq!(root.state.scale, 1.0);
    assert_eq!(root.state.prev_scale, 1.0);
    assert_eq!(root.state.dir, 0.0);
    assert_eq!(view.chain().current_index(), 1);
}

#[test]
fn redraw_without_changes_is_idempotent() {
    let mut host = RecordingHost::default();
    let mut view = OneTwentyLineView::new();
    view.handle_tap(&mut host);
    run_to_rest(&mut view, &mut host);

    let first = frame(&mut view, &mut host);
    let second = frame(&mut view, &mut host);
    assert_eq!(first, second);
    assert!(!host.redraw_requested);
}

#[test]
fn tap_while_moving_is_ignored() {
    let mut host = RecordingHost::default();
    let mut view = OneTwentyLineView::new();

    view.handle_tap(&mut host);
    frame(&mut view, &mut host);
    frame(&mut view, &mut host);
    let before = view.chain().current().state;

    view.handle_tap(&mut host);
    assert_eq!(view.chain().current().state, before);
}

#[test]
fn interrupted_pause_still_schedules_next_frame() {
    let mut host = RecordingHost {
        interrupt: true,
        ..Default::default()
    };
    let mut view = OneTwentyLineView::new();

    view.handle_tap(&mut host);
    host.take_redraw();
    frame(&mut view, &mut host);
    assert!(host.redraw_requested);
}

#[test]
fn full_sweep_unfolds_then_folds_back() {
    let mut host = RecordingHost::default();
    let mut view = OneTwentyLineView::new();
    let mut settled = Vec::new();

    for _ in 0..(2 * NODES) {
        view.handle_tap(&mut host);
        host.take_redraw();
        loop {
            if let Some(event) = view.tick() {
                settled.push(event);
                break;
            }
        }
    }

    let forward = (0..NODES).map(|index| Settled { index, scale: 1.0 });
    let backward = (0..NODES).rev().map(|index| Settled { index, scale: 0.0 });
    assert_eq!(settled, forward.chain(backward).collect::<Vec<_>>());
    assert_eq!(view.chain().sweep(), Sweep::Forward);
    assert_eq!(view.chain().current_index(), 0);
    assert!(view.chain().nodes().all(|node| node.state.scale == 0.0));
}

#[test]
fn visible_lines_grow_with_cursor() {
    let mut host = RecordingHost::default();
    let mut view = OneTwentyLineView::new();

    for expected_nodes in 2..=NODES {
        view.handle_tap(&mut host);
        run_to_rest(&mut view, &mut host);
        let commands = frame(&mut view, &mut host);
        assert_eq!(commands.len(), 1 + expected_nodes * LINES as usize);
    }
}
