use onetwenty::canvas::Canvas;
use onetwenty::renderer::PixmapCanvas;
use onetwenty::view::{BACK_COLOR, FORE_COLOR, NODES};
use visual_tests::{
    compare_images, reference_path, render_scenario, replay, run_visual_test,
    should_update_references, update_reference, Scenario, VisualTestConfig,
};

/// Helper macro to generate visual test functions
macro_rules! visual_test {
    ($name:ident, $scenario:literal, $taps:expr, $ticks:expr) => {
        #[test]
        fn $name() {
            let config = VisualTestConfig::new(Scenario::new($scenario, $taps, $ticks));

            if should_update_references() {
                update_reference(&config).expect("Failed to update reference");
                return;
            }

            let result = run_visual_test(&config).expect("Visual test failed to run");

            assert!(
                result.passed,
                "Visual regression detected for '{}': similarity {:.4}% (threshold: 99%), \
                 {} changed pixels\n\
                 Reference: {}\n\
                 Captured:  {}\n\
                 Diff:      {}",
                $scenario,
                result.similarity * 100.0,
                result.changed_pixels,
                result.reference_path.display(),
                result.captured_path.display(),
                result
                    .diff_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "N/A".to_string())
            );
        }
    };
}

visual_test!(test_idle, "idle", 0, 0);
visual_test!(test_first_half, "first_half", 0, 20);
visual_test!(test_mid_unfold, "mid_unfold", 0, 60);
visual_test!(test_two_unfolded, "two_unfolded", 2, 0);
visual_test!(test_all_unfolded, "all_unfolded", NODES, 0);
visual_test!(test_folding_back, "folding_back", NODES + 1, 50);

const SCENARIOS: [&str; 6] = [
    "idle",
    "first_half",
    "mid_unfold",
    "two_unfolded",
    "all_unfolded",
    "folding_back",
];

#[test]
fn references_are_committed() {
    for name in SCENARIOS {
        let path = reference_path(name);
        let image = image::open(&path)
            .unwrap_or_else(|e| panic!("missing reference {}: {e}", path.display()));
        assert_eq!((image.width(), image.height()), (600, 300), "{name}");
    }
}

#[test]
fn unfolding_changes_enough_pixels_to_fail() {
    let idle = render_scenario(&Scenario::new("idle", 0, 0), 600, 300).unwrap();
    let mid = render_scenario(&Scenario::new("mid_unfold", 0, 60), 600, 300).unwrap();

    let result = compare_images(&idle, &mid).unwrap();
    let config = VisualTestConfig::new(Scenario::new("idle", 0, 0));
    assert!(result.changed_pixels > config.max_changed_pixels);
}

fn rgba(color: onetwenty::canvas::Color) -> [u8; 4] {
    color.to_rgba8()
}

fn render(taps: usize, ticks: usize) -> PixmapCanvas {
    let view = replay(&Scenario::new("inline", taps, ticks)).unwrap();
    let mut canvas = PixmapCanvas::new(600, 300).unwrap();
    canvas.draw_color(BACK_COLOR);
    view.chain().draw(&mut canvas, &Default::default());
    canvas
}

#[test]
fn unfolded_node_paints_along_center_line() {
    // Node 0 spans x = 100..~171 on the center row once unfolded.
    let canvas = render(1, 0);
    assert_eq!(canvas.pixel(130, 150), Some(rgba(FORE_COLOR)));
    assert_eq!(canvas.pixel(130, 100), Some(rgba(BACK_COLOR)));
}

#[test]
fn hidden_nodes_are_not_painted() {
    // Only the root is visible before any node settles.
    let canvas = render(0, 0);
    for x in 190..600 {
        assert_eq!(canvas.pixel(x, 150), Some(rgba(BACK_COLOR)), "x = {x}");
    }
}
