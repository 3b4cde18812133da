//! Full-screen one-twenty line view. Tap anywhere to unfold the next node.
//!
//! Run with `RUST_LOG=debug` to follow taps and settles.

use onetwenty::view::OneTwentyLineView;

fn main() {
    if let Err(e) = OneTwentyLineView::create() {
        log::error!("one_twenty exited with an error: {e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
