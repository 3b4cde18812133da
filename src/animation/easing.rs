//! Piecewise scale curves that drive the fold animation.
//!
//! Every function here is pure: the same input always produces the same
//! output and nothing is cached between calls. A node's scale is a single
//! scalar in `0.0..=1.0`; these helpers split it into equal segments, detect
//! which side of the midpoint it sits on, and derive the per-tick increment.
//!
//! ## Example
//!
//! ```
//! use onetwenty::animation::easing::{divide_scale, update_value};
//!
//! // Second half-phase of a node that is three quarters of the way through.
//! assert_eq!(divide_scale(0.75, 1, 2), 0.5);
//!
//! // One forward tick with four lines per node.
//! assert!((update_value(0.0, 1.0, 4, 4) - 0.0125).abs() < 1e-6);
//! ```

/// Scale increment applied per tick before the mirror rate is factored in.
pub const SC_GAP: f32 = 0.05;

/// Midpoint threshold used by [`scale_factor`].
///
/// Slightly above one half so that every value in `0.0..=1.0` maps to
/// exactly `0` or `1`.
pub const SC_DIV: f32 = 0.51;

/// Reciprocal of a segment count.
///
/// A zero count yields `0.0` instead of infinity so that configurable callers
/// never divide by zero.
pub fn inverse(n: u32) -> f32 {
    if n == 0 {
        return 0.0;
    }
    1.0 / n as f32
}

/// Progress left over after the first `i` of `n` equal segments, never negative.
pub fn max_scale(x: f32, i: u32, n: u32) -> f32 {
    (x - i as f32 * inverse(n)).max(0.0)
}

/// Local progress of the `i`-th of `n` equal segments of `x`, in `0.0..=1.0`.
pub fn divide_scale(x: f32, i: u32, n: u32) -> f32 {
    inverse(n).min(max_scale(x, i, n)) * n as f32
}

/// `0.0` below the midpoint threshold, `1.0` at or above it.
pub fn scale_factor(x: f32) -> f32 {
    (x / SC_DIV).floor()
}

/// Blend between the rates `1/a` and `1/b` depending on which side of the
/// midpoint `x` is on.
///
/// With `a == b` this is always `1/a`. The threshold check is kept so the two
/// rates can diverge.
pub fn mirror_value(x: f32, a: u32, b: u32) -> f32 {
    let k = scale_factor(x);
    (1.0 - k) * inverse(a) + k * inverse(b)
}

/// Signed per-tick increment for a node currently at scale `x`.
pub fn update_value(x: f32, dir: f32, a: u32, b: u32) -> f32 {
    mirror_value(x, a, b) * dir * SC_GAP
}
