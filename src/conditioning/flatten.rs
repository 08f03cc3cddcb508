//! Force horizontal tangents at the top and bottom of the centerline.

use log::debug;

use crate::outline::{Outline, Segment, JOIN_TOLERANCE};
use crate::optimize::minimize_bounded;

/// Give the first segment's first control and the last segment's second
/// control the start point's y, so the outline leaves and returns to the
/// top of the centerline horizontally.
pub fn flatten_top(segments: &mut [Segment]) {
    let Some(start) = segments.first().map(Segment::start) else {
        return;
    };
    if let Some(Segment::Cubic(c)) = segments.first_mut() {
        c.p1.y = start.y;
    }
    if let Some(Segment::Cubic(c)) = segments.last_mut() {
        c.p2.y = start.y;
    }
}

/// Find where the outline crosses the vertical through its start point
/// inside `window`, put a join there, and flatten both handles at that
/// join onto the crossing's y.
///
/// If the crossing lies within `JOIN_TOLERANCE` (in local parameter) of an
/// existing join, that join is reused instead of splitting.
pub fn flatten_bottom(outline: Outline, window: (f64, f64), xatol: f64) -> Outline {
    if outline.is_empty() {
        return outline;
    }
    let axis_x = outline.segments()[0].start().x;

    let Some(min) = minimize_bounded(
        |t| (outline.point(t).x - axis_x).abs(),
        window.0,
        window.1,
        xatol,
    ) else {
        return outline;
    };

    let (ix, local) = outline.t_to_local(min.x);
    let mut outline = outline;
    let join = if local <= JOIN_TOLERANCE {
        ix
    } else if local >= 1.0 - JOIN_TOLERANCE {
        ix + 1
    } else {
        outline.split_at(min.x)
    };

    let mut segments = outline.into_segments();
    let n = segments.len();
    let join = join % n;
    let prev = (join + n - 1) % n;
    let y = segments[join].start().y;
    debug!(
        "bottom crossing at T={:.6} (segment {}, y={:.3})",
        min.x, join, y
    );

    if let Segment::Cubic(c) = &mut segments[prev] {
        c.p2.y = y;
        c.p3.y = y;
    }
    if let Segment::Cubic(c) = &mut segments[join] {
        c.p0.y = y;
        c.p1.y = y;
    }
    Outline::new(segments)
}
