//! Greedy merging of short, gently turning cubic runs.

use kurbo::CubicBez;

use crate::geom::{phase, phase_delta_min};
use crate::outline::Segment;

/// Merge consecutive cubics into single cubics.
///
/// One left-to-right pass. A run grows while its accumulated arc length
/// stays within `arc_thresh` and the chord of the newest segment turns
/// no more than `turn_thresh` degrees from the chord of the run's first
/// segment.
///
/// - Exceeding the arc budget (or reaching the end of the path) closes
///   the run with the newest segment in it.
/// - Exceeding the turn budget closes the run without the newest segment,
///   which then opens the next run.
///
/// Lines are never merged. `arc_thresh <= 0` leaves the path untouched.
pub fn compress(segments: &[Segment], arc_thresh: f64, turn_thresh: f64) -> Vec<Segment> {
    if arc_thresh <= 0.0 {
        return segments.to_vec();
    }
    let turn_limit = turn_thresh.to_radians();

    let mut out = Vec::with_capacity(segments.len());
    let mut run: Vec<CubicBez> = Vec::new();
    let mut run_len = 0.0;

    for seg in segments {
        let c = match seg {
            Segment::Line(_) => {
                flush(&mut run, &mut out);
                run_len = 0.0;
                out.push(*seg);
                continue;
            }
            Segment::Cubic(c) => *c,
        };

        if let Some(first) = run.first() {
            if chord_turn(first, &c) > turn_limit {
                flush(&mut run, &mut out);
                run_len = 0.0;
            }
        }

        run.push(c);
        run_len += seg.arclen();
        if run_len > arc_thresh {
            flush(&mut run, &mut out);
            run_len = 0.0;
        }
    }
    flush(&mut run, &mut out);
    out
}

/// Absolute angle between two segment chords.
fn chord_turn(a: &CubicBez, b: &CubicBez) -> f64 {
    phase_delta_min(phase(b.p3 - b.p0), phase(a.p3 - a.p0)).abs()
}

/// Emit the current run: one segment unchanged, several as a single
/// cubic spanning first start to last end with the outer handles.
fn flush(run: &mut Vec<CubicBez>, out: &mut Vec<Segment>) {
    match run.as_slice() {
        [] => {}
        [only] => out.push(Segment::Cubic(*only)),
        [first, .., last] => {
            out.push(Segment::Cubic(CubicBez::new(first.p0, first.p1, last.p2, last.p3)));
        }
    }
    run.clear();
}
