//! Per-segment coordinate extrema.
//!
//! Used by bout and corner extraction to locate the outermost point of a
//! candidate segment.

use kurbo::common::solve_quadratic;
use kurbo::Point;

use super::Segment;

/// Which coordinate an extremum search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    pub fn of(self, p: Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

/// Local parameters `(t_min, t_max)` where the segment's coordinate on
/// `axis` is smallest and largest.
///
/// Candidates are the endpoints plus the interior roots of the
/// derivative. A true cubic uses the closed-form root formula; when the
/// leading coefficient vanishes the derivative is solved as a general
/// polynomial. The first candidate wins ties, so a constant coordinate
/// reports `(0, 0)`.
pub fn bezier_extrema(seg: &Segment, axis: Axis) -> (f64, f64) {
    let mut candidates: Vec<f64> = vec![0.0, 1.0];

    if let Segment::Cubic(c) = seg {
        let a = [axis.of(c.p0), axis.of(c.p1), axis.of(c.p2), axis.of(c.p3)];
        let denom = a[0] - 3.0 * a[1] + 3.0 * a[2] - a[3];
        if denom != 0.0 {
            let delta = a[1] * a[1] - (a[0] + a[1]) * a[2] + a[2] * a[2] + (a[0] - a[1]) * a[3];
            // Negative discriminant: monotone, no interior extrema.
            if delta >= 0.0 {
                let sqdelta = delta.sqrt();
                let tau = a[0] - 2.0 * a[1] + a[2];
                for r in [(tau + sqdelta) / denom, (tau - sqdelta) / denom] {
                    if r > 0.0 && r < 1.0 {
                        candidates.push(r);
                    }
                }
            }
        } else {
            // Derivative / 3 in power form: c0 + c1 t + c2 t², with c2 = -denom = 0.
            let c0 = a[1] - a[0];
            let c1 = 2.0 * (a[0] - 2.0 * a[1] + a[2]);
            let c2 = -denom;
            candidates.extend(
                solve_quadratic(c0, c1, c2)
                    .into_iter()
                    .filter(|r| (0.0..=1.0).contains(r)),
            );
        }
    }

    let first = axis.of(seg.eval(0.0));
    let (mut t_min, mut v_min) = (0.0, first);
    let (mut t_max, mut v_max) = (0.0, first);
    for &t in &candidates {
        let v = axis.of(seg.eval(t));
        if v > v_max {
            v_max = v;
            t_max = t;
        } else if v < v_min {
            v_min = v;
            t_min = t;
        }
    }
    (t_min, t_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use kurbo::{CubicBez, Line, ParamCurve};

    #[test]
    fn symmetric_arch_peaks_at_half() {
        // x(t) = 3t(1 - t): leading coefficient vanishes, maximum at t = 0.5.
        let seg = Segment::Cubic(CubicBez::new((0.0, 0.0), (1.0, 1.0), (1.0, 2.0), (0.0, 3.0)));
        let (t_min, t_max) = bezier_extrema(&seg, Axis::X);
        assert_abs_diff_eq!(t_max, 0.5, epsilon = 1e-4);
        assert_eq!(t_min, 0.0);
    }

    #[test]
    fn s_curve_matches_dense_sampling() {
        let c = CubicBez::new((0.0, 0.0), (4.0, 1.0), (-3.0, 2.0), (1.0, 3.0));
        let seg = Segment::Cubic(c);
        let (t_min, t_max) = bezier_extrema(&seg, Axis::X);

        let mut best_min = (0.0, f64::INFINITY);
        let mut best_max = (0.0, f64::NEG_INFINITY);
        for i in 0..=100_000 {
            let t = i as f64 / 100_000.0;
            let x = c.eval(t).x;
            if x < best_min.1 {
                best_min = (t, x);
            }
            if x > best_max.1 {
                best_max = (t, x);
            }
        }
        assert_abs_diff_eq!(t_min, best_min.0, epsilon = 1e-4);
        assert_abs_diff_eq!(t_max, best_max.0, epsilon = 1e-4);
        assert!(t_min > 0.0 && t_min < 1.0);
        assert!(t_max > 0.0 && t_max < 1.0);
    }

    #[test]
    fn y_axis_of_a_dome() {
        let seg = Segment::Cubic(CubicBez::new((0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0)));
        let (_, t_max) = bezier_extrema(&seg, Axis::Y);
        assert_abs_diff_eq!(t_max, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn line_extrema_are_endpoints() {
        let seg = Segment::Line(Line::new((2.0, 0.0), (-1.0, 5.0)));
        assert_eq!(bezier_extrema(&seg, Axis::X), (1.0, 0.0));
    }
}
