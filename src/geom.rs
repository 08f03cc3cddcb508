//! Shared geometry utilities.

use std::f64::consts::{PI, TAU};

use kurbo::{Point, Vec2};

/// Minimum angular distance from `b` to `a`, in [-pi, pi].
pub fn phase_delta_min(a: f64, b: f64) -> f64 {
    let d = a - b;
    d.sin().atan2(d.cos())
}

/// Wrap an angle into [0, 2pi).
pub fn wrap_tau(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Direction of a vector in [-pi, pi].
pub fn phase(v: Vec2) -> f64 {
    v.y.atan2(v.x)
}

/// The direction pointing the opposite way, in [0, 2pi).
pub fn opposite(angle: f64) -> f64 {
    wrap_tau(angle + PI)
}

/// Curvature of the circle through three points: 1 / circumradius.
///
/// Uses the chord-sagitta form: with chord `w` from `p0` to `p2` and
/// sagitta `h` from the chord midpoint to `p1`, r = h/2 + w²/(8h).
/// Collinear points give 0.
pub fn circumcurvature(p0: Point, p1: Point, p2: Point) -> f64 {
    let mid = p0.midpoint(p2);
    let w = (p2 - p0).hypot();
    let h = (p1 - mid).hypot();
    let denom = 4.0 * h * h + w * w;
    if denom < 1e-300 {
        return 0.0;
    }
    8.0 * h / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn delta_min_wraps_through_pi() {
        assert_abs_diff_eq!(phase_delta_min(0.1, TAU - 0.1), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(phase_delta_min(TAU - 0.1, 0.1), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(phase_delta_min(PI / 2.0, 0.0), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn wrap_tau_is_half_open() {
        assert_abs_diff_eq!(wrap_tau(-PI / 2.0), 1.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_tau(TAU), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(opposite(PI / 4.0), 1.25 * PI, epsilon = 1e-12);
    }

    #[test]
    fn circumcurvature_of_unit_circle() {
        let a = Point::new(1.0, 0.0);
        let b = Point::new(0.0, 1.0);
        let c = Point::new(-1.0, 0.0);
        assert_abs_diff_eq!(circumcurvature(a, b, c), 1.0, epsilon = 1e-12);
        let flat = circumcurvature(a, Point::new(2.0, 0.0), Point::new(3.0, 0.0));
        assert_eq!(flat, 0.0);
    }
}
