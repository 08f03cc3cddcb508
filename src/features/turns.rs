use super::{Bouts, Landmark, Poi, Quadrants};
use crate::config::FitConfig;
use crate::error::FitError;
use crate::optimize::minimize_bounded;
use crate::outline::Outline;

/// Guard for the slope ratio where the tangent is vertical.
const MIN_TANGENT_X: f64 = 1e-12;

/// The point in `[t0, t1]` where the tangent is closest to horizontal.
///
/// Minimizes |tangent.y / tangent.x|. Between a bout and a corner this is
/// where the outline stops curving one way and starts curving the other.
pub fn find_turn(
    outline: &Outline,
    t0: f64,
    t1: f64,
    label: Landmark,
    config: &FitConfig,
) -> Result<Poi, FitError> {
    if !(t0 < t1) {
        return Err(FitError::bracket(
            label,
            format!("reversed bracket [{:.6}, {:.6}]", t0, t1),
        ));
    }
    // An undefined direction is never the most horizontal one.
    let slope = |t: f64| match outline.unit_tangent(t) {
        Some(tan) => tan.y.abs() / tan.x.abs().max(MIN_TANGENT_X),
        None => f64::INFINITY,
    };
    let min = minimize_bounded(slope, t0, t1, config.xatol)
        .ok_or_else(|| FitError::bracket(label, "minimizer rejected the bracket"))?;
    Ok(Poi::new(label, min.x))
}

/// The four turning points, each bracketed by a bout and a corner in
/// outline order.
pub fn find(
    outline: &Outline,
    bouts: &Bouts,
    corners: &Quadrants,
    config: &FitConfig,
) -> Result<Quadrants, FitError> {
    let upper_left = find_turn(
        outline,
        bouts.upper.left.t,
        corners.upper_left.t,
        Landmark::TurnUpperLeft,
        config,
    )?;
    let lower_left = find_turn(
        outline,
        corners.lower_left.t,
        bouts.lower.left.t,
        Landmark::TurnLowerLeft,
        config,
    )?;
    let lower_right = find_turn(
        outline,
        bouts.lower.right.t,
        corners.lower_right.t,
        Landmark::TurnLowerRight,
        config,
    )?;
    let upper_right = find_turn(
        outline,
        corners.upper_right.t,
        bouts.upper.right.t,
        Landmark::TurnUpperRight,
        config,
    )?;

    Ok(Quadrants {
        upper_left,
        lower_left,
        lower_right,
        upper_right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Segment;
    use approx::assert_abs_diff_eq;
    use kurbo::{CubicBez, Line};

    fn wiggle() -> Outline {
        Outline::new(vec![
            Segment::Cubic(CubicBez::new((0.0, 0.0), (1.0, -1.0), (2.0, 1.0), (3.0, 0.0))),
            Segment::Line(Line::new((3.0, 0.0), (0.0, 0.0))),
        ])
    }

    #[test]
    fn finds_the_horizontal_tangent() {
        let ol = wiggle();
        let hi = ol.local_to_t(0, 0.5);
        let poi = find_turn(&ol, 0.0, hi, Landmark::TurnUpperLeft, &FitConfig::default()).unwrap();
        let (ix, t) = ol.t_to_local(poi.t);
        assert_eq!(ix, 0);
        // y'(t) = 3(-1 + 6t - 6t²) vanishes at (3 - √3) / 6.
        assert_abs_diff_eq!(t, (3.0 - 3.0_f64.sqrt()) / 6.0, epsilon = 1e-3);
    }

    #[test]
    fn reversed_bracket_is_a_search_failure() {
        let err = find_turn(&wiggle(), 0.4, 0.1, Landmark::TurnLowerRight, &FitConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            FitError::BracketSearch {
                landmark: Landmark::TurnLowerRight,
                ..
            }
        ));
    }
}
