//! Fit one clothoid per landmark span.
//!
//! For a span p0 → p1 the clothoid starts at p0 pointing along the
//! outline (or against it, whichever faces p1), turns by the angle
//! between that direction and the outline tangent at p1, and is scaled
//! so its length matches the outline's. The rotation is then corrected
//! until the bearing from p0 to the clothoid point nearest p1 matches the
//! bearing from p0 to p1.

use std::f64::consts::PI;

use kurbo::Vec2;
use log::{debug, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::Clothoid;
use crate::config::FitConfig;
use crate::error::FitError;
use crate::eval::{compare_span, SpanComparison};
use crate::features::{Features, Landmark, Poi};
use crate::geom::{opposite, phase, phase_delta_min, wrap_tau};
use crate::outline::Outline;

/// Smallest Euler parameter used for a span with no turn.
const MIN_EULER_T: f64 = 1e-6;

/// The closest-point search on a trial clothoid extends this far past
/// the initial Euler parameter.
const SEARCH_OVERSHOOT: f64 = 1.25;

/// An end parameter within this fraction of the search bound is on it.
const BOUND_FRACTION: f64 = 1e-6;

/// Landmark pairs of the clothoid chain, in outline order.
///
/// Each span starts at the landmark the clothoid grows from, so some
/// spans run against the outline direction.
pub const SPANS: [(Landmark, Landmark); 16] = [
    (Landmark::CenterlineTopLeft, Landmark::DiagonalUpperLeft),
    (Landmark::TurnUpperLeft, Landmark::DiagonalUpperLeft),
    (Landmark::TurnUpperLeft, Landmark::CornerUpperLeft),
    (Landmark::BoutMiddleLeft, Landmark::CornerUpperLeft),
    (Landmark::BoutMiddleLeft, Landmark::CornerLowerLeft),
    (Landmark::TurnLowerLeft, Landmark::CornerLowerLeft),
    (Landmark::TurnLowerLeft, Landmark::DiagonalLowerLeft),
    (Landmark::CenterlineBottom, Landmark::DiagonalLowerLeft),
    (Landmark::CenterlineBottom, Landmark::DiagonalLowerRight),
    (Landmark::TurnLowerRight, Landmark::DiagonalLowerRight),
    (Landmark::TurnLowerRight, Landmark::CornerLowerRight),
    (Landmark::BoutMiddleRight, Landmark::CornerLowerRight),
    (Landmark::BoutMiddleRight, Landmark::CornerUpperRight),
    (Landmark::TurnUpperRight, Landmark::CornerUpperRight),
    (Landmark::TurnUpperRight, Landmark::DiagonalUpperRight),
    (Landmark::CenterlineTopRight, Landmark::DiagonalUpperRight),
];

/// One fitted element of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanFit {
    pub from: Landmark,
    pub to: Landmark,
    /// Outline parameters of the two landmarks.
    pub span: (f64, f64),
    pub clothoid: Clothoid,
    /// Outline arc length between the landmarks.
    pub arclen: f64,
    /// Turn the clothoid makes over the span, radians.
    pub phi: f64,
    /// Euler parameter that produces `phi`.
    pub euler_t: f64,
    pub iterations: usize,
    /// The rotation settled and the end landed within `end_tol` of the
    /// target, short of the search bound.
    pub converged: bool,
    /// Last rotation correction applied, radians.
    pub update: f64,
    /// Distance from the clothoid's end to the second landmark.
    pub residual: f64,
    pub comparison: SpanComparison,
}

/// Starting direction and handedness for a clothoid from `p0` to `p1`.
///
/// The outline tangent at `p0` or its opposite, whichever lies nearer the
/// chord p0 → p1, in [0, 2π). The clothoid turns clockwise when that
/// direction is counter-clockwise of the chord.
pub fn phase_delta(outline: &Outline, p0: &Poi, p1: &Poi) -> Result<(f64, bool), FitError> {
    let forward = wrap_tau(phase(p0.tangent(outline)?));
    let backward = opposite(forward);
    let chord = wrap_tau(phase(p1.point(outline) - p0.point(outline)));

    let rotation = if phase_delta_min(backward, chord).abs() < phase_delta_min(forward, chord).abs()
    {
        backward
    } else {
        forward
    };
    let clockwise = phase_delta_min(rotation, chord) > 0.0;
    Ok((rotation, clockwise))
}

/// Outline tangent at `t`, attributed to `label` when undefined.
fn tangent_at(outline: &Outline, label: Landmark, t: f64) -> Result<Vec2, FitError> {
    outline
        .unit_tangent(t)
        .ok_or(FitError::UndefinedTangent { landmark: label, t })
}

/// Fit a clothoid from `p0` towards `p1`.
pub fn fit_span(
    outline: &Outline,
    p0: &Poi,
    p1: &Poi,
    config: &FitConfig,
) -> Result<SpanFit, FitError> {
    let (mut rotation, clockwise) = phase_delta(outline, p0, p1)?;
    let origin = p0.point(outline);
    let target = p1.point(outline);

    let trim = if p1.label.is_corner() {
        config.corner_trim
    } else {
        0.0
    };
    let (arclen, end_dir) = if p1.t > p0.t {
        (
            outline.length(p0.t, p1.t),
            wrap_tau(phase(tangent_at(outline, p1.label, p1.t - trim)?)),
        )
    } else {
        (
            outline.length(p1.t, p0.t),
            wrap_tau(phase(-tangent_at(outline, p1.label, p1.t + trim)?)),
        )
    };

    let phi = phase_delta_min(rotation, end_dir).abs();
    let euler_t = (2.0 * phi / PI).sqrt().max(MIN_EULER_T);
    let scale = arclen / euler_t;

    debug!(
        "{} \u{2192} {}: T {:.4}..{:.4} rot {:6.2}° phi {:6.2}° {} arc {:.2} scale {:.2} t {:.3}",
        p0.label,
        p1.label,
        p0.t,
        p1.t,
        rotation.to_degrees(),
        phi.to_degrees(),
        if clockwise { "cw" } else { "ccw" },
        arclen,
        scale,
        euler_t,
    );

    let bearing = phase(target - origin);
    let max_t = SEARCH_OVERSHOOT * euler_t;
    let nearest_t = |cl: &Clothoid| {
        cl.closest_t(target, max_t)
            .ok_or(FitError::InvalidRange(cl.t0, max_t))
    };
    let mut iterations = 0;
    let mut update = f64::INFINITY;
    let mut settled = false;
    while iterations < config.max_iterations {
        iterations += 1;
        let trial = Clothoid::new(scale, rotation, origin, clockwise, 0.0);
        let nearest = trial.point(nearest_t(&trial)?);
        update = phase_delta_min(bearing, phase(nearest - origin));
        if update.abs() < config.convergence_tol {
            settled = true;
            break;
        }
        rotation += update;
    }

    let clothoid = Clothoid::new(scale, rotation, origin, clockwise, 0.0);
    let end = nearest_t(&clothoid)?;
    let clothoid = clothoid.with_end(end);
    let residual = (clothoid.end() - target).hypot();
    // An end on the search bound means the target is out of reach.
    let clamped = end >= max_t * (1.0 - BOUND_FRACTION);
    let converged = settled && !clamped && residual <= config.end_tol;

    if !converged {
        if config.require_convergence {
            return Err(if settled {
                FitError::MissedTarget {
                    from: p0.label,
                    to: p1.label,
                    residual,
                }
            } else {
                FitError::NonConvergence {
                    from: p0.label,
                    to: p1.label,
                    iterations,
                    residual: update.abs(),
                }
            });
        }
        if settled {
            warn!(
                "{} \u{2192} {} settled but ends {:.3} from its target{}",
                p0.label,
                p1.label,
                residual,
                if clamped { " at the search bound" } else { "" }
            );
        } else {
            warn!(
                "{} \u{2192} {} did not converge in {} iterations (last update {:.3e} rad)",
                p0.label,
                p1.label,
                iterations,
                update.abs()
            );
        }
    }

    let comparison = compare_span(outline, p0.t, p1.t, &clothoid, config.compare_nodes);
    debug!(
        "{} \u{2192} {}: end t {:.4} residual {:.4} max dev {:.4} mean dev {:.4}",
        p0.label, p1.label, end, residual, comparison.max, comparison.mean
    );

    Ok(SpanFit {
        from: p0.label,
        to: p1.label,
        span: (p0.t, p1.t),
        clothoid,
        arclen,
        phi,
        euler_t,
        iterations,
        converged,
        update,
        residual,
        comparison,
    })
}

/// Fit every span in [`SPANS`]. With the `parallel` feature the spans
/// are fitted concurrently; the result order is the same.
pub fn fit_chain(
    outline: &Outline,
    features: &Features,
    config: &FitConfig,
) -> Result<Vec<SpanFit>, FitError> {
    let fit = |&(from, to): &(Landmark, Landmark)| {
        fit_span(outline, &features.get(from), &features.get(to), config)
    };

    #[cfg(feature = "parallel")]
    let chain = SPANS.par_iter().map(fit).collect();
    #[cfg(not(feature = "parallel"))]
    let chain = SPANS.iter().map(fit).collect();

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Segment;
    use approx::assert_abs_diff_eq;
    use kurbo::{CubicBez, Line, Point};

    /// Cubic Hermite approximation of `cl` over `[0, t1]` in `n` pieces.
    fn sampled(cl: &Clothoid, t1: f64, n: usize) -> Vec<Segment> {
        let dt = t1 / n as f64;
        (0..n)
            .map(|i| {
                let (a, b) = (dt * i as f64, dt * (i + 1) as f64);
                let (pa, pb) = (cl.point(a), cl.point(b));
                let da = cl.tangent(a) * cl.scale * dt / 3.0;
                let db = cl.tangent(b) * cl.scale * dt / 3.0;
                Segment::Cubic(CubicBez::new(pa, pa + da, pb - db, pb))
            })
            .collect()
    }

    #[test]
    fn exact_clothoid_span_converges() {
        let truth = Clothoid::new(100.0, 0.3, Point::new(5.0, 5.0), false, 0.0);
        let ol = Outline::new(sampled(&truth, 1.2, 40));
        let p0 = Poi::new(Landmark::CenterlineBottom, 0.0);
        let p1 = Poi::new(Landmark::DiagonalLowerRight, 1.0);

        let fit = fit_span(&ol, &p0, &p1, &FitConfig::default()).unwrap();
        assert!(!fit.clothoid.clockwise);
        assert!(fit.residual < 1e-3, "residual {}", fit.residual);
        assert_abs_diff_eq!(fit.arclen, 120.0, epsilon = 1e-3);
        assert_abs_diff_eq!(fit.euler_t, 1.2, epsilon = 1e-4);
        assert!(fit.comparison.max < 1e-2);
    }

    #[test]
    fn reversed_span_grows_backwards() {
        let truth = Clothoid::new(60.0, 2.0, Point::ZERO, true, 0.0);
        let ol = Outline::new(sampled(&truth, 0.9, 30));
        // The clothoid grows from the far end back to the start.
        let p0 = Poi::new(Landmark::TurnUpperLeft, 1.0);
        let p1 = Poi::new(Landmark::DiagonalUpperLeft, 0.0);

        let fit = fit_span(&ol, &p0, &p1, &FitConfig::default()).unwrap();
        assert!(fit.iterations >= 1);
        assert_abs_diff_eq!(fit.arclen, 54.0, epsilon = 1e-3);
        // Growing from the curvy end the spiral model no longer matches
        // exactly, but it still ends near the target.
        assert!(fit.residual < 5.0, "residual {}", fit.residual);
    }

    #[test]
    fn straight_span_uses_the_minimum_parameter() {
        let ol = Outline::new(vec![
            Segment::Line(Line::new((0.0, 0.0), (10.0, 0.0))),
            Segment::Line(Line::new((10.0, 0.0), (0.0, 0.0))),
        ]);
        let p0 = Poi::new(Landmark::CenterlineBottom, 0.1);
        let p1 = Poi::new(Landmark::DiagonalLowerRight, 0.4);
        let fit = fit_span(&ol, &p0, &p1, &FitConfig::default()).unwrap();
        assert_abs_diff_eq!(fit.phi, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.clothoid.arclen(), 6.0, epsilon = 1e-3);
        assert!(fit.residual < 1e-3);
    }

    #[test]
    fn rotation_faces_the_chord() {
        let ol = Outline::new(vec![
            Segment::Line(Line::new((0.0, 0.0), (10.0, 0.0))),
            Segment::Line(Line::new((10.0, 0.0), (0.0, 0.0))),
        ]);
        // Outline runs +x; looking back towards the start flips the rotation.
        let p0 = Poi::new(Landmark::TurnLowerRight, 0.4);
        let p1 = Poi::new(Landmark::DiagonalLowerRight, 0.1);
        let (rotation, _) = phase_delta(&ol, &p0, &p1).unwrap();
        assert_abs_diff_eq!(rotation, PI, epsilon = 1e-12);
    }

    /// East along the x axis, then a half turn of radius 5 back west.
    fn hairpin() -> Outline {
        let k = 0.552_284_749_831 * 5.0;
        Outline::new(vec![
            Segment::Line(Line::new((0.0, 0.0), (90.0, 0.0))),
            Segment::Cubic(CubicBez::new((90.0, 0.0), (90.0 + k, 0.0), (95.0, 5.0 - k), (95.0, 5.0))),
            Segment::Cubic(CubicBez::new((95.0, 5.0), (95.0, 5.0 + k), (90.0 + k, 10.0), (90.0, 10.0))),
        ])
    }

    #[test]
    fn unreachable_target_is_not_converged() {
        // A spiral of this length turning by π never gets farther than
        // about 0.67 of its length from the start; the chord is 0.86 of it.
        let ol = hairpin();
        let p0 = Poi::new(Landmark::CenterlineBottom, 0.0);
        let p1 = Poi::new(Landmark::DiagonalLowerRight, 1.0);

        let fit = fit_span(&ol, &p0, &p1, &FitConfig::default()).unwrap();
        assert_abs_diff_eq!(fit.phi, PI, epsilon = 1e-9);
        assert!(fit.residual > 10.0, "residual {}", fit.residual);
        assert!(!fit.converged);

        let strict = FitConfig::default().with_require_convergence(true);
        assert!(matches!(
            fit_span(&ol, &p0, &p1, &strict),
            Err(FitError::MissedTarget { .. } | FitError::NonConvergence { .. })
        ));
    }

    #[test]
    fn undefined_start_tangent_is_reported() {
        let dot = Outline::new(vec![Segment::Cubic(CubicBez::new(
            (1.0, 1.0),
            (1.0, 1.0),
            (1.0, 1.0),
            (1.0, 1.0),
        ))]);
        let p0 = Poi::new(Landmark::TurnUpperRight, 0.2);
        let p1 = Poi::new(Landmark::DiagonalUpperRight, 0.8);
        assert!(matches!(
            fit_span(&dot, &p0, &p1, &FitConfig::default()),
            Err(FitError::UndefinedTangent {
                landmark: Landmark::TurnUpperRight,
                ..
            })
        ));
    }

    #[test]
    fn strict_mode_reports_non_convergence() {
        let truth = Clothoid::new(100.0, 0.3, Point::ZERO, false, 0.0);
        let ol = Outline::new(sampled(&truth, 1.2, 40));
        let p0 = Poi::new(Landmark::CenterlineBottom, 0.0);
        let p1 = Poi::new(Landmark::DiagonalLowerRight, 1.0);
        let config = FitConfig {
            max_iterations: 1,
            convergence_tol: 0.0,
            ..FitConfig::default()
        }
        .with_require_convergence(true);
        assert!(matches!(
            fit_span(&ol, &p0, &p1, &config),
            Err(FitError::NonConvergence { iterations: 1, .. })
        ));
    }
}
