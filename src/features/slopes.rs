use std::cell::Cell;
use std::f64::consts::{FRAC_PI_4, PI};

use super::{Bouts, Centerline, Landmark, Poi, Quadrants};
use crate::config::FitConfig;
use crate::error::FitError;
use crate::geom::{phase, phase_delta_min};
use crate::optimize::solve_bracketed;
use crate::outline::Outline;

/// Samples used to find a sign change before root refinement.
const SCAN_STEPS: usize = 64;

/// The first point in `[t0, t1]` where the tangent direction equals `phi`.
///
/// The wrapped difference between the tangent angle and `phi` is scanned
/// for a sign change; changes caused by the ±π wrap are skipped. The
/// crossing is then refined with ITP.
pub fn find_slope(
    outline: &Outline,
    t0: f64,
    t1: f64,
    phi: f64,
    label: Landmark,
    config: &FitConfig,
) -> Result<Poi, FitError> {
    if !(t0 < t1) {
        return Err(FitError::bracket(
            label,
            format!("reversed bracket [{:.6}, {:.6}]", t0, t1),
        ));
    }
    let f = |t: f64| {
        outline
            .unit_tangent(t)
            .map(|tan| phase_delta_min(phase(tan), phi))
            .ok_or_else(|| FitError::bracket(label, format!("tangent undefined at T={:.6}", t)))
    };

    let step = (t1 - t0) / SCAN_STEPS as f64;
    let mut a = t0;
    let mut fa = f(a)?;
    if fa == 0.0 {
        return Ok(Poi::new(label, a));
    }
    for i in 1..=SCAN_STEPS {
        let b = if i == SCAN_STEPS { t1 } else { t0 + step * i as f64 };
        let fb = f(b)?;
        // A sample can land exactly on the direction; `signum` would
        // count that zero as positive.
        if fb == 0.0 {
            return Ok(Poi::new(label, b));
        }
        if (fa < 0.0) != (fb < 0.0) && (fa - fb).abs() < PI {
            let failed = Cell::new(None);
            let g = |t: f64| {
                f(t).unwrap_or_else(|e| {
                    failed.set(Some(e));
                    0.0
                })
            };
            let t = solve_bracketed(g, a, b, fa, fb, config.xatol * 1e-3)
                .ok_or_else(|| FitError::bracket(label, "root refinement failed"))?;
            if let Some(e) = failed.into_inner() {
                return Err(e);
            }
            return Ok(Poi::new(label, t));
        }
        a = b;
        fa = fb;
    }
    Err(FitError::bracket(
        label,
        format!(
            "tangent never reaches {:.1}° in [{:.6}, {:.6}]",
            phi.to_degrees(),
            t0,
            t1
        ),
    ))
}

/// The four 45° points between the top/bottom of the centerline and the
/// upper/lower bouts.
pub fn find(
    outline: &Outline,
    centerline: &Centerline,
    bouts: &Bouts,
    config: &FitConfig,
) -> Result<Quadrants, FitError> {
    let m = config.slope_margin;

    let upper_left = find_slope(
        outline,
        centerline.top_left.t + m,
        bouts.upper.left.t - m,
        -3.0 * FRAC_PI_4,
        Landmark::DiagonalUpperLeft,
        config,
    )?;
    let lower_left = find_slope(
        outline,
        bouts.lower.left.t + m,
        centerline.bottom.t - m,
        -FRAC_PI_4,
        Landmark::DiagonalLowerLeft,
        config,
    )?;
    let lower_right = find_slope(
        outline,
        centerline.bottom.t + m,
        bouts.lower.right.t - m,
        FRAC_PI_4,
        Landmark::DiagonalLowerRight,
        config,
    )?;
    let upper_right = find_slope(
        outline,
        bouts.upper.right.t + m,
        centerline.top_right.t - m,
        3.0 * FRAC_PI_4,
        Landmark::DiagonalUpperRight,
        config,
    )?;

    Ok(Quadrants {
        upper_left,
        lower_left,
        lower_right,
        upper_right,
    })
}
