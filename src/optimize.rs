//! Scalar search routines: bounded minimization and bracketed roots.
//!
//! Every routine is stateless and re-entrant. Bounds are validated up
//! front and reported as `None` so callers can attach the landmark that
//! owned the bracket.

use kurbo::common::solve_itp;

/// Evaluation cap for `minimize_bounded`.
const MAX_EVALUATIONS: usize = 500;

/// Result of a bounded minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    /// Argument of the minimum.
    pub x: f64,
    /// Function value at `x`.
    pub fx: f64,
    /// Number of function evaluations.
    pub evaluations: usize,
    /// False when the evaluation cap was hit before the tolerance was met.
    pub converged: bool,
}

/// Brent's bounded scalar minimizer over `[lo, hi]`.
///
/// Golden-section search with parabolic interpolation steps, terminating
/// when the bracket around the best point is within `xatol`. Finds one
/// local minimum; which one depends on where the first golden-section
/// step lands.
pub fn minimize_bounded<F>(mut f: F, lo: f64, hi: f64, xatol: f64) -> Option<Minimum>
where
    F: FnMut(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) || lo > hi || !(xatol > 0.0) {
        return None;
    }

    let sqrt_eps = f64::EPSILON.sqrt();
    let golden_mean = 0.5 * (3.0 - 5.0_f64.sqrt());

    let (mut a, mut b) = (lo, hi);
    let mut fulc = a + golden_mean * (b - a);
    let mut nfc = fulc;
    let mut xf = fulc;
    let mut rat: f64 = 0.0;
    let mut e: f64 = 0.0;
    let mut fx = f(xf);
    let mut evaluations = 1;
    let mut ffulc = fx;
    let mut fnfc = fx;
    let mut xm = 0.5 * (a + b);
    let mut tol1 = sqrt_eps * xf.abs() + xatol / 3.0;
    let mut tol2 = 2.0 * tol1;
    let mut converged = true;

    while (xf - xm).abs() > tol2 - 0.5 * (b - a) {
        let mut golden = true;

        // Try a parabolic fit through the three best points.
        if e.abs() > tol1 {
            golden = false;
            let mut r = (xf - nfc) * (fx - ffulc);
            let mut q = (xf - fulc) * (fx - fnfc);
            let mut p = (xf - fulc) * q - (xf - nfc) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            r = e;
            e = rat;

            if p.abs() < (0.5 * q * r).abs() && p > q * (a - xf) && p < q * (b - xf) {
                rat = p / q;
                let x = xf + rat;
                if (x - a) < tol2 || (b - x) < tol2 {
                    rat = tol1 * step_sign(xm - xf);
                }
            } else {
                golden = true;
            }
        }

        if golden {
            e = if xf >= xm { a - xf } else { b - xf };
            rat = golden_mean * e;
        }

        let x = xf + step_sign(rat) * rat.abs().max(tol1);
        let fu = f(x);
        evaluations += 1;

        if fu <= fx {
            if x >= xf {
                a = xf;
            } else {
                b = xf;
            }
            fulc = nfc;
            ffulc = fnfc;
            nfc = xf;
            fnfc = fx;
            xf = x;
            fx = fu;
        } else {
            if x < xf {
                a = x;
            } else {
                b = x;
            }
            if fu <= fnfc || nfc == xf {
                fulc = nfc;
                ffulc = fnfc;
                nfc = x;
                fnfc = fu;
            } else if fu <= ffulc || fulc == xf || fulc == nfc {
                fulc = x;
                ffulc = fu;
            }
        }

        xm = 0.5 * (a + b);
        tol1 = sqrt_eps * xf.abs() + xatol / 3.0;
        tol2 = 2.0 * tol1;

        if evaluations >= MAX_EVALUATIONS {
            converged = false;
            break;
        }
    }

    Some(Minimum {
        x: xf,
        fx,
        evaluations,
        converged,
    })
}

/// Sign used for a Brent step: zero counts as positive.
fn step_sign(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Multi-start bounded minimization.
///
/// Evaluates `f` on `samples + 1` evenly spaced points, takes the first
/// best sample (lowest x on ties), and refines it with `minimize_bounded`
/// inside the two neighbouring cells. Returns whichever of the sample and
/// the refinement is lower.
pub fn minimize_sampled<F>(mut f: F, lo: f64, hi: f64, samples: usize, xatol: f64) -> Option<Minimum>
where
    F: FnMut(f64) -> f64,
{
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return None;
    }
    let n = samples.max(2);
    let step = (hi - lo) / n as f64;

    let mut best_i = 0;
    let mut best_f = f64::INFINITY;
    for i in 0..=n {
        let x = lo + step * i as f64;
        let fx = f(x);
        if fx < best_f {
            best_f = fx;
            best_i = i;
        }
    }

    let a = lo + step * best_i.saturating_sub(1) as f64;
    let b = (lo + step * (best_i + 1) as f64).min(hi);
    let mut refined = minimize_bounded(&mut f, a, b, xatol)?;
    refined.evaluations += n + 1;
    if refined.fx <= best_f {
        Some(refined)
    } else {
        Some(Minimum {
            x: lo + step * best_i as f64,
            fx: best_f,
            evaluations: refined.evaluations,
            converged: refined.converged,
        })
    }
}

/// Root of `f` inside `[a, b]` given opposite-signed end values.
///
/// Normalizes the signs for kurbo's ITP solver, which expects an
/// increasing bracket.
pub fn solve_bracketed<F>(f: F, a: f64, b: f64, ya: f64, yb: f64, epsilon: f64) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    if ya == 0.0 {
        return Some(a);
    }
    if yb == 0.0 {
        return Some(b);
    }
    if ya.signum() == yb.signum() || !(a < b) {
        return None;
    }
    let s = yb.signum();
    let k1 = 0.2 / (b - a);
    let x = solve_itp(|t| s * f(t), a, b, epsilon, 1, k1, s * ya, s * yb);
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn minimizes_parabola() {
        let m = minimize_bounded(|x| (x - 0.3).powi(2) + 1.0, 0.0, 1.0, 1e-8).unwrap();
        assert!(m.converged);
        assert_abs_diff_eq!(m.x, 0.3, epsilon = 1e-6);
        assert_abs_diff_eq!(m.fx, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn minimum_on_the_boundary() {
        let m = minimize_bounded(|x| x, 2.0, 5.0, 1e-6).unwrap();
        assert!(m.x - 2.0 < 1e-5);
    }

    #[test]
    fn rejects_reversed_bounds() {
        assert!(minimize_bounded(|x| x * x, 1.0, 0.0, 1e-5).is_none());
        assert!(minimize_sampled(|x| x * x, 1.0, 0.0, 8, 1e-5).is_none());
    }

    #[test]
    fn sampled_search_finds_global_minimum() {
        // Two wells; the deeper one sits away from the first golden-section point.
        let f = |x: f64| {
            let a = (x - 0.2).powi(2);
            let b = (x - 0.85).powi(2) - 0.05;
            a.min(b)
        };
        let m = minimize_sampled(f, 0.0, 1.0, 32, 1e-8).unwrap();
        assert_abs_diff_eq!(m.x, 0.85, epsilon = 1e-5);
    }

    #[test]
    fn bracketed_root_either_orientation() {
        let f = |x: f64| x * x - 2.0;
        let r = solve_bracketed(f, 0.0, 2.0, f(0.0), f(2.0), 1e-12).unwrap();
        assert_abs_diff_eq!(r, 2.0_f64.sqrt(), epsilon = 1e-9);

        let g = |x: f64| 2.0 - x * x;
        let r = solve_bracketed(g, 0.0, 2.0, g(0.0), g(2.0), 1e-12).unwrap();
        assert_abs_diff_eq!(r, 2.0_f64.sqrt(), epsilon = 1e-9);

        assert!(solve_bracketed(f, 2.0, 3.0, f(2.0), f(3.0), 1e-12).is_none());
    }
}
