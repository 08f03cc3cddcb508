use kurbo::Vec2;
use log::debug;

use super::{Bout, Centerline, Landmark, Poi};
use crate::config::FitConfig;
use crate::error::FitError;
use crate::outline::{bezier_extrema, Axis, Outline};

/// Upper, middle and lower bouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bouts {
    pub upper: Bout,
    pub middle: Bout,
    pub lower: Bout,
}

/// Which extremum a band search keeps on each side of the centerline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reach {
    /// The point farthest from the centerline.
    Outermost,
    /// Per segment the extremum facing the centerline, and across
    /// segments the one nearest to it: the waist.
    Innermost,
}

/// Indices of segments whose averaged tangent is within `bout_tol` of
/// vertical.
pub fn bout_candidates(tangents: &[Vec2], bout_tol: f64) -> Vec<usize> {
    tangents
        .iter()
        .enumerate()
        .filter(|(_, v)| v.x.abs() < bout_tol && v.y.abs() > 1.0 - bout_tol)
        .map(|(ix, _)| ix)
        .collect()
}

/// Scan candidate segments whose start y lies strictly inside
/// `(ymin, ymax)` and return the global parameters of the chosen left
/// and right extremes.
pub(crate) fn band_extrema(
    outline: &Outline,
    candidates: &[usize],
    (ymin, ymax): (f64, f64),
    center_x: f64,
    reach: Reach,
) -> (Option<f64>, Option<f64>) {
    let mut left: Option<(f64, f64)> = None;
    let mut right: Option<(f64, f64)> = None;

    for &ix in candidates {
        let seg = &outline.segments()[ix];
        let start = seg.start();
        if !(start.y > ymin && start.y < ymax) {
            continue;
        }
        let (t_min, t_max) = bezier_extrema(seg, Axis::X);
        let on_left = start.x < center_x;

        let (t, x) = match (reach, on_left) {
            (Reach::Outermost, true) | (Reach::Innermost, false) => (t_min, seg.eval(t_min).x),
            (Reach::Outermost, false) | (Reach::Innermost, true) => (t_max, seg.eval(t_max).x),
        };
        let slot = if on_left { &mut left } else { &mut right };
        let better = match (slot.as_ref(), reach, on_left) {
            (None, _, _) => true,
            (Some(&(_, best)), Reach::Outermost, true) => x < best,
            (Some(&(_, best)), Reach::Outermost, false) => x > best,
            (Some(&(_, best)), Reach::Innermost, true) => x > best,
            (Some(&(_, best)), Reach::Innermost, false) => x < best,
        };
        if better {
            *slot = Some((outline.local_to_t(ix, t), x));
        }
    }

    (left.map(|(t, _)| t), right.map(|(t, _)| t))
}

/// Find the three bouts from the vertical-tangent candidates, splitting
/// the bounding box height into thirds.
pub fn find(
    outline: &Outline,
    tangents: &[Vec2],
    centerline: &Centerline,
    config: &FitConfig,
) -> Result<Bouts, FitError> {
    let candidates = bout_candidates(tangents, config.bout_tol);
    debug!("{} bout candidate segments", candidates.len());

    let bbox = outline.bbox();
    let third = bbox.height() / 3.0;
    let y1 = bbox.y0 + third;
    let y2 = bbox.y0 + 2.0 * third;
    let cx = centerline.x(outline);

    let band = |range, reach, left: Landmark, right: Landmark| -> Result<Bout, FitError> {
        let (l, r) = band_extrema(outline, &candidates, range, cx, reach);
        let l = l.ok_or_else(|| FitError::bracket(left, "no vertical-tangent segment in band"))?;
        let r = r.ok_or_else(|| FitError::bracket(right, "no vertical-tangent segment in band"))?;
        Ok(Bout {
            left: Poi::new(left, l),
            right: Poi::new(right, r),
        })
    };

    let upper = band(
        (y2, bbox.y1),
        Reach::Outermost,
        Landmark::BoutUpperLeft,
        Landmark::BoutUpperRight,
    )?;
    let lower = band(
        (bbox.y0, y1),
        Reach::Outermost,
        Landmark::BoutLowerLeft,
        Landmark::BoutLowerRight,
    )?;
    let middle = band(
        (y1, y2),
        Reach::Innermost,
        Landmark::BoutMiddleLeft,
        Landmark::BoutMiddleRight,
    )?;

    Ok(Bouts {
        upper,
        middle,
        lower,
    })
}
