use kurbo::Vec2;
use log::debug;

use super::bouts::{band_extrema, Reach};
use super::{Bouts, Centerline, Landmark, Poi, Quadrants};
use crate::config::FitConfig;
use crate::error::FitError;
use crate::outline::Outline;

/// Indices of segments whose averaged tangent jumps by more than
/// `corner_curve_tol` (sum of absolute component deltas) from the
/// previous segment's. The first segment is compared with the last.
///
/// A smooth outline reports none.
pub fn corner_candidates(tangents: &[Vec2], corner_curve_tol: f64) -> Vec<usize> {
    let n = tangents.len();
    (0..n)
        .filter(|&ix| {
            let prev = tangents[(ix + n - 1) % n];
            let cur = tangents[ix];
            (cur.x - prev.x).abs() + (cur.y - prev.y).abs() > corner_curve_tol
        })
        .collect()
}

/// Locate the four corners between the bouts.
///
/// Lower corners are searched between the lower and middle bouts, upper
/// corners between the middle and upper bouts, each keeping the
/// outermost candidate per side. Band limits come from the left bouts.
pub fn find(
    outline: &Outline,
    tangents: &[Vec2],
    centerline: &Centerline,
    bouts: &Bouts,
    config: &FitConfig,
) -> Result<Quadrants, FitError> {
    let candidates = corner_candidates(tangents, config.corner_curve_tol);
    debug!("{} corner candidate segments", candidates.len());

    let cx = centerline.x(outline);
    let lower_y = bouts.lower.left.point(outline).y;
    let middle_y = bouts.middle.left.point(outline).y;
    let upper_y = bouts.upper.left.point(outline).y;

    let (ll, lr) = band_extrema(outline, &candidates, (lower_y, middle_y), cx, Reach::Outermost);
    let lower_left = found(Landmark::CornerLowerLeft, ll, lower_y, middle_y)?;
    let lower_right = found(Landmark::CornerLowerRight, lr, lower_y, middle_y)?;

    let (ul, ur) = band_extrema(outline, &candidates, (middle_y, upper_y), cx, Reach::Outermost);
    let upper_left = found(Landmark::CornerUpperLeft, ul, middle_y, upper_y)?;
    let upper_right = found(Landmark::CornerUpperRight, ur, middle_y, upper_y)?;

    Ok(Quadrants {
        upper_left,
        lower_left,
        lower_right,
        upper_right,
    })
}

fn found(label: Landmark, t: Option<f64>, ymin: f64, ymax: f64) -> Result<Poi, FitError> {
    t.map(|t| Poi::new(label, t)).ok_or_else(|| {
        FitError::bracket(
            label,
            format!("no tangent break between y={:.3} and y={:.3}", ymin, ymax),
        )
    })
}
