//! Input pre-filter: pick the body outline out of traced paths and put it
//! on the model's coordinate grid.

use kurbo::{Affine, BezPath, Vec2};
use log::{debug, info};

use crate::error::FitError;
use crate::outline::{Outline, JOIN_TOLERANCE};

/// The longest traced path, by perimeter. The rest is clutter.
pub fn select_primary(paths: &[BezPath]) -> Result<Outline, FitError> {
    let mut best: Option<Outline> = None;
    for path in paths {
        let outline = Outline::from_bezpath(path);
        if outline.is_empty() {
            continue;
        }
        let longer = best
            .as_ref()
            .map_or(true, |b| outline.total_length() > b.total_length());
        if longer {
            best = Some(outline);
        }
    }
    let best = best.ok_or(FitError::NoPaths)?;
    debug!(
        "primary path: {} segments, perimeter {:.1} (of {} paths)",
        best.len(),
        best.total_length(),
        paths.len()
    );
    Ok(best)
}

/// Drop everything after the first segment that returns to the start
/// point. Tracers emit the outer and inner edge of a stroke as one path.
pub fn trim_to_first_loop(outline: Outline) -> Outline {
    if outline.is_empty() {
        return outline;
    }
    let start = outline.segments()[0].start();
    let close = outline
        .segments()
        .iter()
        .position(|s| (s.end() - start).hypot() <= JOIN_TOLERANCE);
    match close {
        Some(ix) if ix + 1 < outline.len() => {
            let mut segments = outline.into_segments();
            segments.truncate(ix + 1);
            Outline::new(segments)
        }
        _ => outline,
    }
}

/// Put the outline on the model grid.
///
/// The start point's x and the bounding box bottom move to 0, then the
/// outline is scaled so its height falls in [100, 1000) (pixels become
/// 0.1 mm units). Joins are re-attached exactly afterwards.
pub fn normalize(outline: &Outline) -> Result<Outline, FitError> {
    let first = outline
        .segments()
        .first()
        .ok_or_else(|| FitError::MalformedPath("path has no segments".into()))?;
    let bbox = outline.bbox();
    let height = bbox.height();
    if !(height > 0.0) {
        return Err(FitError::MalformedPath("outline has no height".into()));
    }

    let scale = 1000.0 / 10f64.powf(height.log10().ceil());
    let affine =
        Affine::scale(scale) * Affine::translate(Vec2::new(-first.start().x, -bbox.y0));

    let mut segments: Vec<_> = outline
        .segments()
        .iter()
        .map(|s| s.apply_affine(affine))
        .collect();
    let n = segments.len();
    for ix in 0..n {
        let next_start = segments[(ix + 1) % n].start();
        segments[ix] = segments[ix].with_end(next_start);
    }
    info!(
        "Normalized: height {:.1} → {:.1} (scale {})",
        height,
        height * scale,
        scale
    );
    Ok(Outline::new(segments))
}

/// Select, trim and normalize.
pub fn prepare(paths: &[BezPath]) -> Result<Outline, FitError> {
    let primary = select_primary(paths)?;
    normalize(&trim_to_first_loop(primary))
}
