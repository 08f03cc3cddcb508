use kurbo::Point;

use super::{Landmark, Poi};
use crate::config::FitConfig;
use crate::error::FitError;
use crate::outline::Outline;

/// The three landmarks on the axis of symmetry.
///
/// The outline starts and ends at the top of the centerline, so the top
/// appears twice: once at T = 0 (leaving to the left) and once at T = 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centerline {
    pub top_left: Poi,
    pub top_right: Poi,
    pub bottom: Poi,
}

impl Centerline {
    /// x of the axis of symmetry.
    pub fn x(&self, outline: &Outline) -> f64 {
        self.top_left.point(outline).x
    }
}

/// Top landmarks at the path ends; bottom is the point nearest the foot
/// of the vertical through the start point.
pub fn find(outline: &Outline, config: &FitConfig) -> Result<Centerline, FitError> {
    if outline.is_empty() {
        return Err(FitError::MalformedPath("path has no segments".into()));
    }
    let top_left = Poi::new(Landmark::CenterlineTopLeft, 0.0);
    let top_right = Poi::new(Landmark::CenterlineTopRight, 1.0);

    let foot = Point::new(top_left.point(outline).x, outline.bbox().y0);
    let t = outline
        .closest_t_with(foot, config.closest_samples, config.xatol)
        .ok_or_else(|| FitError::bracket(Landmark::CenterlineBottom, "closest-point search failed"))?;
    let bottom = Poi::new(Landmark::CenterlineBottom, t);

    Ok(Centerline {
        top_left,
        top_right,
        bottom,
    })
}
