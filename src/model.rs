//! Serializable snapshot of a scanned body.
//!
//! The outline is stored once, as control-point arrays. Landmarks and
//! clothoids refer to it by parameter and segment index only.

use kurbo::{CubicBez, Line, Point};
use serde::{Deserialize, Serialize};

use crate::clothoid::SpanFit;
use crate::error::FitError;
use crate::features::{Landmark, Poi};
use crate::outline::{Outline, Segment};

/// A landmark as `(label, T, segment index)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub label: Landmark,
    pub t: f64,
    /// Index of the outline segment holding `t`.
    pub segment: usize,
}

impl LandmarkRecord {
    pub fn new(poi: &Poi, outline: &Outline) -> Self {
        let (segment, _) = outline.t_to_local(poi.t);
        LandmarkRecord {
            label: poi.label,
            t: poi.t,
            segment,
        }
    }

    pub fn poi(&self) -> Poi {
        Poi::new(self.label, self.t)
    }
}

/// Clothoid parameters of one span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClothoidRecord {
    pub from: Landmark,
    pub to: Landmark,
    pub scale: f64,
    pub rotation: f64,
    pub origin: [f64; 2],
    pub clockwise: bool,
    pub t0: f64,
    pub t1: f64,
    pub converged: bool,
    pub residual: f64,
}

impl From<&SpanFit> for ClothoidRecord {
    fn from(fit: &SpanFit) -> Self {
        let c = &fit.clothoid;
        ClothoidRecord {
            from: fit.from,
            to: fit.to,
            scale: c.scale,
            rotation: c.rotation,
            origin: [c.origin.x, c.origin.y],
            clockwise: c.clockwise,
            t0: c.t0,
            t1: c.t1,
            converged: fit.converged,
            residual: fit.residual,
        }
    }
}

/// Everything needed to redraw or re-measure a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// `[x0, y0, x1, y1]` of the conditioned outline.
    pub bbox: [f64; 4],
    /// One entry per segment: two points for a line, four for a cubic.
    pub outline: Vec<Vec<[f64; 2]>>,
    pub landmarks: Vec<LandmarkRecord>,
    pub clothoids: Vec<ClothoidRecord>,
    /// User inspection parameters.
    pub inspects: Vec<f64>,
    /// User-highlighted segment indices.
    pub highlights: Vec<usize>,
}

/// Control points of every segment.
pub fn outline_points(outline: &Outline) -> Vec<Vec<[f64; 2]>> {
    let xy = |p: Point| [p.x, p.y];
    outline
        .segments()
        .iter()
        .map(|seg| match seg {
            Segment::Line(l) => vec![xy(l.p0), xy(l.p1)],
            Segment::Cubic(c) => vec![xy(c.p0), xy(c.p1), xy(c.p2), xy(c.p3)],
        })
        .collect()
}

impl ModelRecord {
    /// Rebuild the stored outline.
    pub fn to_outline(&self) -> Result<Outline, FitError> {
        let pt = |p: &[f64; 2]| Point::new(p[0], p[1]);
        let segments = self
            .outline
            .iter()
            .enumerate()
            .map(|(ix, pts)| match pts.as_slice() {
                [a, b] => Ok(Segment::Line(Line::new(pt(a), pt(b)))),
                [a, b, c, d] => Ok(Segment::Cubic(CubicBez::new(pt(a), pt(b), pt(c), pt(d)))),
                other => Err(FitError::MalformedPath(format!(
                    "segment {} has {} points",
                    ix,
                    other.len()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let outline = Outline::new(segments);
        outline.validate()?;
        Ok(outline)
    }
}
