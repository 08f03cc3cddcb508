//! Closed outline paths and their global parameterization.
//!
//! The global parameter `T` runs from 0 to 1 around the whole outline.
//! Each segment owns a share of `[0, 1]` proportional to its arc length,
//! and inside that share `T` maps linearly onto the segment's local `t`.

mod extrema;
mod segment;

pub use extrema::{bezier_extrema, Axis};
pub use segment::Segment;

use kurbo::{BezPath, PathEl, Point, Rect, Shape, Vec2};
use log::{debug, trace};

use crate::error::FitError;
use crate::geom::circumcurvature;
use crate::optimize::minimize_sampled;

/// Endpoints closer than this are considered coincident.
pub const JOIN_TOLERANCE: f64 = 1e-6;

/// Segments shorter than this are degenerate.
const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// First resample offset when the tangent is undefined at `T`.
const TANGENT_NUDGE: f64 = 0.01;

/// Second resample offset, in the other direction.
const TANGENT_NUDGE_FORWARD: f64 = 0.001;

/// Half-width of the `T` window used by the curvature estimate.
const CURVATURE_DELTA: f64 = 0.02;

/// Optimizer precision for closest-point searches.
const CLOSEST_XATOL: f64 = 1e-5;

/// Default coarse sampling for closest-point searches.
const CLOSEST_SAMPLES: usize = 64;

/// An ordered, continuous sequence of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    segments: Vec<Segment>,
    /// Arc length of each segment.
    lengths: Vec<f64>,
    total: f64,
}

impl Outline {
    /// Build an outline, measuring every segment. Validation is separate:
    /// see [`Outline::validate`].
    pub fn new(segments: Vec<Segment>) -> Self {
        let lengths: Vec<f64> = segments.iter().map(Segment::arclen).collect();
        let total = lengths.iter().sum();
        Outline {
            segments,
            lengths,
            total,
        }
    }

    /// Build from the first subpath of a kurbo path. Quadratics are raised
    /// to cubics; a closing line is included when the subpath does not
    /// already end on its start.
    pub fn from_bezpath(path: &BezPath) -> Self {
        let mut segments = Vec::new();
        let mut started = false;
        let mut start = Point::ZERO;
        let mut current = Point::ZERO;
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    if started {
                        break;
                    }
                    started = true;
                    start = p;
                    current = p;
                }
                PathEl::LineTo(p) => {
                    segments.push(Segment::Line(kurbo::Line::new(current, p)));
                    current = p;
                }
                PathEl::QuadTo(a, p) => {
                    let q = kurbo::QuadBez::new(current, a, p);
                    segments.push(Segment::Cubic(q.raise()));
                    current = p;
                }
                PathEl::CurveTo(a, b, p) => {
                    segments.push(Segment::Cubic(kurbo::CubicBez::new(current, a, b, p)));
                    current = p;
                }
                PathEl::ClosePath => {
                    if (current - start).hypot() > JOIN_TOLERANCE {
                        segments.push(Segment::Line(kurbo::Line::new(current, start)));
                    }
                    break;
                }
            }
        }
        Outline::new(segments)
    }

    /// Parse SVG path data (first subpath).
    pub fn from_svg(data: &str) -> Result<Self, FitError> {
        let path = BezPath::from_svg(data)?;
        Ok(Outline::from_bezpath(&path))
    }

    /// Check the invariants the pipeline relies on: non-empty, continuous,
    /// closed, no zero-length segments.
    pub fn validate(&self) -> Result<(), FitError> {
        if self.segments.is_empty() {
            return Err(FitError::MalformedPath("path has no segments".into()));
        }
        for (ix, seg) in self.segments.iter().enumerate() {
            if !(self.lengths[ix] > MIN_SEGMENT_LENGTH) {
                return Err(FitError::MalformedPath(format!(
                    "segment {} has zero length at ({:.3}, {:.3})",
                    ix,
                    seg.start().x,
                    seg.start().y
                )));
            }
            let next = &self.segments[(ix + 1) % self.segments.len()];
            let gap = (seg.end() - next.start()).hypot();
            if gap > JOIN_TOLERANCE {
                let what = if ix + 1 == self.segments.len() {
                    "path is not closed".to_string()
                } else {
                    format!("segments {} and {} are not joined", ix, ix + 1)
                };
                return Err(FitError::MalformedPath(format!("{} (gap {:.3e})", what, gap)));
            }
        }
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Total arc length.
    pub fn total_length(&self) -> f64 {
        self.total
    }

    /// Global parameter → (segment index, local t).
    pub fn t_to_local(&self, t: f64) -> (usize, f64) {
        let n = self.segments.len();
        if n == 0 || self.total <= 0.0 {
            return (0, t.clamp(0.0, 1.0));
        }
        if t >= 1.0 {
            return (n - 1, 1.0);
        }
        if t <= 0.0 {
            return (0, 0.0);
        }
        let mut t0 = 0.0;
        for (ix, len) in self.lengths.iter().enumerate() {
            let share = len / self.total;
            let t1 = t0 + share;
            if t <= t1 {
                let local = if share > 0.0 { (t - t0) / share } else { 0.0 };
                return (ix, local.clamp(0.0, 1.0));
            }
            t0 = t1;
        }
        (n - 1, 1.0)
    }

    /// (segment index, local t) → global parameter.
    pub fn local_to_t(&self, ix: usize, t: f64) -> f64 {
        if self.total <= 0.0 || ix >= self.segments.len() {
            return 0.0;
        }
        let before: f64 = self.lengths[..ix].iter().sum();
        (before + t * self.lengths[ix]) / self.total
    }

    pub fn point(&self, t: f64) -> Point {
        let (ix, local) = self.t_to_local(t);
        self.segments[ix].eval(local)
    }

    /// Unit tangent, `None` where the derivative vanishes.
    pub fn try_unit_tangent(&self, t: f64) -> Option<Vec2> {
        let (ix, local) = self.t_to_local(t);
        self.segments.get(ix)?.unit_tangent(local)
    }

    /// Unit tangent at `t`. Where it is undefined it is resampled a fixed
    /// step back, then a smaller step forward; `None` if both fail.
    pub fn unit_tangent(&self, t: f64) -> Option<Vec2> {
        if let Some(tan) = self.try_unit_tangent(t) {
            return Some(tan);
        }
        for nudged in [t - TANGENT_NUDGE, t + TANGENT_NUDGE_FORWARD] {
            if let Some(tan) = self.try_unit_tangent(nudged.clamp(0.0, 1.0)) {
                trace!("tangent singular at T={:.6}, resampled at T={:.6}", t, nudged);
                return Some(tan);
            }
        }
        debug!("tangent undefined around T={:.6}", t);
        None
    }

    /// Arc length between two global parameters (order-insensitive).
    pub fn length(&self, t0: f64, t1: f64) -> f64 {
        let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        let (s0, u0) = self.t_to_local(lo.clamp(0.0, 1.0));
        let (s1, u1) = self.t_to_local(hi.clamp(0.0, 1.0));
        if s0 == s1 {
            if u1 <= u0 {
                return 0.0;
            }
            return self.segments[s0].subsegment(u0..u1).arclen();
        }
        let mut len = 0.0;
        if u0 < 1.0 {
            len += self.segments[s0].subsegment(u0..1.0).arclen();
        }
        len += self.lengths[s0 + 1..s1].iter().sum::<f64>();
        if u1 > 0.0 {
            len += self.segments[s1].subsegment(0.0..u1).arclen();
        }
        len
    }

    /// A new outline covering exactly `[t0, t1]`; its own parameter runs
    /// from 0 to 1 over the slice.
    pub fn slice(&self, t0: f64, t1: f64) -> Result<Outline, FitError> {
        if !(t0 < t1) || t0 < 0.0 || t1 > 1.0 || self.segments.is_empty() {
            return Err(FitError::InvalidRange(t0, t1));
        }
        let (s0, u0) = self.t_to_local(t0);
        let (s1, u1) = self.t_to_local(t1);
        if s0 == s1 {
            return Ok(Outline::new(vec![self.segments[s0].subsegment(u0..u1)]));
        }
        let mut segments = Vec::with_capacity(s1 - s0 + 1);
        if u0 < 1.0 {
            segments.push(self.segments[s0].subsegment(u0..1.0));
        }
        segments.extend_from_slice(&self.segments[s0 + 1..s1]);
        if u1 > 0.0 {
            segments.push(self.segments[s1].subsegment(0.0..u1));
        }
        Ok(Outline::new(segments))
    }

    /// Split the segment owning `t` at that point. Returns the index of
    /// the second half. The outline is re-measured.
    pub fn split_at(&mut self, t: f64) -> usize {
        let (ix, local) = self.t_to_local(t);
        let (a, b) = self.segments[ix].subdivide(local);
        self.segments[ix] = a;
        self.segments.insert(ix + 1, b);
        *self = Outline::new(std::mem::take(&mut self.segments));
        ix + 1
    }

    /// Curvature estimate at `t` from the circle through the points at
    /// `t - 0.02`, `t`, `t + 0.02` (wrapping around the closed outline).
    /// Descriptive only; nothing in the fit is steered by it.
    pub fn curvature(&self, t: f64) -> f64 {
        let wrap = |v: f64| v.rem_euclid(1.0);
        let p0 = self.point(wrap(t - CURVATURE_DELTA));
        let p1 = self.point(wrap(t));
        let p2 = self.point(wrap(t + CURVATURE_DELTA));
        circumcurvature(p0, p1, p2)
    }

    /// Global parameter of the point nearest `target`.
    ///
    /// Coarse sampling picks the best starting cell (the lowest `T` wins
    /// ties), then a bounded minimization refines inside it. `None` for an
    /// empty outline or a tolerance the minimizer rejects.
    pub fn closest_t(&self, target: Point) -> Option<f64> {
        self.closest_t_with(target, CLOSEST_SAMPLES, CLOSEST_XATOL)
    }

    pub fn closest_t_with(&self, target: Point, samples: usize, xatol: f64) -> Option<f64> {
        if self.segments.is_empty() {
            return None;
        }
        minimize_sampled(|t| (self.point(t) - target).hypot(), 0.0, 1.0, samples, xatol)
            .map(|m| m.x)
    }

    /// Tight bounding box.
    pub fn bbox(&self) -> Rect {
        self.to_bezpath().bounding_box()
    }

    /// The outline as a closed kurbo path.
    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        let Some(first) = self.segments.first() else {
            return path;
        };
        path.move_to(first.start());
        for seg in &self.segments {
            match seg {
                Segment::Line(l) => path.line_to(l.p1),
                Segment::Cubic(c) => path.curve_to(c.p1, c.p2, c.p3),
            }
        }
        path.close_path();
        path
    }

    /// `n` points evenly spaced in `T`, both ends included.
    pub fn polyline(&self, n: usize) -> Vec<Point> {
        let n = n.max(2);
        (0..n)
            .map(|i| self.point(i as f64 / (n - 1) as f64))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use kurbo::{CubicBez, Line};

    /// Axis-aligned square, counter-clockwise from the middle of the top edge.
    pub(crate) fn square(half: f64) -> Outline {
        let pts = [
            Point::new(0.0, half),
            Point::new(-half, half),
            Point::new(-half, -half),
            Point::new(half, -half),
            Point::new(half, half),
            Point::new(0.0, half),
        ];
        Outline::new(
            pts.windows(2)
                .map(|w| Segment::Line(Line::new(w[0], w[1])))
                .collect(),
        )
    }

    #[test]
    fn square_is_valid_and_closed() {
        let sq = square(1.0);
        sq.validate().unwrap();
        assert_eq!(sq.point(0.0), sq.point(1.0));
        assert_abs_diff_eq!(sq.total_length(), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn open_path_is_malformed() {
        let open = Outline::new(vec![
            Segment::Line(Line::new((0.0, 0.0), (1.0, 0.0))),
            Segment::Line(Line::new((1.0, 0.0), (1.0, 1.0))),
        ]);
        assert!(matches!(open.validate(), Err(FitError::MalformedPath(_))));
    }

    #[test]
    fn zero_length_segment_is_malformed() {
        let degenerate = Outline::new(vec![
            Segment::Line(Line::new((0.0, 0.0), (1.0, 0.0))),
            Segment::Line(Line::new((1.0, 0.0), (1.0, 0.0))),
            Segment::Line(Line::new((1.0, 0.0), (0.0, 0.0))),
        ]);
        assert!(matches!(degenerate.validate(), Err(FitError::MalformedPath(_))));
    }

    #[test]
    fn global_parameter_follows_arc_length() {
        let sq = square(1.0);
        // First edge is 1 long out of 8.
        assert_eq!(sq.t_to_local(0.125), (0, 1.0));
        let (ix, t) = sq.t_to_local(0.25);
        assert_eq!(ix, 1);
        assert_abs_diff_eq!(t, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sq.local_to_t(1, 0.5), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(sq.point(0.25).y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn length_is_additive() {
        let c = Outline::new(vec![
            Segment::Cubic(CubicBez::new((0.0, 0.0), (1.0, 2.0), (3.0, 2.0), (4.0, 0.0))),
            Segment::Cubic(CubicBez::new((4.0, 0.0), (5.0, -2.0), (7.0, -1.0), (8.0, 0.0))),
            Segment::Line(Line::new((8.0, 0.0), (0.0, 0.0))),
        ]);
        for &(a, b) in &[(0.1, 0.35), (0.2, 0.8), (0.0, 1.0), (0.45, 0.46)] {
            let whole = c.length(0.0, b);
            let parts = c.length(0.0, a) + c.length(a, b);
            assert!(c.length(a, b) >= 0.0);
            assert_abs_diff_eq!(whole, parts, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(c.length(0.0, 1.0), c.total_length(), epsilon = 1e-6);
        assert_abs_diff_eq!(c.length(0.7, 0.2), c.length(0.2, 0.7), epsilon = 1e-12);
    }

    #[test]
    fn slice_spans_exactly_the_range() {
        let sq = square(1.0);
        let s = sq.slice(0.0625, 0.3125).unwrap();
        assert_eq!(s.len(), 2);
        assert_abs_diff_eq!(s.point(0.0).x, -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.point(1.0).y, -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.total_length(), 2.0, epsilon = 1e-9);
        assert!(matches!(sq.slice(0.5, 0.2), Err(FitError::InvalidRange(..))));
    }

    #[test]
    fn split_keeps_the_shape() {
        let mut sq = square(1.0);
        let before = sq.point(0.3);
        let ix = sq.split_at(0.3);
        assert_eq!(sq.len(), 6);
        assert_eq!(sq.segments()[ix].start(), sq.segments()[ix - 1].end());
        let after = sq.point(sq.local_to_t(ix, 0.0));
        assert_abs_diff_eq!(after.x, before.x, epsilon = 1e-12);
        assert_abs_diff_eq!(after.y, before.y, epsilon = 1e-12);
        sq.validate().unwrap();
    }

    #[test]
    fn closest_point_on_square() {
        let sq = square(1.0);
        let t = sq.closest_t(Point::new(0.2, -3.0)).unwrap();
        let p = sq.point(t);
        assert_abs_diff_eq!(p.x, 0.2, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn closest_point_reports_a_failed_search() {
        assert_eq!(Outline::new(Vec::new()).closest_t(Point::ZERO), None);
        assert_eq!(square(1.0).closest_t_with(Point::ZERO, 8, 0.0), None);
    }

    #[test]
    fn tangent_is_nudged_off_a_singular_point() {
        let ol = Outline::new(vec![
            Segment::Cubic(CubicBez::new((0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (2.0, 0.0))),
            Segment::Line(Line::new((2.0, 0.0), (0.0, 0.0))),
        ]);
        assert!(ol.try_unit_tangent(0.0).is_none());
        let tan = ol.unit_tangent(0.0).unwrap();
        assert_abs_diff_eq!(tan.x, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_length_outline_has_no_tangent() {
        let dot = Outline::new(vec![Segment::Cubic(CubicBez::new(
            (3.0, 3.0),
            (3.0, 3.0),
            (3.0, 3.0),
            (3.0, 3.0),
        ))]);
        assert_eq!(dot.unit_tangent(0.5), None);
    }

    #[test]
    fn bezpath_round_trip_keeps_segments() {
        let sq = square(2.0);
        let back = Outline::from_bezpath(&sq.to_bezpath());
        assert_eq!(back.len(), sq.len());
        back.validate().unwrap();
    }

    #[test]
    fn svg_input_closes_the_loop() {
        let ol = Outline::from_svg("M0 0 L10 0 L10 10 Z").unwrap();
        assert_eq!(ol.len(), 3);
        ol.validate().unwrap();
    }
}
