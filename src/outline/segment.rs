use std::ops::Range;

use kurbo::{
    Affine, CubicBez, Line, ParamCurve, ParamCurveArclen, ParamCurveDeriv, PathSeg, Point, Vec2,
};

/// Arc-length accuracy for segment measurements.
pub(crate) const ARCLEN_ACCURACY: f64 = 1e-9;

/// Derivative magnitude below which the tangent is treated as undefined.
const MIN_DERIV: f64 = 1e-12;

/// One piece of an outline.
///
/// Tracers emit both straight lines and cubics; conditioning turns every
/// line into a cubic, so code downstream of smoothing only ever sees
/// `Cubic`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line(Line),
    Cubic(CubicBez),
}

impl Segment {
    pub fn start(&self) -> Point {
        match self {
            Segment::Line(l) => l.p0,
            Segment::Cubic(c) => c.p0,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Segment::Line(l) => l.p1,
            Segment::Cubic(c) => c.p3,
        }
    }

    pub fn is_cubic(&self) -> bool {
        matches!(self, Segment::Cubic(_))
    }

    /// Control points of a cubic, `None` for a line.
    pub fn controls(&self) -> Option<(Point, Point)> {
        match self {
            Segment::Line(_) => None,
            Segment::Cubic(c) => Some((c.p1, c.p2)),
        }
    }

    pub fn eval(&self, t: f64) -> Point {
        match self {
            Segment::Line(l) => l.eval(t),
            Segment::Cubic(c) => c.eval(t),
        }
    }

    /// First derivative with respect to the local parameter.
    pub fn deriv(&self, t: f64) -> Vec2 {
        match self {
            Segment::Line(l) => l.p1 - l.p0,
            Segment::Cubic(c) => c.deriv().eval(t).to_vec2(),
        }
    }

    /// Unit tangent, `None` where the derivative vanishes.
    pub fn unit_tangent(&self, t: f64) -> Option<Vec2> {
        let d = self.deriv(t);
        let len = d.hypot();
        if len < MIN_DERIV || !len.is_finite() {
            None
        } else {
            Some(d / len)
        }
    }

    /// Average of the unit tangent over `samples` evenly spaced local
    /// parameters in [0, 1]. Not renormalized: a strongly curving segment
    /// averages to a shorter vector.
    pub fn mean_tangent(&self, samples: usize) -> Vec2 {
        let n = samples.max(2);
        let mut sum = Vec2::ZERO;
        let mut count = 0usize;
        for i in 0..n {
            let t = i as f64 / (n - 1) as f64;
            if let Some(tan) = self.unit_tangent(t) {
                sum += tan;
                count += 1;
            }
        }
        if count == 0 {
            Vec2::ZERO
        } else {
            sum / count as f64
        }
    }

    pub fn arclen(&self) -> f64 {
        match self {
            Segment::Line(l) => l.arclen(ARCLEN_ACCURACY),
            Segment::Cubic(c) => c.arclen(ARCLEN_ACCURACY),
        }
    }

    /// The sub-segment over a local parameter range.
    pub fn subsegment(&self, range: Range<f64>) -> Segment {
        match self {
            Segment::Line(l) => Segment::Line(l.subsegment(range)),
            Segment::Cubic(c) => Segment::Cubic(c.subsegment(range)),
        }
    }

    /// De Casteljau split at `t`.
    pub fn subdivide(&self, t: f64) -> (Segment, Segment) {
        (self.subsegment(0.0..t), self.subsegment(t..1.0))
    }

    /// The segment as a cubic. Lines get collinear controls at 30% and
    /// 70% of the chord.
    pub fn to_cubic(&self) -> CubicBez {
        match self {
            Segment::Cubic(c) => *c,
            Segment::Line(l) => CubicBez::new(l.p0, l.p0.lerp(l.p1, 0.3), l.p0.lerp(l.p1, 0.7), l.p1),
        }
    }

    pub fn apply_affine(&self, affine: Affine) -> Segment {
        match self {
            Segment::Line(l) => Segment::Line(Line::new(affine * l.p0, affine * l.p1)),
            Segment::Cubic(c) => Segment::Cubic(affine * *c),
        }
    }

    /// Replace the end point, keeping everything else.
    pub(crate) fn with_end(&self, p: Point) -> Segment {
        match self {
            Segment::Line(l) => Segment::Line(Line::new(l.p0, p)),
            Segment::Cubic(c) => Segment::Cubic(CubicBez::new(c.p0, c.p1, c.p2, p)),
        }
    }

    pub fn to_path_seg(&self) -> PathSeg {
        match self {
            Segment::Line(l) => PathSeg::Line(*l),
            Segment::Cubic(c) => PathSeg::Cubic(*c),
        }
    }
}

impl From<PathSeg> for Segment {
    fn from(seg: PathSeg) -> Self {
        match seg {
            PathSeg::Line(l) => Segment::Line(l),
            PathSeg::Quad(q) => Segment::Cubic(q.raise()),
            PathSeg::Cubic(c) => Segment::Cubic(c),
        }
    }
}

impl From<CubicBez> for Segment {
    fn from(c: CubicBez) -> Self {
        Segment::Cubic(c)
    }
}

impl From<Line> for Segment {
    fn from(l: Line) -> Self {
        Segment::Line(l)
    }
}
