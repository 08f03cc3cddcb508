//! Handle averaging at joins.
//!
//! Tracers leave small tangent breaks at almost every join. Replacing
//! both handles at a join by their average makes the join G1 without
//! moving any on-curve point.

use kurbo::CubicBez;

use crate::outline::Segment;

/// Promote every segment to a cubic and average the handles at every
/// join, the closing join included.
pub fn smooth(segments: &[Segment]) -> Vec<Segment> {
    let mut cubics: Vec<CubicBez> = segments.iter().map(Segment::to_cubic).collect();
    let n = cubics.len();
    if n < 2 {
        return cubics.into_iter().map(Segment::Cubic).collect();
    }

    for ix in 0..n {
        let prev_ix = (ix + n - 1) % n;
        let prev = cubics[prev_ix];
        let cur = cubics[ix];

        let incoming = prev.p3 - prev.p2;
        let outgoing = cur.p1 - cur.p0;
        let avg = (incoming + outgoing) / 2.0;

        cubics[prev_ix].p2 = prev.p3 - avg;
        cubics[ix].p1 = cur.p0 + avg;
    }

    cubics.into_iter().map(Segment::Cubic).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use kurbo::{Line, Point};

    #[test]
    fn lines_become_straight_cubics() {
        let segs = vec![
            Segment::Line(Line::new((0.0, 0.0), (10.0, 0.0))),
            Segment::Line(Line::new((10.0, 0.0), (20.0, 0.0))),
            Segment::Line(Line::new((20.0, 0.0), (0.0, 0.0))),
        ];
        let out = smooth(&segs);
        assert!(out.iter().all(Segment::is_cubic));
        // Collinear neighbours: handles stay on the line.
        let (c1, c2) = out[0].controls().unwrap();
        assert_abs_diff_eq!(c1.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c2.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn join_becomes_tangent_continuous() {
        let segs = vec![
            Segment::Cubic(CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0))),
            Segment::Cubic(CubicBez::new((3.0, 0.0), (4.0, 0.0), (5.0, -1.0), (6.0, 0.0))),
            Segment::Line(Line::new((6.0, 0.0), (0.0, 0.0))),
        ];
        let out = smooth(&segs);
        for ix in 0..out.len() {
            let next = &out[(ix + 1) % out.len()];
            assert_eq!(out[ix].end(), next.start());
            let a = out[ix].unit_tangent(1.0).unwrap();
            let b = next.unit_tangent(0.0).unwrap();
            assert_abs_diff_eq!(a.cross(b), 0.0, epsilon = 1e-12);
            assert!(a.dot(b) > 0.0);
        }
        assert_eq!(out[1].start(), Point::new(3.0, 0.0));
    }
}
