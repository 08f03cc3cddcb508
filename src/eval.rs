//! Span-versus-clothoid comparison.
//!
//! Samples an outline span and the clothoid fitted to it at the same
//! number of evenly spaced parameters and reports how far apart the
//! corresponding nodes are.

use std::fmt;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::clothoid::Clothoid;
use crate::outline::Outline;

/// Node-by-node distances between an outline span and its clothoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanComparison {
    /// Outline points at evenly spaced T from the span's first landmark
    /// to its second (descending when the span runs backwards).
    pub outline_points: Vec<Point>,
    /// Clothoid points at evenly spaced Euler parameters over `[t0, t1]`.
    pub clothoid_points: Vec<Point>,
    /// Distance between corresponding nodes.
    pub distances: Vec<f64>,
    pub max: f64,
    pub mean: f64,
}

/// Compare the outline between `t0` and `t1` with `clothoid` at `nodes`
/// nodes (at least two).
pub fn compare_span(
    outline: &Outline,
    t0: f64,
    t1: f64,
    clothoid: &Clothoid,
    nodes: usize,
) -> SpanComparison {
    let n = nodes.max(2);
    let lerp = |a: f64, b: f64, i: usize| a + (b - a) * i as f64 / (n - 1) as f64;

    let outline_points: Vec<Point> = (0..n).map(|i| outline.point(lerp(t0, t1, i))).collect();
    let clothoid_points: Vec<Point> = (0..n)
        .map(|i| clothoid.point(lerp(clothoid.t0, clothoid.t1, i)))
        .collect();
    let distances: Vec<f64> = outline_points
        .iter()
        .zip(&clothoid_points)
        .map(|(a, b)| (*a - *b).hypot())
        .collect();

    let max = distances.iter().copied().fold(0.0, f64::max);
    let mean = distances.iter().sum::<f64>() / n as f64;

    SpanComparison {
        outline_points,
        clothoid_points,
        distances,
        max,
        mean,
    }
}

impl fmt::Display for SpanComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} nodes   max {:.3}   mean {:.3}",
            self.distances.len(),
            self.max,
            self.mean
        )?;
        for (i, ((a, b), d)) in self
            .outline_points
            .iter()
            .zip(&self.clothoid_points)
            .zip(&self.distances)
            .enumerate()
        {
            writeln!(
                f,
                "  {:>3}  ({:>9.3}, {:>9.3})  ({:>9.3}, {:>9.3})  {:>8.4}",
                i, a.x, a.y, b.x, b.y, d
            )?;
        }
        Ok(())
    }
}
