//! Euler spirals (clothoids) and span fitting.
//!
//! A clothoid's curvature grows linearly with arc length. The unit
//! spiral is traced by the Fresnel integrals `(C(t), S(t))`; its tangent
//! at `t` points at angle πt²/2 and its arc length from 0 to `t` is `t`.
//! A [`Clothoid`] scales, rotates, mirrors and translates that unit spiral.

pub mod fit;
mod fresnel;

pub use fit::{fit_chain, fit_span, phase_delta, SpanFit, SPANS};
pub use fresnel::fresnel;

use std::f64::consts::FRAC_PI_2;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::optimize::minimize_sampled;

/// End parameter used until a fit sets one.
pub const DEFAULT_END: f64 = 2.1;

/// Coarse samples for closest-point searches.
const CLOSEST_SAMPLES: usize = 32;

/// Optimizer precision for closest-point searches.
const CLOSEST_XATOL: f64 = 1e-10;

/// A scaled, rotated, optionally mirrored and translated Euler spiral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clothoid {
    /// Length units per unit of the Euler parameter.
    pub scale: f64,
    /// Direction of the tangent at `t = 0`, radians. Already compensated
    /// for a non-zero `t0`.
    pub rotation: f64,
    /// Position of the point at `t0`.
    pub origin: Point,
    /// Turns clockwise (mirrored about the tangent at the origin).
    pub clockwise: bool,
    /// First Euler parameter of the arc.
    pub t0: f64,
    /// Last Euler parameter of the arc.
    pub t1: f64,
}

impl Clothoid {
    /// A clothoid whose tangent at `t0` points along `rotation`.
    ///
    /// The tangent angle the unit spiral has already accumulated at `t0`
    /// is taken out of the stored rotation, signed by handedness.
    pub fn new(scale: f64, rotation: f64, origin: Point, clockwise: bool, t0: f64) -> Self {
        let twist = if clockwise { -1.0 } else { 1.0 };
        let theta0 = FRAC_PI_2 * t0 * t0;
        Clothoid {
            scale,
            rotation: rotation - twist * theta0.sin().atan2(theta0.cos()),
            origin,
            clockwise,
            t0,
            t1: DEFAULT_END,
        }
    }

    pub fn with_end(mut self, t1: f64) -> Self {
        self.t1 = t1;
        self
    }

    /// -1 for clockwise, +1 for counter-clockwise.
    pub fn twist(&self) -> f64 {
        if self.clockwise {
            -1.0
        } else {
            1.0
        }
    }

    /// Rotate a unit-spiral vector into place, mirroring when clockwise.
    fn orient(&self, cc: f64, ss: f64) -> Vec2 {
        let tw = self.twist();
        let (sin_r, cos_r) = (tw * self.rotation).sin_cos();
        Vec2::new(cc * cos_r - ss * sin_r, tw * (cc * sin_r + ss * cos_r))
    }

    pub fn point(&self, t: f64) -> Point {
        let (s, c) = fresnel(t);
        let (s0, c0) = fresnel(self.t0);
        self.origin + self.orient(c - c0, s - s0) * self.scale
    }

    /// Unit tangent at `t`.
    pub fn tangent(&self, t: f64) -> Vec2 {
        let theta = FRAC_PI_2 * t * t;
        self.orient(theta.cos(), theta.sin())
    }

    /// Signed curvature at `t`; positive turns counter-clockwise.
    pub fn curvature(&self, t: f64) -> f64 {
        self.twist() * std::f64::consts::PI * t / self.scale
    }

    /// Parameter in `[t0, max_t]` of the point nearest `p`. `None` when
    /// `max_t` is below `t0` or not finite.
    pub fn closest_t(&self, p: Point, max_t: f64) -> Option<f64> {
        minimize_sampled(
            |t| (self.point(t) - p).hypot2(),
            self.t0,
            max_t,
            CLOSEST_SAMPLES,
            CLOSEST_XATOL,
        )
        .map(|m| m.x)
    }

    /// `n` points evenly spaced in the Euler parameter over `[t0, t1]`.
    pub fn polyline(&self, n: usize) -> Vec<Point> {
        let n = n.max(2);
        let step = (self.t1 - self.t0) / (n - 1) as f64;
        (0..n).map(|i| self.point(self.t0 + step * i as f64)).collect()
    }

    pub fn start(&self) -> Point {
        self.point(self.t0)
    }

    pub fn end(&self) -> Point {
        self.point(self.t1)
    }

    pub fn arclen(&self) -> f64 {
        self.scale * (self.t1 - self.t0)
    }
}
