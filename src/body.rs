//! A scanned instrument body: conditioned outline, landmarks and the
//! clothoid chain fitted between them.

use kurbo::{Point, Rect};
use log::info;

use crate::clothoid::{fit_chain, Clothoid, SpanFit};
use crate::conditioning;
use crate::config::FitConfig;
use crate::error::FitError;
use crate::features::{self, Features, Poi};
use crate::model::{outline_points, ClothoidRecord, LandmarkRecord, ModelRecord};
use crate::outline::{Outline, Segment};

/// Result of [`Body::scan`].
#[derive(Debug, Clone)]
pub struct Body {
    outline: Outline,
    bbox: Rect,
    features: Features,
    chain: Vec<SpanFit>,
    inspects: Vec<f64>,
    highlights: Vec<usize>,
}

impl Body {
    /// Condition `outline`, find its landmarks and fit the chain.
    pub fn scan(outline: &Outline, config: &FitConfig) -> Result<Body, FitError> {
        let conditioned = conditioning::process(outline, config)?;
        let features = features::extract(&conditioned, config)?;
        let chain = fit_chain(&conditioned, &features, config)?;
        let body = Body::assemble(conditioned, features, chain);

        let converged = body.chain.iter().filter(|s| s.converged).count();
        let worst = body.chain.iter().map(|s| s.residual).fold(0.0, f64::max);
        info!(
            "Fit: {} spans, {} converged, worst end residual {:.3}",
            body.chain.len(),
            converged,
            worst
        );
        Ok(body)
    }

    fn assemble(outline: Outline, features: Features, chain: Vec<SpanFit>) -> Body {
        let bbox = outline.bbox();
        Body {
            outline,
            bbox,
            features,
            chain,
            inspects: Vec::new(),
            highlights: Vec::new(),
        }
    }

    /// The conditioned outline every landmark refers to.
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn landmarks(&self) -> Vec<Poi> {
        self.features.landmarks()
    }

    pub fn chain(&self) -> &[SpanFit] {
        &self.chain
    }

    pub fn clothoids(&self) -> impl Iterator<Item = &Clothoid> + '_ {
        self.chain.iter().map(|s| &s.clothoid)
    }

    pub fn outline_polyline(&self, n: usize) -> Vec<Point> {
        self.outline.polyline(n)
    }

    /// `(T, curvature)` at `n` evenly spaced parameters.
    pub fn curvature_profile(&self, n: usize) -> Vec<(f64, f64)> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                (t, self.outline.curvature(t))
            })
            .collect()
    }

    /// Each clothoid of the chain as `n` points.
    pub fn clothoid_polylines(&self, n: usize) -> Vec<Vec<Point>> {
        self.clothoids().map(|c| c.polyline(n)).collect()
    }

    /// Mark a parameter for inspection.
    pub fn inspect(&mut self, t: f64) -> Result<Poi, FitError> {
        if !(0.0..=1.0).contains(&t) {
            return Err(FitError::InvalidRange(t, t));
        }
        self.inspects.push(t);
        let (ix, _) = self.outline.t_to_local(t);
        info!(
            "Inspect T={:.4}: segment {}, point {:?}, curvature {:.5}",
            t,
            ix,
            self.outline.point(t),
            self.outline.curvature(t)
        );
        Ok(self.nearest_landmark(t))
    }

    pub fn inspects(&self) -> &[f64] {
        &self.inspects
    }

    /// Mark an outline segment. Returns false for an index past the end.
    pub fn highlight(&mut self, segment: usize) -> bool {
        if segment >= self.outline.len() {
            return false;
        }
        if !self.highlights.contains(&segment) {
            self.highlights.push(segment);
        }
        true
    }

    pub fn highlights(&self) -> &[usize] {
        &self.highlights
    }

    pub fn highlighted_segments(&self) -> Vec<Segment> {
        self.highlights
            .iter()
            .map(|&ix| self.outline.segments()[ix])
            .collect()
    }

    /// The landmark whose parameter is closest to `t`.
    pub fn nearest_landmark(&self, t: f64) -> Poi {
        let gap = |p: &Poi| (p.t - t).abs();
        let marks = self.landmarks();
        let mut best = marks[0];
        for poi in &marks[1..] {
            if gap(poi) < gap(&best) {
                best = *poi;
            }
        }
        best
    }

    pub fn to_record(&self) -> ModelRecord {
        ModelRecord {
            bbox: [self.bbox.x0, self.bbox.y0, self.bbox.x1, self.bbox.y1],
            outline: outline_points(&self.outline),
            landmarks: self
                .landmarks()
                .iter()
                .map(|p| LandmarkRecord::new(p, &self.outline))
                .collect(),
            clothoids: self.chain.iter().map(ClothoidRecord::from).collect(),
            inspects: self.inspects.clone(),
            highlights: self.highlights.clone(),
        }
    }
}
