//! Landmark extraction.
//!
//! Landmarks are found in strict dependency order: centerline → bouts →
//! corners → turns → 45° points. Every bracket is derived from landmarks
//! found earlier, so the first failure aborts the rest.

pub mod bouts;
pub mod centerline;
pub mod corners;
mod landmark;
pub mod slopes;
pub mod turns;

pub use bouts::Bouts;
pub use centerline::Centerline;
pub use corners::corner_candidates;
pub use landmark::{Bout, Landmark, Poi};

use kurbo::Vec2;
use log::info;

use crate::config::FitConfig;
use crate::error::FitError;
use crate::outline::Outline;

/// Four landmarks, one per quadrant of the outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrants {
    pub upper_left: Poi,
    pub lower_left: Poi,
    pub lower_right: Poi,
    pub upper_right: Poi,
}

impl Quadrants {
    /// In outline order: upper left, lower left, lower right, upper right.
    pub fn iter(&self) -> impl Iterator<Item = &Poi> + '_ {
        [
            &self.upper_left,
            &self.lower_left,
            &self.lower_right,
            &self.upper_right,
        ]
        .into_iter()
    }
}

/// Every landmark found on an outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub centerline: Centerline,
    pub bouts: Bouts,
    pub corners: Quadrants,
    pub turns: Quadrants,
    pub diagonals: Quadrants,
}

impl Features {
    /// All landmarks in [`Landmark::ALL`] order.
    pub fn landmarks(&self) -> Vec<Poi> {
        Landmark::ALL.iter().map(|&l| self.get(l)).collect()
    }

    pub fn get(&self, label: Landmark) -> Poi {
        use Landmark::*;
        match label {
            CenterlineTopLeft => self.centerline.top_left,
            CenterlineTopRight => self.centerline.top_right,
            CenterlineBottom => self.centerline.bottom,
            BoutUpperLeft => self.bouts.upper.left,
            BoutUpperRight => self.bouts.upper.right,
            BoutMiddleLeft => self.bouts.middle.left,
            BoutMiddleRight => self.bouts.middle.right,
            BoutLowerLeft => self.bouts.lower.left,
            BoutLowerRight => self.bouts.lower.right,
            CornerUpperLeft => self.corners.upper_left,
            CornerLowerLeft => self.corners.lower_left,
            CornerLowerRight => self.corners.lower_right,
            CornerUpperRight => self.corners.upper_right,
            TurnUpperLeft => self.turns.upper_left,
            TurnLowerLeft => self.turns.lower_left,
            TurnLowerRight => self.turns.lower_right,
            TurnUpperRight => self.turns.upper_right,
            DiagonalUpperLeft => self.diagonals.upper_left,
            DiagonalLowerLeft => self.diagonals.lower_left,
            DiagonalLowerRight => self.diagonals.lower_right,
            DiagonalUpperRight => self.diagonals.upper_right,
        }
    }
}

/// Averaged unit tangent of every segment.
pub fn segment_tangents(outline: &Outline, samples: usize) -> Vec<Vec2> {
    outline
        .segments()
        .iter()
        .map(|seg| seg.mean_tangent(samples))
        .collect()
}

/// Run every landmark search on a conditioned outline.
pub fn extract(outline: &Outline, config: &FitConfig) -> Result<Features, FitError> {
    let tangents = segment_tangents(outline, config.tangent_samples);

    let centerline = centerline::find(outline, config)?;
    let bouts = bouts::find(outline, &tangents, &centerline, config)?;
    let corners = corners::find(outline, &tangents, &centerline, &bouts, config)?;
    let turns = turns::find(outline, &bouts, &corners, config)?;
    let diagonals = slopes::find(outline, &centerline, &bouts, config)?;

    let features = Features {
        centerline,
        bouts,
        corners,
        turns,
        diagonals,
    };
    info!(
        "Features: {} landmarks, waist {:.2}, upper bout {:.2}, lower bout {:.2}",
        Landmark::ALL.len(),
        features.bouts.middle.width(outline),
        features.bouts.upper.width(outline),
        features.bouts.lower.width(outline),
    );
    Ok(features)
}
