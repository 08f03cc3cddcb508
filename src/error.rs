use thiserror::Error;

use crate::features::Landmark;

/// Errors that can occur while conditioning, measuring, or fitting an outline.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FitError {
    #[error("malformed path: {0}")]
    MalformedPath(String),

    #[error("no paths to fit")]
    NoPaths,

    #[error("no valid bracket for {landmark}: {reason}")]
    BracketSearch { landmark: Landmark, reason: String },

    #[error(
        "span {from} \u{2192} {to} did not converge after {iterations} iterations \
         (last rotation update {residual:.3e} rad)"
    )]
    NonConvergence {
        from: Landmark,
        to: Landmark,
        iterations: usize,
        residual: f64,
    },

    #[error("span {from} \u{2192} {to} ends {residual:.3} away from its target")]
    MissedTarget {
        from: Landmark,
        to: Landmark,
        residual: f64,
    },

    #[error("tangent undefined at {landmark} (T={t:.6})")]
    UndefinedTangent { landmark: Landmark, t: f64 },

    #[error("unknown landmark label '{0}'")]
    UnknownLandmark(String),

    #[error("invalid parameter range [{0}, {1}]")]
    InvalidRange(f64, f64),

    #[error("failed to parse SVG path: {0}")]
    SvgParse(#[from] kurbo::SvgParseError),
}

impl FitError {
    pub(crate) fn bracket(landmark: Landmark, reason: impl Into<String>) -> Self {
        FitError::BracketSearch {
            landmark,
            reason: reason.into(),
        }
    }
}
