//! violfit: traced instrument outline → landmarks and a clothoid model.
//!
//! Takes the closed outline of a bowed-string instrument body, cleans it
//! up, locates its 21 landmarks (centerline, bouts, corners, turns and
//! 45° points) and fits one Euler spiral per landmark span.
//!
//! # Example
//!
//! ```no_run
//! use violfit::{fit_paths, FitConfig};
//! use violfit::kurbo::BezPath;
//!
//! let path = BezPath::from_svg("M0 600 C-300 600 -300 0 0 0 C300 0 300 600 0 600 Z")?;
//! let body = fit_paths(&[path], &FitConfig::default())?;
//! for span in body.chain() {
//!     println!("{} → {}: residual {:.3}", span.from, span.to, span.residual);
//! }
//! # Ok::<(), violfit::FitError>(())
//! ```

#![forbid(unsafe_code)]

mod body;
mod config;
mod geom;
mod optimize;

pub mod clothoid;
pub mod conditioning;
pub mod error;
pub mod eval;
pub mod features;
pub mod model;
pub mod outline;
pub mod prepare;

// Re-export kurbo so callers build paths against the same version.
pub use kurbo;

pub use body::Body;
pub use clothoid::{Clothoid, SpanFit};
pub use config::FitConfig;
pub use error::FitError;
pub use features::{Features, Landmark, Poi};
pub use model::ModelRecord;
pub use outline::{Outline, Segment};

use kurbo::BezPath;
use log::info;
use std::time::Instant;

/// Full pipeline: traced paths → scanned body.
///
/// The longest path is taken as the body outline, trimmed to its first
/// loop and put on the 0.1 mm grid before conditioning, landmark
/// extraction and the clothoid fit.
pub fn fit_paths(paths: &[BezPath], config: &FitConfig) -> Result<Body, FitError> {
    let t_start = Instant::now();

    // ── Prepare ───────────────────────────────────────────
    let outline = prepare::prepare(paths)?;
    info!(
        "Prepare     {} paths \u{2192} {} segments, perimeter {:.1}",
        paths.len(),
        outline.len(),
        outline.total_length()
    );

    // ── Scan ──────────────────────────────────────────────
    let body = Body::scan(&outline, config)?;

    let bbox = body.bbox();
    info!(
        "Result      {} landmarks \u{00b7} {} clothoids \u{00b7} {:.1} \u{00d7} {:.1}  ({}ms)",
        body.landmarks().len(),
        body.chain().len(),
        bbox.width(),
        bbox.height(),
        t_start.elapsed().as_millis()
    );
    Ok(body)
}

/// Convenience: parse SVG path data and run [`fit_paths`] on it.
pub fn fit_svg(data: &str, config: &FitConfig) -> Result<Body, FitError> {
    let path = BezPath::from_svg(data)?;
    fit_paths(&[path], config)
}
