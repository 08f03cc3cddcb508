//! Conditioning pipeline for traced outlines.
//!
//! Four steps: smooth joins → compress short runs → flatten top →
//! flatten bottom. The result is the frozen outline every later stage
//! reads from.

mod compress;
mod flatten;
mod smooth;

pub use compress::compress;
pub use flatten::{flatten_bottom, flatten_top};
pub use smooth::smooth;

use log::info;

use crate::config::FitConfig;
use crate::error::FitError;
use crate::outline::Outline;

/// Validate and condition an outline.
///
/// Fails with `MalformedPath` if the input is open, discontinuous, or has
/// a zero-length segment. Conditioning itself never opens the outline.
pub fn process(outline: &Outline, config: &FitConfig) -> Result<Outline, FitError> {
    outline.validate()?;
    let n_in = outline.len();

    let smoothed = smooth(outline.segments());

    let mut compressed = compress(&smoothed, config.arc_thresh, config.turn_thresh);
    info!(
        "Conditioning: {} segments → {} after compression",
        n_in,
        compressed.len()
    );

    flatten_top(&mut compressed);
    let flattened = flatten_bottom(
        Outline::new(compressed),
        config.flatten_window,
        config.flatten_xatol,
    );
    flattened.validate()?;
    info!("Conditioning: {} segments after flattening", flattened.len());

    Ok(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Segment;
    use kurbo::{CubicBez, Line, Point};

    /// Egg shape made of lines and cubics, start at the top of the
    /// centerline.
    fn egg() -> Outline {
        Outline::new(vec![
            Segment::Cubic(CubicBez::new((0.0, 20.0), (-6.0, 20.0), (-10.0, 14.0), (-10.0, 8.0))),
            Segment::Line(Line::new((-10.0, 8.0), (-10.0, -2.0))),
            Segment::Cubic(CubicBez::new((-10.0, -2.0), (-10.0, -9.0), (-5.0, -12.0), (1.0, -12.0))),
            Segment::Cubic(CubicBez::new((1.0, -12.0), (6.0, -12.0), (10.0, -8.0), (10.0, -2.0))),
            Segment::Line(Line::new((10.0, -2.0), (10.0, 8.0))),
            Segment::Cubic(CubicBez::new((10.0, 8.0), (10.0, 14.0), (6.0, 20.0), (0.0, 20.0))),
        ])
    }

    #[test]
    fn conditioned_outline_stays_closed() {
        let out = process(&egg(), &FitConfig::default()).unwrap();
        out.validate().unwrap();
        assert!(out.segments().iter().all(Segment::is_cubic));
        assert_eq!(out.point(0.0), out.point(1.0));
        assert_eq!(out.point(0.0), Point::new(0.0, 20.0));
    }

    #[test]
    fn open_input_is_rejected() {
        let open = Outline::new(vec![Segment::Line(Line::new((0.0, 0.0), (1.0, 0.0)))]);
        assert!(matches!(
            process(&open, &FitConfig::default()),
            Err(FitError::MalformedPath(_))
        ));
    }
}
