use std::fmt;
use std::str::FromStr;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::FitError;
use crate::outline::Outline;

/// Every named landmark on an instrument outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Landmark {
    #[serde(rename = "CL_TL")]
    CenterlineTopLeft,
    #[serde(rename = "CL_TR")]
    CenterlineTopRight,
    #[serde(rename = "CL_B")]
    CenterlineBottom,

    #[serde(rename = "Bout_UL")]
    BoutUpperLeft,
    #[serde(rename = "Bout_UR")]
    BoutUpperRight,
    #[serde(rename = "Bout_ML")]
    BoutMiddleLeft,
    #[serde(rename = "Bout_MR")]
    BoutMiddleRight,
    #[serde(rename = "Bout_LL")]
    BoutLowerLeft,
    #[serde(rename = "Bout_LR")]
    BoutLowerRight,

    #[serde(rename = "Corner_UL")]
    CornerUpperLeft,
    #[serde(rename = "Corner_LL")]
    CornerLowerLeft,
    #[serde(rename = "Corner_LR")]
    CornerLowerRight,
    #[serde(rename = "Corner_UR")]
    CornerUpperRight,

    #[serde(rename = "Turn_UL")]
    TurnUpperLeft,
    #[serde(rename = "Turn_LL")]
    TurnLowerLeft,
    #[serde(rename = "Turn_LR")]
    TurnLowerRight,
    #[serde(rename = "Turn_UR")]
    TurnUpperRight,

    #[serde(rename = "45_UL")]
    DiagonalUpperLeft,
    #[serde(rename = "45_LL")]
    DiagonalLowerLeft,
    #[serde(rename = "45_LR")]
    DiagonalLowerRight,
    #[serde(rename = "45_UR")]
    DiagonalUpperRight,
}

impl Landmark {
    /// All landmarks in extraction order.
    pub const ALL: [Landmark; 21] = [
        Landmark::CenterlineTopLeft,
        Landmark::CenterlineTopRight,
        Landmark::CenterlineBottom,
        Landmark::BoutUpperLeft,
        Landmark::BoutUpperRight,
        Landmark::BoutMiddleLeft,
        Landmark::BoutMiddleRight,
        Landmark::BoutLowerLeft,
        Landmark::BoutLowerRight,
        Landmark::CornerUpperLeft,
        Landmark::CornerLowerLeft,
        Landmark::CornerLowerRight,
        Landmark::CornerUpperRight,
        Landmark::TurnUpperLeft,
        Landmark::TurnLowerLeft,
        Landmark::TurnLowerRight,
        Landmark::TurnUpperRight,
        Landmark::DiagonalUpperLeft,
        Landmark::DiagonalLowerLeft,
        Landmark::DiagonalLowerRight,
        Landmark::DiagonalUpperRight,
    ];

    /// Short label, e.g. `Corner_LR` or `45_UL`.
    pub fn label(self) -> &'static str {
        match self {
            Landmark::CenterlineTopLeft => "CL_TL",
            Landmark::CenterlineTopRight => "CL_TR",
            Landmark::CenterlineBottom => "CL_B",
            Landmark::BoutUpperLeft => "Bout_UL",
            Landmark::BoutUpperRight => "Bout_UR",
            Landmark::BoutMiddleLeft => "Bout_ML",
            Landmark::BoutMiddleRight => "Bout_MR",
            Landmark::BoutLowerLeft => "Bout_LL",
            Landmark::BoutLowerRight => "Bout_LR",
            Landmark::CornerUpperLeft => "Corner_UL",
            Landmark::CornerLowerLeft => "Corner_LL",
            Landmark::CornerLowerRight => "Corner_LR",
            Landmark::CornerUpperRight => "Corner_UR",
            Landmark::TurnUpperLeft => "Turn_UL",
            Landmark::TurnLowerLeft => "Turn_LL",
            Landmark::TurnLowerRight => "Turn_LR",
            Landmark::TurnUpperRight => "Turn_UR",
            Landmark::DiagonalUpperLeft => "45_UL",
            Landmark::DiagonalLowerLeft => "45_LL",
            Landmark::DiagonalLowerRight => "45_LR",
            Landmark::DiagonalUpperRight => "45_UR",
        }
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Landmark::CornerUpperLeft
                | Landmark::CornerLowerLeft
                | Landmark::CornerLowerRight
                | Landmark::CornerUpperRight
        )
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Landmark {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Landmark::ALL
            .iter()
            .copied()
            .find(|l| l.label() == s)
            .ok_or_else(|| FitError::UnknownLandmark(s.to_string()))
    }
}

/// A labeled global parameter on an outline.
///
/// Holds no reference to the outline: position and tangent are computed
/// on demand against whichever outline the caller passes, which must be
/// the one the landmark was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub label: Landmark,
    pub t: f64,
}

impl Poi {
    pub fn new(label: Landmark, t: f64) -> Self {
        Poi { label, t }
    }

    pub fn point(&self, outline: &Outline) -> Point {
        outline.point(self.t)
    }

    /// Unit tangent of the outline at this landmark.
    pub fn tangent(&self, outline: &Outline) -> Result<Vec2, FitError> {
        outline
            .unit_tangent(self.t)
            .ok_or(FitError::UndefinedTangent {
                landmark: self.label,
                t: self.t,
            })
    }
}

/// Left and right extremes of one bout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bout {
    pub left: Poi,
    pub right: Poi,
}

impl Bout {
    /// Horizontal distance between the two sides.
    pub fn width(&self, outline: &Outline) -> f64 {
        (self.right.point(outline).x - self.left.point(outline).x).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for l in Landmark::ALL {
            assert_eq!(l.label().parse::<Landmark>().unwrap(), l);
        }
        match "Corner_XX".parse::<Landmark>() {
            Err(FitError::UnknownLandmark(label)) => assert_eq!(label, "Corner_XX"),
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    #[test]
    fn degenerate_outline_has_no_tangent() {
        use crate::outline::Segment;
        use kurbo::CubicBez;

        let dot = Outline::new(vec![Segment::Cubic(CubicBez::new(
            (1.0, 1.0),
            (1.0, 1.0),
            (1.0, 1.0),
            (1.0, 1.0),
        ))]);
        let poi = Poi::new(Landmark::TurnLowerLeft, 0.5);
        assert!(matches!(
            poi.tangent(&dot),
            Err(FitError::UndefinedTangent {
                landmark: Landmark::TurnLowerLeft,
                ..
            })
        ));
    }

    #[test]
    fn only_corners_are_corners() {
        let n = Landmark::ALL.iter().filter(|l| l.is_corner()).count();
        assert_eq!(n, 4);
        assert_eq!(Landmark::CornerLowerRight.to_string(), "Corner_LR");
    }
}
