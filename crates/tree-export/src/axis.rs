//! Axis-aligned cut directions.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One of the two axis-aligned cut directions.
///
/// Every partition split is perpendicular to either the X or the Y axis;
/// arbitrary cut planes are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Both axes, in the order they are tried during construction.
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    /// Returns the coordinate of `point` along this axis.
    #[inline]
    pub fn coord(self, point: &Point2<f64>) -> f64 {
        match self {
            Axis::X => point.x,
            Axis::Y => point.y,
        }
    }

    /// Returns the component index of this axis (X = 0, Y = 1).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}
