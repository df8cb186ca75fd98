use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo::Coord;

use crate::math::direction;

/// Rotational sense used when sweeping around a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Returns `true` if `orientation` turns in this rotational sense.
    ///
    /// Collinear triples never match.
    #[must_use]
    pub fn matches(self, orientation: Orientation) -> bool {
        matches!(
            (self, orientation),
            (Self::Clockwise, Orientation::Clockwise)
                | (Self::CounterClockwise, Orientation::CounterClockwise)
        )
    }
}

/// Orientation of the turn `tail -> tip1 -> tip2`.
#[must_use]
pub fn orientation(tail: Coord, tip1: Coord, tip2: Coord) -> Orientation {
    RobustKernel::orient2d(tail, tip1, tip2)
}

/// Unsigned angle at `tail` between the rays towards `tip1` and `tip2`, in `[0, pi]`.
#[must_use]
pub fn angle_between(tip1: Coord, tail: Coord, tip2: Coord) -> f64 {
    direction(tail, tip1).angle(&direction(tail, tip2))
}
