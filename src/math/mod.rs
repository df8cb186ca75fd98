pub mod distance_2d;

use geo::Coord;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Default tolerance for coordinate matching.
pub const TOLERANCE: f64 = 1e-9;

/// Returns `true` if two coordinates are within `tolerance` of each other.
#[must_use]
pub fn coords_equal(a: Coord, b: Coord, tolerance: f64) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy <= tolerance * tolerance
}

/// Vector from `from` to `to`.
#[must_use]
pub fn direction(from: Coord, to: Coord) -> Vector2 {
    Vector2::new(to.x - from.x, to.y - from.y)
}

/// Compass quadrant of a direction vector.
///
/// Axis-aligned directions fall into the quadrant that starts at that axis
/// when sweeping counter-clockwise from east.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// Classifies the direction `(dx, dy)`.
    #[must_use]
    pub fn of(dx: f64, dy: f64) -> Self {
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => Self::NorthEast,
            (false, true) => Self::NorthWest,
            (false, false) => Self::SouthWest,
            (true, false) => Self::SouthEast,
        }
    }

    /// Returns `true` for the two quadrants whose directions point west.
    #[must_use]
    pub fn is_westward(self) -> bool {
        matches!(self, Self::NorthWest | Self::SouthWest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_equal_within_tolerance() {
        let a = Coord { x: 1.0, y: 1.0 };
        let b = Coord { x: 1.0 + 1e-12, y: 1.0 };
        assert!(coords_equal(a, b, TOLERANCE));
        assert!(!coords_equal(a, Coord { x: 1.1, y: 1.0 }, TOLERANCE));
    }

    #[test]
    fn quadrants() {
        assert_eq!(Quadrant::of(1.0, 1.0), Quadrant::NorthEast);
        assert_eq!(Quadrant::of(-1.0, 1.0), Quadrant::NorthWest);
        assert_eq!(Quadrant::of(-1.0, -1.0), Quadrant::SouthWest);
        assert_eq!(Quadrant::of(1.0, -1.0), Quadrant::SouthEast);
        // Due north belongs to the north-east quadrant.
        assert_eq!(Quadrant::of(0.0, 1.0), Quadrant::NorthEast);
        assert!(Quadrant::of(-2.0, 0.0).is_westward());
        assert!(!Quadrant::of(0.0, -2.0).is_westward());
    }
}
