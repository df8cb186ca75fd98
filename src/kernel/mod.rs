//! Geometric kernel used by the split engine.
//!
//! Line noding, line/region booleans, containment, self repair and ring
//! construction. Polygon-polygon booleans come from `geo`; the line
//! operations are noded here so every operation cuts at the same points.

pub mod noding;
pub mod predicates;
pub mod validity;

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{
    BooleanOps, Contains, Coord, EuclideanDistance, LineString, MultiLineString, MultiPolygon,
    Point, Polygon,
};

use crate::error::{GeometryError, Result};
use crate::math::coords_equal;

pub use noding::node_line;
pub use predicates::{angle_between, orientation, RotationDirection};
pub use validity::is_valid;

/// Cuts each of `lines` where it meets `splitter` and drops the parts that
/// run along the splitter.
#[must_use]
pub fn difference(lines: &[LineString], splitter: &LineString, tolerance: f64) -> MultiLineString {
    let parts = lines
        .iter()
        .flat_map(|line| node_line(line, &[splitter], false, tolerance))
        .filter(|part| {
            piece_midpoint(part)
                .is_some_and(|mid| Point::from(mid).euclidean_distance(splitter) > tolerance)
        })
        .collect();
    MultiLineString::new(parts)
}

/// Returns the parts of `splitter` lying inside or on the boundary of
/// `polygon`, cut at every crossing with the polygon's rings and with
/// itself.
#[must_use]
pub fn intersection(polygon: &Polygon, splitter: &LineString, tolerance: f64) -> MultiLineString {
    let rings: Vec<&LineString> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .collect();
    let parts = node_line(splitter, &rings, true, tolerance)
        .into_iter()
        .filter(|part| {
            piece_midpoint(part)
                .is_some_and(|mid| polygon.coordinate_position(&mid) != CoordPos::Outside)
        })
        .collect();
    MultiLineString::new(parts)
}

/// Returns `true` if `line` lies in the interior of `polygon`.
#[must_use]
pub fn contains(polygon: &Polygon, line: &LineString) -> bool {
    polygon.contains(line)
}

/// Returns `true` if `coord` lies strictly inside `polygon`.
#[must_use]
pub fn is_interior(polygon: &Polygon, coord: Coord) -> bool {
    polygon.coordinate_position(&coord) == CoordPos::Inside
}

/// `true` if the first segment of a noded piece runs strictly inside
/// `polygon` rather than along its boundary.
#[must_use]
pub fn runs_inside(polygon: &Polygon, piece: &[Coord]) -> bool {
    match piece {
        [a, b, ..] => is_interior(
            polygon,
            Coord {
                x: (a.x + b.x) * 0.5,
                y: (a.y + b.y) * 0.5,
            },
        ),
        _ => false,
    }
}

/// Polygon difference `a - b`.
#[must_use]
pub fn region_difference(a: &Polygon, b: &Polygon) -> Vec<Polygon> {
    a.difference(b).0
}

/// Polygon intersection `a & b`.
#[must_use]
pub fn region_intersection(a: &Polygon, b: &Polygon) -> Vec<Polygon> {
    a.intersection(b).0
}

/// Rebuilds `polygon` through a zero-distance boolean pass.
///
/// Self-intersections are resolved and slivers collapse; the result holds
/// every simple polygon part, and is empty if nothing with area survives.
#[must_use]
pub fn self_repair(polygon: &Polygon) -> Vec<Polygon> {
    MultiPolygon::new(vec![polygon.clone()])
        .union(&MultiPolygon::<f64>::new(Vec::new()))
        .0
}

/// Returns `true` if the first and last points of `line` coincide.
#[must_use]
pub fn is_closed(line: &LineString, tolerance: f64) -> bool {
    match (line.0.first(), line.0.last()) {
        (Some(&first), Some(&last)) => line.0.len() > 1 && coords_equal(first, last, tolerance),
        _ => false,
    }
}

/// Removes consecutive coordinates closer than `tolerance`.
#[must_use]
pub fn dedup_coords(coords: &[Coord], tolerance: f64) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(coords.len());
    for &c in coords {
        if out.last().is_some_and(|&last| coords_equal(last, c, tolerance)) {
            continue;
        }
        out.push(c);
    }
    out
}

/// Builds a closed linear ring from an ordered coordinate sequence.
///
/// Consecutive duplicates are dropped and the ring is closed exactly.
///
/// # Errors
///
/// Returns `GeometryError::TooFewPoints` if fewer than three distinct
/// vertices remain.
pub fn build_ring(coords: &[Coord], tolerance: f64) -> Result<LineString> {
    let mut ring = dedup_coords(coords, tolerance);
    if ring.len() > 1 && coords_equal(ring[0], ring[ring.len() - 1], tolerance) {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(GeometryError::TooFewPoints {
            min: 4,
            actual: ring.len() + 1,
        }
        .into());
    }
    ring.push(ring[0]);
    Ok(LineString::new(ring))
}

/// Builds a polygon from a shell ring and hole rings.
#[must_use]
pub fn build_polygon(shell: LineString, holes: Vec<LineString>) -> Polygon {
    Polygon::new(shell, holes)
}

fn piece_midpoint(piece: &LineString) -> Option<Coord> {
    piece.lines().next().map(|seg| Coord {
        x: (seg.start.x + seg.end.x) * 0.5,
        y: (seg.start.y + seg.end.y) * 0.5,
    })
}
