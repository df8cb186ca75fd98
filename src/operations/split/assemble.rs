use geo::orient::{Direction, Orient};
use geo::{Contains, Coord, LineString, Polygon};
use tracing::debug;

use super::trace::Ring;
use crate::error::{GeometryError, OperationError, Result, TopologyError};
use crate::kernel;
use crate::math::coords_equal;

/// Turns traced rings into output polygons.
///
/// Untouched holes go to the first polygon covering them, invalid polygons
/// are replaced by their repaired parts, and every result is oriented with
/// a counter-clockwise shell.
///
/// # Errors
///
/// Returns an error if a ring does not stitch into a closed ring, or if
/// repairing an invalid polygon leaves nothing.
pub fn build_polygons(
    rings: &[Ring],
    holes: Vec<LineString>,
    tolerance: f64,
) -> Result<Vec<Polygon>> {
    let mut polygons = rings
        .iter()
        .map(|ring| {
            let coords = stitch(ring, tolerance)?;
            let shell = kernel::build_ring(&coords, tolerance)?;
            Ok(kernel::build_polygon(shell, Vec::new()))
        })
        .collect::<Result<Vec<_>>>()?;

    assign_holes(&mut polygons, holes);
    let polygons = repair_invalid(polygons, tolerance)?;
    Ok(polygons
        .into_iter()
        .map(|p| p.orient(Direction::Default))
        .collect())
}

/// Joins a ring's parts end to end, flipping parts as needed.
///
/// # Errors
///
/// Returns `TopologyError::InvalidTopology` if consecutive parts share no
/// endpoint, or `GeometryError::RingNotClosed` if the result does not close.
pub fn stitch(ring: &Ring, tolerance: f64) -> Result<Vec<Coord>> {
    let mut coords: Vec<Coord> = Vec::new();
    for part in &ring.parts {
        let (Some(&first), Some(&last)) = (part.first(), part.last()) else {
            continue;
        };
        let reverse = match coords.last() {
            // Orient the first part so that it runs into the second.
            None => ring.parts.get(1).is_some_and(|next| {
                !touches(last, next, tolerance) && touches(first, next, tolerance)
            }),
            Some(&tail) if coords_equal(tail, first, tolerance) => false,
            Some(&tail) if coords_equal(tail, last, tolerance) => true,
            Some(_) => {
                return Err(TopologyError::InvalidTopology(
                    "ring parts do not connect".into(),
                )
                .into());
            }
        };
        if reverse {
            coords.extend(part.iter().rev());
        } else {
            coords.extend(part.iter());
        }
    }

    let closed = match (coords.first(), coords.last()) {
        (Some(&first), Some(&last)) => coords_equal(first, last, tolerance),
        _ => false,
    };
    if !closed {
        return Err(GeometryError::RingNotClosed.into());
    }
    Ok(kernel::dedup_coords(&coords, tolerance))
}

fn touches(coord: Coord, part: &[Coord], tolerance: f64) -> bool {
    part.first().is_some_and(|&c| coords_equal(c, coord, tolerance))
        || part.last().is_some_and(|&c| coords_equal(c, coord, tolerance))
}

fn assign_holes(polygons: &mut [Polygon], holes: Vec<LineString>) {
    for hole in holes {
        let owner = polygons
            .iter_mut()
            .find(|p| Polygon::new(p.exterior().clone(), Vec::new()).contains(&hole));
        match owner {
            Some(polygon) => polygon.interiors_push(hole),
            None => debug!("untouched hole is not covered by any piece"),
        }
    }
}

fn repair_invalid(polygons: Vec<Polygon>, tolerance: f64) -> Result<Vec<Polygon>> {
    let mut out = Vec::with_capacity(polygons.len());
    for polygon in polygons {
        if kernel::is_valid(&polygon, tolerance) {
            out.push(polygon);
            continue;
        }
        let parts = kernel::self_repair(&polygon);
        if parts.is_empty() {
            return Err(OperationError::IrreparablePolygon.into());
        }
        debug!(parts = parts.len(), "repaired invalid polygon");
        out.extend(parts);
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{Area, Winding};

    use super::*;
    use crate::error::PolysplitError;
    use crate::math::TOLERANCE;

    fn coords(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn ring(parts: &[&[(f64, f64)]]) -> Ring {
        Ring {
            edges: Vec::new(),
            parts: parts.iter().map(|p| coords(p)).collect(),
        }
    }

    #[test]
    fn stitch_flips_parts_to_connect() {
        let r = ring(&[
            &[(0.0, 0.0), (0.0, 4.0), (2.0, 4.0)],
            &[(2.0, 0.0), (2.0, 4.0)],
            &[(0.0, 0.0), (2.0, 0.0)],
        ]);
        let stitched = stitch(&r, TOLERANCE).unwrap();
        assert_eq!(
            stitched,
            coords(&[(0.0, 0.0), (0.0, 4.0), (2.0, 4.0), (2.0, 0.0), (0.0, 0.0)])
        );
    }

    #[test]
    fn stitch_flips_first_part() {
        let r = ring(&[
            &[(2.0, 4.0), (0.0, 4.0), (0.0, 0.0)],
            &[(0.0, 0.0), (2.0, 0.0), (2.0, 4.0)],
        ]);
        let stitched = stitch(&r, TOLERANCE).unwrap();
        assert_eq!(stitched.len(), 5);
        assert_eq!(stitched[0], stitched[4]);
    }

    #[test]
    fn stitch_rejects_disconnected_parts() {
        let r = ring(&[&[(0.0, 0.0), (1.0, 0.0)], &[(5.0, 5.0), (6.0, 6.0)]]);
        assert!(stitch(&r, TOLERANCE).is_err());
    }

    #[test]
    fn stitch_rejects_open_ring() {
        let r = ring(&[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]]);
        assert!(matches!(
            stitch(&r, TOLERANCE),
            Err(PolysplitError::Geometry(GeometryError::RingNotClosed))
        ));
    }

    #[test]
    fn hole_goes_to_covering_polygon() {
        let rings = [
            ring(&[&[(0.0, 0.0), (0.0, 4.0), (2.0, 4.0), (2.0, 0.0), (0.0, 0.0)]]),
            ring(&[&[(2.0, 0.0), (2.0, 4.0), (4.0, 4.0), (4.0, 0.0), (2.0, 0.0)]]),
        ];
        let hole = LineString::from(vec![(2.5, 1.0), (3.0, 1.0), (3.0, 2.0), (2.5, 1.0)]);
        let polygons = build_polygons(&rings, vec![hole], TOLERANCE).unwrap();

        assert_eq!(polygons.len(), 2);
        assert!(polygons[0].interiors().is_empty());
        assert_eq!(polygons[1].interiors().len(), 1);
        assert!(polygons[1].exterior().is_ccw());
        assert!(polygons[1].interiors()[0].is_cw());
    }

    #[test]
    fn invalid_polygon_is_repaired() {
        let rings = [ring(&[&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0), (0.0, 0.0)]])];
        let polygons = build_polygons(&rings, Vec::new(), TOLERANCE).unwrap();
        assert!(!polygons.is_empty());
        let area: f64 = polygons.iter().map(Area::unsigned_area).sum();
        assert_relative_eq!(area, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn collapsed_polygon_is_irreparable() {
        let rings = [ring(&[&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)], &[(2.0, 0.0), (0.0, 0.0)]])];
        let result = build_polygons(&rings, Vec::new(), TOLERANCE);
        assert!(matches!(
            result,
            Err(PolysplitError::Operation(OperationError::IrreparablePolygon))
        ));
    }
}
