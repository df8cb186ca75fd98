use geo::orient::{Direction, Orient};
use geo::{LineString, Polygon};

use crate::kernel;
use crate::math::{direction, Quadrant};

/// Orients the shell clockwise and every hole counter-clockwise.
#[must_use]
pub fn orient_polygon(polygon: &Polygon) -> Polygon {
    polygon.orient(Direction::Reversed)
}

/// Prepares a cutting line for graph construction.
///
/// An open line loses the leading and trailing points that lie strictly
/// inside the polygon, since a dangling end cannot separate anything. A
/// closed line lying wholly inside the polygon is unusable here; it can
/// only drill a hole. The survivor is reversed if its first segment points
/// west, so equal inputs always yield the same graph.
///
/// Returns `None` if no usable line remains.
#[must_use]
pub fn normalize_splitter(
    polygon: &Polygon,
    splitter: &LineString,
    tolerance: f64,
) -> Option<LineString> {
    let coords = kernel::dedup_coords(&splitter.0, tolerance);
    if coords.len() < 2 {
        return None;
    }

    let mut coords = if kernel::is_closed(splitter, tolerance) {
        if kernel::contains(polygon, splitter) {
            return None;
        }
        coords
    } else {
        let first = coords
            .iter()
            .position(|&c| !kernel::is_interior(polygon, c))?;
        let last = coords
            .iter()
            .rposition(|&c| !kernel::is_interior(polygon, c))?;
        coords[first..=last].to_vec()
    };

    if coords.len() < 2 {
        return None;
    }

    let d = direction(coords[0], coords[1]);
    if Quadrant::of(d.x, d.y).is_westward() {
        coords.reverse();
    }
    Some(LineString::new(coords))
}
