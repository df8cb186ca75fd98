use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Contains, Line, LineString, Polygon};

/// Returns `true` if `polygon` is well formed.
///
/// Every ring must be closed, have at least four points and a non-zero
/// area, and must not cross itself or fold back on itself. Rings may touch
/// each other at single points but must not cross or overlap. Each hole
/// must lie inside the shell and outside every other hole.
#[must_use]
pub fn is_valid(polygon: &Polygon, tolerance: f64) -> bool {
    let rings: Vec<&LineString> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .collect();

    if !rings.iter().all(|ring| ring_is_simple(ring, tolerance)) {
        return false;
    }

    for (i, a) in rings.iter().enumerate() {
        if rings[i + 1..].iter().any(|b| rings_cross(a, b)) {
            return false;
        }
    }

    let shell = Polygon::new(polygon.exterior().clone(), Vec::new());
    for (i, hole) in polygon.interiors().iter().enumerate() {
        if !shell.contains(hole) {
            return false;
        }
        let nested = polygon
            .interiors()
            .iter()
            .enumerate()
            .any(|(j, other)| i != j && Polygon::new(other.clone(), Vec::new()).contains(hole));
        if nested {
            return false;
        }
    }

    true
}

fn ring_is_simple(ring: &LineString, tolerance: f64) -> bool {
    if ring.0.len() < 4 || !ring.is_closed() {
        return false;
    }
    if Polygon::new(ring.clone(), Vec::new()).unsigned_area() <= tolerance * tolerance {
        return false;
    }

    let segments: Vec<Line> = ring.lines().collect();
    let n = segments.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(segments[i], segments[j]) {
                Some(LineIntersection::Collinear { intersection })
                    if intersection.start != intersection.end =>
                {
                    return false;
                }
                Some(_) if !adjacent => return false,
                _ => {}
            }
        }
    }
    true
}

fn rings_cross(a: &LineString, b: &LineString) -> bool {
    a.lines().any(|sa| {
        b.lines().any(|sb| match line_intersection(sa, sb) {
            Some(LineIntersection::SinglePoint { is_proper, .. }) => is_proper,
            Some(LineIntersection::Collinear { intersection }) => {
                intersection.start != intersection.end
            }
            None => false,
        })
    })
}
