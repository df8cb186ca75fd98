use geo::{LineString, MultiLineString};

use crate::kernel;
use crate::math::coords_equal;

/// Cuts `line` wherever it meets `cutting_line`, dropping any stretch that
/// runs along the cutting line.
///
/// Returns `None` if the line comes back in one unchanged piece. An empty
/// collection means the whole line lay on the cutting line.
#[must_use]
pub fn split_line(
    line: &LineString,
    cutting_line: &LineString,
    tolerance: f64,
) -> Option<MultiLineString> {
    let parts = kernel::difference(std::slice::from_ref(line), cutting_line, tolerance);
    match parts.0.as_slice() {
        [only] if same_line(only, line, tolerance) => None,
        _ => Some(parts),
    }
}

fn same_line(a: &LineString, b: &LineString, tolerance: f64) -> bool {
    a.0.len() == b.0.len()
        && a
            .0
            .iter()
            .zip(&b.0)
            .all(|(&p, &q)| coords_equal(p, q, tolerance))
}
