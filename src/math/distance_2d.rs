use geo::Coord;

/// Parameter of the projection of `p` onto the line through `a` and `b`.
///
/// `0` at `a`, `1` at `b`; not clamped.
#[must_use]
pub fn segment_param(p: Coord, a: Coord, b: Coord) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < 1e-20 {
        return 0.0;
    }
    ((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq
}
