use geo::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line, LineString};

use super::dedup_coords;
use crate::math::coords_equal;
use crate::math::distance_2d::segment_param;

/// A vertex of a noded line; `is_node` marks where the line is cut.
#[derive(Debug, Clone, Copy)]
struct NodedVertex {
    coord: Coord,
    is_node: bool,
}

/// Cut points collected while intersecting one line against its cutters.
struct CutSet {
    /// Per input vertex: the line must be cut at this vertex.
    vertex_nodes: Vec<bool>,
    /// Per segment: cut points strictly inside the segment, with their parameter.
    cuts: Vec<Vec<(f64, Coord)>>,
}

impl CutSet {
    fn new(vertex_count: usize) -> Self {
        Self {
            vertex_nodes: vec![false; vertex_count],
            cuts: vec![Vec::new(); vertex_count.saturating_sub(1)],
        }
    }

    fn record(&mut self, segment: usize, seg: &Line, point: Coord, tolerance: f64) {
        if coords_equal(point, seg.start, tolerance) {
            self.vertex_nodes[segment] = true;
        } else if coords_equal(point, seg.end, tolerance) {
            self.vertex_nodes[segment + 1] = true;
        } else {
            let t = segment_param(point, seg.start, seg.end).clamp(0.0, 1.0);
            self.cuts[segment].push((t, point));
        }
    }

    fn record_intersection(&mut self, segment: usize, seg: &Line, other: &Line, tolerance: f64) {
        match line_intersection(*seg, *other) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                self.record(segment, seg, intersection, tolerance);
            }
            Some(LineIntersection::Collinear { intersection }) => {
                self.record(segment, seg, intersection.start, tolerance);
                self.record(segment, seg, intersection.end, tolerance);
            }
            None => {}
        }
    }

    /// Merges vertices and sorted cut points into one vertex sequence.
    fn into_vertices(self, coords: &[Coord], tolerance: f64) -> Vec<NodedVertex> {
        let Self {
            vertex_nodes,
            mut cuts,
        } = self;
        let mut out = Vec::with_capacity(coords.len());
        for (i, (&coord, is_node)) in coords.iter().zip(vertex_nodes).enumerate() {
            push_vertex(&mut out, coord, is_node, tolerance);
            if let Some(segment_cuts) = cuts.get_mut(i) {
                segment_cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
                for &(_, point) in segment_cuts.iter() {
                    push_vertex(&mut out, point, true, tolerance);
                }
            }
        }
        out
    }
}

/// Cuts `line` at every point where it meets one of `cutters`.
///
/// Touch points, crossings and both ends of collinear overlaps all become
/// cut points. With `self_node` set, the line is also cut where it crosses
/// itself. Open lines are always cut at their endpoints. A closed line is
/// only cut at its start vertex if something meets it there, so an
/// uncut closed line comes back as a single closed piece.
#[must_use]
pub fn node_line(
    line: &LineString,
    cutters: &[&LineString],
    self_node: bool,
    tolerance: f64,
) -> Vec<LineString> {
    let coords = dedup_coords(&line.0, tolerance);
    if coords.len() < 2 {
        return Vec::new();
    }
    let closed = coords.len() > 3 && coords_equal(coords[0], coords[coords.len() - 1], tolerance);

    let segments: Vec<Line> = coords.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    let mut cut_set = CutSet::new(coords.len());

    for (i, seg) in segments.iter().enumerate() {
        for cutter in cutters {
            for other in proper_segments(cutter) {
                cut_set.record_intersection(i, seg, &other, tolerance);
            }
        }
        if self_node {
            for (j, other) in segments.iter().enumerate() {
                if !are_adjacent(i, j, segments.len(), closed) {
                    cut_set.record_intersection(i, seg, other, tolerance);
                }
            }
        }
    }

    let vertices = cut_set.into_vertices(&coords, tolerance);
    if closed {
        split_closed(vertices)
    } else {
        split_open(vertices)
    }
}

/// Segments of `line`, skipping zero-length ones.
fn proper_segments(line: &LineString) -> impl Iterator<Item = Line> + '_ {
    line.lines().filter(|seg| seg.start != seg.end)
}

fn are_adjacent(i: usize, j: usize, count: usize, closed: bool) -> bool {
    i == j
        || i.abs_diff(j) == 1
        || (closed && ((i == 0 && j == count - 1) || (j == 0 && i == count - 1)))
}

fn push_vertex(out: &mut Vec<NodedVertex>, coord: Coord, is_node: bool, tolerance: f64) {
    if let Some(last) = out.last_mut() {
        if coords_equal(last.coord, coord, tolerance) {
            last.is_node |= is_node;
            return;
        }
    }
    out.push(NodedVertex { coord, is_node });
}

fn split_open(mut vertices: Vec<NodedVertex>) -> Vec<LineString> {
    if let Some(first) = vertices.first_mut() {
        first.is_node = true;
    }
    if let Some(last) = vertices.last_mut() {
        last.is_node = true;
    }
    split_at_nodes(&vertices)
}

fn split_closed(mut vertices: Vec<NodedVertex>) -> Vec<LineString> {
    let Some(closing) = vertices.pop() else {
        return Vec::new();
    };
    let Some(first) = vertices.first_mut() else {
        return Vec::new();
    };
    first.is_node |= closing.is_node;

    let Some(start) = vertices.iter().position(|v| v.is_node) else {
        let mut ring: Vec<Coord> = vertices.iter().map(|v| v.coord).collect();
        ring.push(ring[0]);
        return vec![LineString::new(ring)];
    };
    vertices.rotate_left(start);
    vertices.push(vertices[0]);
    split_at_nodes(&vertices)
}

fn split_at_nodes(vertices: &[NodedVertex]) -> Vec<LineString> {
    let mut pieces = Vec::new();
    let mut current: Vec<Coord> = Vec::new();
    for v in vertices {
        current.push(v.coord);
        if v.is_node && current.len() > 1 {
            let piece = std::mem::replace(&mut current, vec![v.coord]);
            pieces.push(LineString::new(piece));
        }
    }
    pieces
}
