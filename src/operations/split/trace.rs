use geo::{Coord, LineString};
use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::graph::{DirectedEdgeId, EdgeId, SplitGraph};
use crate::kernel::RotationDirection;

/// A closed boundary assembled from graph edges.
///
/// `parts` holds each edge's coordinates as stored in the graph, in ring
/// order; they are stitched together when the polygon is rebuilt.
#[derive(Debug, Clone, Default)]
pub struct Ring {
    pub edges: Vec<EdgeId>,
    pub parts: Vec<Vec<Coord>>,
}

/// Removes hole edges that form a closed ring on their own and returns
/// their rings.
///
/// Such a hole was never touched by the splitter; it is reattached to
/// whichever output polygon covers it.
///
/// # Errors
///
/// Propagates graph errors from edge removal.
pub fn take_untouched_holes(graph: &mut SplitGraph) -> Result<Vec<LineString>> {
    let tolerance = graph.tolerance();
    let ids: Vec<EdgeId> = graph
        .edges()
        .filter(|(_, e)| e.label().is_hole() && e.is_closed(tolerance))
        .map(|(id, _)| id)
        .collect();

    let mut holes = Vec::with_capacity(ids.len());
    for id in ids {
        let coords = graph.edge(id)?.coords().to_vec();
        graph.remove_edge(id)?;
        holes.push(LineString::new(coords));
    }
    Ok(holes)
}

/// Removes splitter edges hanging from a node of degree below two, until
/// none are left.
///
/// Such a spur ends inside the polygon or on a hole it never cuts, so it
/// separates nothing.
///
/// # Errors
///
/// Propagates graph errors from edge removal.
pub fn prune_spurs(graph: &mut SplitGraph) -> Result<usize> {
    let mut removed = 0;
    while let Some(id) = find_spur(graph)? {
        graph.remove_edge(id)?;
        removed += 1;
    }
    if removed > 0 {
        trace!(removed, "pruned splitter spurs");
    }
    Ok(removed)
}

fn find_spur(graph: &SplitGraph) -> Result<Option<EdgeId>> {
    for (id, edge) in graph.edges() {
        if !edge.label().is_interior() {
            continue;
        }
        for de in [edge.forward(), edge.backward()] {
            let origin = graph.directed_edge(de)?.origin;
            if graph.node(origin)?.is_dangling() {
                return Ok(Some(id));
            }
        }
    }
    Ok(None)
}

/// Extracts every ring reachable from a shell edge.
///
/// Each round traces one ring and then prunes the graph before the next
/// shell edge is looked up, so a consumed edge is never seen twice.
///
/// # Errors
///
/// Returns a `TopologyError` if a ring cannot be closed or revisits an edge.
pub fn trace_rings(graph: &mut SplitGraph) -> Result<Vec<Ring>> {
    let mut rings = Vec::new();
    while let Some(start) = next_shell_edge(graph) {
        let ring = trace_ring(graph, start)?;
        prune(graph, &ring)?;
        rings.push(ring);
    }
    Ok(rings)
}

/// Forward end of any remaining shell edge.
fn next_shell_edge(graph: &SplitGraph) -> Option<DirectedEdgeId> {
    graph
        .edges()
        .find(|(_, e)| e.label().is_shell())
        .map(|(_, e)| e.forward())
}

/// Walks from `start` until it comes back, always taking the closest
/// counter-clockwise edge at each node.
///
/// The shell is clockwise, so turning counter-clockwise from the reversed
/// incoming edge keeps the traced face on the right.
fn trace_ring(graph: &SplitGraph, start: DirectedEdgeId) -> Result<Ring> {
    let mut ring = Ring::default();
    let mut current = start;

    loop {
        let de = graph.directed_edge(current)?;
        if ring.edges.contains(&de.edge) {
            return Err(TopologyError::RepeatedEdge.into());
        }
        ring.edges.push(de.edge);
        ring.parts.push(graph.edge(de.edge)?.coords().to_vec());

        current = graph
            .closest_edge(de.sym, RotationDirection::CounterClockwise)?
            .ok_or(TopologyError::OpenRing)?;
        if current == start {
            break;
        }
    }

    trace!(edges = ring.edges.len(), "traced ring");
    Ok(ring)
}

/// Removes what a traced ring consumed.
///
/// Boundary edges bound exactly one face and go at once. A splitter edge
/// survives for the face on its other side unless one of its nodes has
/// dropped below degree two.
fn prune(graph: &mut SplitGraph, ring: &Ring) -> Result<()> {
    let mut interior = Vec::new();
    for &id in &ring.edges {
        if graph.edge(id)?.label().is_interior() {
            interior.push(id);
        } else {
            graph.remove_edge(id)?;
        }
    }

    for id in interior {
        let edge = graph.edge(id)?;
        let ends = [edge.forward(), edge.backward()];
        let mut dangling = false;
        for de in ends {
            let origin = graph.directed_edge(de)?.origin;
            dangling |= graph.node(origin)?.is_dangling();
        }
        if dangling {
            graph.remove_edge(id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo::Polygon;

    use super::*;
    use crate::error::PolysplitError;
    use crate::math::{coords_equal, TOLERANCE};

    fn ls(points: &[(f64, f64)]) -> LineString {
        LineString::from(points.to_vec())
    }

    fn square(min: f64, max: f64) -> LineString {
        ls(&[(min, min), (max, min), (max, max), (min, max), (min, min)])
    }

    fn graph(polygon: &Polygon, line: &LineString) -> SplitGraph {
        SplitGraph::new(polygon, line, TOLERANCE).unwrap()
    }

    /// A closed ring meets every node an even number of times.
    fn endpoints_pair_up(ring: &Ring) -> bool {
        let ends: Vec<Coord> = ring
            .parts
            .iter()
            .flat_map(|part| [part[0], part[part.len() - 1]])
            .collect();
        ends.iter().all(|&p| {
            ends.iter()
                .filter(|&&q| coords_equal(p, q, TOLERANCE))
                .count()
                % 2
                == 0
        })
    }

    #[test]
    fn bisection_traces_two_rings() {
        let polygon = Polygon::new(square(0.0, 4.0), vec![]);
        let mut g = graph(&polygon, &ls(&[(2.0, -1.0), (2.0, 5.0)]));
        let rings = trace_rings(&mut g).unwrap();

        assert_eq!(rings.len(), 2);
        for ring in &rings {
            assert_eq!(ring.edges.len(), 2);
            assert!(endpoints_pair_up(ring));
        }
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn rings_never_repeat_an_edge() {
        let polygon = Polygon::new(square(0.0, 6.0), vec![square(2.0, 4.0)]);
        let mut g = graph(&polygon, &ls(&[(3.0, -1.0), (3.0, 7.0)]));
        let holes = take_untouched_holes(&mut g).unwrap();
        assert!(holes.is_empty());

        let rings = trace_rings(&mut g).unwrap();
        assert_eq!(rings.len(), 2);
        for ring in &rings {
            let mut edges = ring.edges.clone();
            edges.sort();
            edges.dedup();
            assert_eq!(edges.len(), ring.edges.len());
            // Shell part, splitter, hole part, splitter.
            assert_eq!(ring.edges.len(), 4);
            assert!(endpoints_pair_up(ring));
        }
    }

    #[test]
    fn untouched_hole_is_taken_out() {
        let polygon = Polygon::new(square(0.0, 4.0), vec![square(0.5, 1.5)]);
        let mut g = graph(&polygon, &ls(&[(2.0, -1.0), (2.0, 5.0)]));
        let holes = take_untouched_holes(&mut g).unwrap();
        assert_eq!(holes.len(), 1);
        assert!(holes[0].is_closed());
        assert!(g.edges().all(|(_, e)| !e.label().is_hole()));
    }

    #[test]
    fn splitter_shared_by_two_rings_survives_first_prune() {
        let polygon = Polygon::new(square(0.0, 4.0), vec![]);
        let mut g = graph(&polygon, &ls(&[(2.0, -1.0), (2.0, 5.0)]));
        let start = next_shell_edge(&g).unwrap();
        let ring = trace_ring(&g, start).unwrap();
        prune(&mut g, &ring).unwrap();

        assert!(g.has_interior_edges());
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn line_along_the_boundary_yields_one_ring() {
        let polygon = Polygon::new(square(0.0, 4.0), vec![]);
        let mut g = graph(&polygon, &ls(&[(1.0, 0.0), (3.0, 0.0)]));
        let rings = trace_rings(&mut g).unwrap();
        assert_eq!(rings.len(), 1);
    }

    #[test]
    fn bridge_to_uncut_hole_is_a_repeated_edge() {
        // The splitter joins the shell to a hole it only touches, so the walk
        // crosses it on the way in and again on the way out.
        let polygon = Polygon::new(square(0.0, 4.0), vec![square(1.0, 3.0)]);
        let mut g = graph(&polygon, &ls(&[(2.0, -1.0), (2.0, 1.0)]));
        let result = trace_rings(&mut g);
        assert!(matches!(
            result,
            Err(PolysplitError::Topology(TopologyError::RepeatedEdge))
        ));
    }

    #[test]
    fn spur_left_by_untouched_hole_is_pruned() {
        let polygon = Polygon::new(square(0.0, 4.0), vec![square(1.0, 3.0)]);
        let mut g = graph(&polygon, &ls(&[(2.0, -1.0), (2.0, 1.0)]));
        let holes = take_untouched_holes(&mut g).unwrap();
        assert_eq!(holes.len(), 1);

        assert_eq!(prune_spurs(&mut g).unwrap(), 1);
        assert!(!g.has_interior_edges());
        assert_eq!(prune_spurs(&mut g).unwrap(), 0);
    }

    #[test]
    fn prune_spurs_keeps_a_full_cut() {
        let polygon = Polygon::new(square(0.0, 4.0), vec![]);
        let mut g = graph(&polygon, &ls(&[(2.0, -1.0), (2.0, 5.0)]));
        assert_eq!(prune_spurs(&mut g).unwrap(), 0);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn cross_cut_traces_four_rings() {
        let polygon = Polygon::new(square(0.0, 4.0), vec![]);
        let line = ls(&[(2.0, -1.0), (2.0, 5.0), (5.0, 5.0), (5.0, 2.0), (-1.0, 2.0)]);
        let mut g = graph(&polygon, &line);
        let rings = trace_rings(&mut g).unwrap();
        assert_eq!(rings.len(), 4);
    }
}
