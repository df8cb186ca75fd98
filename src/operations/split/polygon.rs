use geo::orient::{Direction, Orient};
use geo::{LineString, Polygon};
use tracing::debug;

use super::assemble::build_polygons;
use super::trace::{prune_spurs, take_untouched_holes, trace_rings};
use crate::error::Result;
use crate::graph::SplitGraph;
use crate::kernel;

/// Splits one polygon by `cutting_line`.
///
/// Returns `None` when the polygon is left unchanged. A closed line lying
/// wholly inside the polygon drills a hole: the result is the polygon with
/// the hole cut out followed by the hole piece itself.
///
/// # Errors
///
/// Returns an error if the graph cannot be traced into closed rings or an
/// output polygon cannot be repaired.
pub fn split_polygon(
    polygon: &Polygon,
    cutting_line: &LineString,
    tolerance: f64,
) -> Result<Option<Vec<Polygon>>> {
    let mut graph = SplitGraph::new(polygon, cutting_line, tolerance)?;

    if !graph.is_split() {
        return drill_hole(&graph);
    }
    if !reaches_interior(&graph) {
        debug!("cutting line does not reach the polygon interior");
        return Ok(None);
    }

    let holes = take_untouched_holes(&mut graph)?;
    prune_spurs(&mut graph)?;
    if !reaches_interior(&graph) {
        debug!("cutting line separates nothing");
        return Ok(None);
    }

    let rings = trace_rings(&mut graph)?;
    debug!(rings = rings.len(), holes = holes.len(), "traced split rings");
    build_polygons(&rings, holes, tolerance).map(Some)
}

/// Splitter edges lying only on the boundary separate nothing.
fn reaches_interior(graph: &SplitGraph) -> bool {
    graph.edges().any(|(_, edge)| {
        edge.label().is_interior() && kernel::runs_inside(graph.polygon(), edge.coords())
    })
}

fn drill_hole(graph: &SplitGraph) -> Result<Option<Vec<Polygon>>> {
    let polygon = graph.polygon();
    let line = graph.raw_splitter();
    if !kernel::is_closed(line, graph.tolerance()) || !kernel::contains(polygon, line) {
        return Ok(None);
    }

    let ring = kernel::build_ring(&line.0, graph.tolerance())?;
    let hole = kernel::build_polygon(ring, Vec::new());
    let mut pieces = kernel::region_difference(polygon, &hole);
    pieces.extend(kernel::region_intersection(polygon, &hole));
    debug!(pieces = pieces.len(), "drilled hole");
    Ok(Some(
        pieces
            .into_iter()
            .map(|p| p.orient(Direction::Default))
            .collect(),
    ))
}
