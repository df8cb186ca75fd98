//! Planar graph of a polygon's boundary and a cutting line.

mod edge;
mod edge_star;
mod label;
mod node;
pub mod normalize;

pub use edge::{DirectedEdge, DirectedEdgeId, Edge, EdgeId};
pub use edge_star::EdgeStar;
pub use label::{Label, Location};
pub use node::{GraphNode, NodeId};

use std::cmp::Ordering;

use geo::{Coord, LineString, Polygon};
use slotmap::SlotMap;
use tracing::debug;

use crate::error::TopologyError;
use crate::kernel::{self, RotationDirection};
use crate::math::coords_equal;

/// Planar subdivision of one polygon by one cutting line.
///
/// Owns every node, edge and directed edge in arenas addressed by typed
/// keys. Built once per polygon split; ring tracing then removes edges as
/// they are consumed.
#[derive(Debug)]
pub struct SplitGraph {
    polygon: Polygon,
    raw_splitter: LineString,
    splitter: Option<LineString>,
    tolerance: f64,
    nodes: SlotMap<NodeId, GraphNode>,
    edges: SlotMap<EdgeId, Edge>,
    directed: SlotMap<DirectedEdgeId, DirectedEdge>,
}

impl SplitGraph {
    /// Builds the graph for `polygon` cut by `splitter`.
    ///
    /// The polygon is oriented (shell clockwise, holes counter-clockwise)
    /// and the splitter normalized. If a usable splitter remains, the shell
    /// and holes cut by it and the part of it inside the polygon become
    /// labelled edges.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if an edge cannot be attached to its nodes.
    pub fn new(
        polygon: &Polygon,
        splitter: &LineString,
        tolerance: f64,
    ) -> Result<Self, TopologyError> {
        let polygon = normalize::orient_polygon(polygon);
        let normalized = normalize::normalize_splitter(&polygon, splitter, tolerance);

        let mut graph = Self {
            polygon,
            raw_splitter: splitter.clone(),
            splitter: None,
            tolerance,
            nodes: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            directed: SlotMap::with_key(),
        };

        if let Some(splitter) = normalized {
            let shell_parts = kernel::difference(
                std::slice::from_ref(graph.polygon.exterior()),
                &splitter,
                tolerance,
            );
            let hole_parts = kernel::difference(graph.polygon.interiors(), &splitter, tolerance);
            let splitter_parts = kernel::intersection(&graph.polygon, &splitter, tolerance);

            for (parts, label) in [
                (shell_parts, Label::SHELL),
                (hole_parts, Label::HOLE),
                (splitter_parts, Label::SPLITTER),
            ] {
                for part in parts.0 {
                    graph.add_edge(part.0, label)?;
                }
            }
            graph.splitter = Some(splitter);
        }

        debug!(
            split = graph.is_split(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built split graph"
        );
        Ok(graph)
    }

    /// `false` when normalization left no usable cutting line.
    #[must_use]
    pub fn is_split(&self) -> bool {
        self.splitter.is_some()
    }

    /// The oriented polygon.
    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// The cutting line as given.
    #[must_use]
    pub fn raw_splitter(&self) -> &LineString {
        &self.raw_splitter
    }

    /// The normalized cutting line, if one survived.
    #[must_use]
    pub fn splitter(&self) -> Option<&LineString> {
        self.splitter.as_ref()
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over the remaining edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter()
    }

    /// Iterates over all nodes, including dangling ones.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes.iter()
    }

    /// Returns `true` if any splitter edge remains.
    #[must_use]
    pub fn has_interior_edges(&self) -> bool {
        self.edges.values().any(|e| e.label().is_interior())
    }

    /// Snapshot of every edge's coordinates and label, sorted by label and
    /// then by coordinates.
    #[must_use]
    pub fn labels(&self) -> Vec<(Vec<Coord>, Label)> {
        let mut labels: Vec<(Vec<Coord>, Label)> = self
            .edges
            .values()
            .map(|e| (e.coords().to_vec(), e.label()))
            .collect();
        labels.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| cmp_coords(&a.0, &b.0)));
        labels
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EdgeNotFound` if the edge has been removed.
    pub fn edge(&self, id: EdgeId) -> Result<&Edge, TopologyError> {
        self.edges.get(id).ok_or(TopologyError::EdgeNotFound)
    }

    /// # Errors
    ///
    /// Returns `TopologyError::EdgeEndNotFound` if the directed edge has been removed.
    pub fn directed_edge(&self, id: DirectedEdgeId) -> Result<&DirectedEdge, TopologyError> {
        self.directed.get(id).ok_or(TopologyError::EdgeEndNotFound)
    }

    /// # Errors
    ///
    /// Returns `TopologyError::NodeNotFound` if no such node exists.
    pub fn node(&self, id: NodeId) -> Result<&GraphNode, TopologyError> {
        self.nodes.get(id).ok_or(TopologyError::NodeNotFound)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut GraphNode, TopologyError> {
        self.nodes.get_mut(id).ok_or(TopologyError::NodeNotFound)
    }

    /// Finds the node at `coord`, within tolerance.
    #[must_use]
    pub fn node_at(&self, coord: Coord) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| coords_equal(node.coord(), coord, self.tolerance))
            .map(|(id, _)| id)
    }

    /// Tail and tip of the first segment of a directed edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the directed edge or its edge is gone, or the
    /// edge has fewer than two points.
    pub fn first_segment(&self, id: DirectedEdgeId) -> Result<(Coord, Coord), TopologyError> {
        let de = self.directed_edge(id)?;
        let edge = self.edge(de.edge)?;
        de.first_segment(edge).ok_or_else(|| {
            TopologyError::InvalidTopology("edge with fewer than two points".into())
        })
    }

    /// Asks the star at `de`'s origin for the closest other outgoing edge
    /// in `direction`.
    ///
    /// # Errors
    ///
    /// See [`EdgeStar::find_closest_edge_in_direction`].
    pub fn closest_edge(
        &self,
        de: DirectedEdgeId,
        direction: RotationDirection,
    ) -> Result<Option<DirectedEdgeId>, TopologyError> {
        let origin = self.directed_edge(de)?.origin;
        self.node(origin)?
            .star()
            .find_closest_edge_in_direction(self, origin, de, direction)
    }

    /// Removes an edge together with both of its directed ends.
    ///
    /// Nodes left dangling are kept; callers decide what to prune.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EdgeNotFound` if the edge is not in the graph.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), TopologyError> {
        let edge = self.edge(id)?;
        let ends = [edge.forward, edge.backward];
        let origins = [
            self.directed_edge(ends[0])?.origin,
            self.directed_edge(ends[1])?.origin,
        ];

        for (origin, de) in origins.into_iter().zip(ends) {
            self.node_mut(origin)?.remove(de)?;
            self.directed.remove(de);
        }
        self.edges.remove(id);
        Ok(())
    }

    fn add_edge(&mut self, coords: Vec<Coord>, label: Label) -> Result<EdgeId, TopologyError> {
        let (Some(&start), Some(&end)) = (coords.first(), coords.last()) else {
            return Err(TopologyError::InvalidTopology("edge without points".into()));
        };
        if coords.len() < 2 {
            return Err(TopologyError::InvalidTopology(
                "edge with fewer than two points".into(),
            ));
        }

        let start_node = self.find_or_create_node(start);
        let end_node = self.find_or_create_node(end);

        let edge_id = self.edges.insert(Edge::new(coords, label));
        let forward = self.directed.insert(DirectedEdge {
            edge: edge_id,
            forward: true,
            origin: start_node,
            sym: DirectedEdgeId::default(),
        });
        let backward = self.directed.insert(DirectedEdge {
            edge: edge_id,
            forward: false,
            origin: end_node,
            sym: forward,
        });
        if let Some(de) = self.directed.get_mut(forward) {
            de.sym = backward;
        }
        if let Some(edge) = self.edges.get_mut(edge_id) {
            edge.forward = forward;
            edge.backward = backward;
        }

        self.node_mut(start_node)?.add(forward)?;
        self.node_mut(end_node)?.add(backward)?;
        Ok(edge_id)
    }

    fn find_or_create_node(&mut self, coord: Coord) -> NodeId {
        match self.node_at(coord) {
            Some(id) => id,
            None => self.nodes.insert(GraphNode::new(coord)),
        }
    }
}

fn cmp_coords(a: &[Coord], b: &[Coord]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(p, q)| p.x.total_cmp(&q.x).then_with(|| p.y.total_cmp(&q.y)))
        .find(|o| o.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn ls(points: &[(f64, f64)]) -> LineString {
        LineString::from(points.to_vec())
    }

    fn square() -> Polygon {
        Polygon::new(
            ls(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![],
        )
    }

    fn square_with_hole() -> Polygon {
        Polygon::new(
            square().exterior().clone(),
            vec![ls(&[(0.5, 0.5), (1.5, 0.5), (1.5, 1.5), (0.5, 1.5), (0.5, 0.5)])],
        )
    }

    fn count(graph: &SplitGraph, label: Label) -> usize {
        graph.edges().filter(|(_, e)| e.label() == label).count()
    }

    #[test]
    fn bisected_square_graph() {
        let graph = SplitGraph::new(&square(), &ls(&[(2.0, -1.0), (2.0, 5.0)]), TOLERANCE).unwrap();
        assert!(graph.is_split());
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(count(&graph, Label::SHELL), 2);
        assert_eq!(count(&graph, Label::SPLITTER), 1);
        for (_, node) in graph.nodes() {
            assert_eq!(node.degree(), 3);
        }
    }

    #[test]
    fn symmetric_ends_point_at_each_other() {
        let graph = SplitGraph::new(&square(), &ls(&[(2.0, -1.0), (2.0, 5.0)]), TOLERANCE).unwrap();
        for (id, edge) in graph.edges() {
            let fwd = graph.directed_edge(edge.forward()).unwrap();
            let bwd = graph.directed_edge(edge.backward()).unwrap();
            assert_eq!(fwd.edge, id);
            assert_eq!(bwd.edge, id);
            assert_eq!(fwd.sym, edge.backward());
            assert_eq!(bwd.sym, edge.forward());
            assert!(fwd.forward && !bwd.forward);
        }
    }

    #[test]
    fn untouched_hole_stays_closed() {
        let graph = SplitGraph::new(
            &square_with_hole(),
            &ls(&[(2.0, -1.0), (2.0, 5.0)]),
            TOLERANCE,
        )
        .unwrap();
        let holes: Vec<_> = graph.edges().filter(|(_, e)| e.label().is_hole()).collect();
        assert_eq!(holes.len(), 1);
        assert!(holes[0].1.is_closed(TOLERANCE));
    }

    #[test]
    fn no_usable_splitter_means_no_edges() {
        let graph = SplitGraph::new(&square(), &ls(&[(1.0, 1.0), (3.0, 3.0)]), TOLERANCE).unwrap();
        assert!(!graph.is_split());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn remove_edge_detaches_both_ends() {
        let mut graph =
            SplitGraph::new(&square(), &ls(&[(2.0, -1.0), (2.0, 5.0)]), TOLERANCE).unwrap();
        let (id, _) = graph.edges().find(|(_, e)| e.label().is_interior()).unwrap();
        graph.remove_edge(id).unwrap();

        assert_eq!(graph.edge_count(), 2);
        for (_, node) in graph.nodes() {
            assert_eq!(node.degree(), 2);
        }
        assert!(matches!(graph.remove_edge(id), Err(TopologyError::EdgeNotFound)));
        assert!(!graph.has_interior_edges());
    }

    #[test]
    fn labelling_is_idempotent() {
        let polygon = square_with_hole();
        let line = ls(&[(-1.0, 1.0), (5.0, 1.2)]);
        let a = SplitGraph::new(&polygon, &line, TOLERANCE).unwrap();
        let b = SplitGraph::new(&polygon, &line, TOLERANCE).unwrap();
        assert!(!a.labels().is_empty());
        assert_eq!(a.labels(), b.labels());
    }

    #[test]
    fn labels_are_sorted() {
        let graph =
            SplitGraph::new(&square_with_hole(), &ls(&[(2.0, -1.0), (2.0, 5.0)]), TOLERANCE)
                .unwrap();
        let labels = graph.labels();
        assert_eq!(labels.len(), graph.edge_count());
        assert!(labels.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(labels
            .windows(2)
            .filter(|w| w[0].1 == w[1].1)
            .all(|w| cmp_coords(&w[0].0, &w[1].0).is_le()));
    }

    #[test]
    fn node_lookup_uses_tolerance() {
        let graph = SplitGraph::new(&square(), &ls(&[(2.0, -1.0), (2.0, 5.0)]), TOLERANCE).unwrap();
        assert!(graph.node_at(Coord { x: 2.0 + 1e-12, y: 4.0 }).is_some());
        assert!(graph.node_at(Coord { x: 3.0, y: 4.0 }).is_none());
    }
}
