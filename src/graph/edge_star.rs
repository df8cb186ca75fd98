use std::cell::OnceCell;
use std::f64::consts::TAU;

use super::edge::DirectedEdgeId;
use super::node::NodeId;
use super::SplitGraph;
use crate::error::TopologyError;
use crate::kernel::{angle_between, orientation, RotationDirection};

/// The directed edges leaving one graph node.
///
/// Ends are kept in insertion order so queries are deterministic.
#[derive(Debug, Clone, Default)]
pub struct EdgeStar {
    ends: Vec<DirectedEdgeId>,
    /// Cached result of `outgoing_edges`, reset on every change.
    outgoing: OnceCell<Vec<DirectedEdgeId>>,
}

impl EdgeStar {
    /// Creates an empty star.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edge-ends attached to the node.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.ends.len()
    }

    #[must_use]
    pub fn contains(&self, de: DirectedEdgeId) -> bool {
        self.ends.contains(&de)
    }

    /// Attached edge-ends, in insertion order.
    #[must_use]
    pub fn ends(&self) -> &[DirectedEdgeId] {
        &self.ends
    }

    /// Adds an edge-end.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DuplicateEdgeEnd` if `de` is already a member.
    pub fn insert(&mut self, de: DirectedEdgeId) -> Result<(), TopologyError> {
        if self.contains(de) {
            return Err(TopologyError::DuplicateEdgeEnd);
        }
        self.ends.push(de);
        self.outgoing.take();
        Ok(())
    }

    /// Removes an edge-end.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EdgeEndNotFound` if `de` is not a member.
    pub fn remove(&mut self, de: DirectedEdgeId) -> Result<(), TopologyError> {
        let pos = self
            .ends
            .iter()
            .position(|&e| e == de)
            .ok_or(TopologyError::EdgeEndNotFound)?;
        self.ends.remove(pos);
        self.outgoing.take();
        Ok(())
    }

    /// The end of every attached edge that actually leaves `node`.
    ///
    /// An end stored from the far side is replaced by its symmetric partner.
    #[must_use]
    pub fn outgoing_edges(&self, graph: &SplitGraph, node: NodeId) -> &[DirectedEdgeId] {
        self.outgoing.get_or_init(|| {
            self.ends
                .iter()
                .map(|&id| match graph.directed_edge(id) {
                    Ok(de) if de.origin != node => de.sym,
                    _ => id,
                })
                .collect()
        })
    }

    /// Finds the outgoing edge closest to `de` when sweeping around `node`
    /// in `direction`.
    ///
    /// Angles are measured between first-segment direction vectors. When
    /// the turn towards a candidate does not go the requested way, its
    /// angle is taken as `2π - angle`, so every candidate is measured going
    /// around in the same rotational sense. An edge leaving in exactly the
    /// same direction as `de` therefore comes last.
    ///
    /// Returns `None` when no other outgoing edge exists.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DegenerateStar` if the star has fewer than two
    /// ends, or `TopologyError::EdgeEndNotFound` if neither `de` nor its
    /// symmetric partner leaves this node.
    pub fn find_closest_edge_in_direction(
        &self,
        graph: &SplitGraph,
        node: NodeId,
        de: DirectedEdgeId,
        direction: RotationDirection,
    ) -> Result<Option<DirectedEdgeId>, TopologyError> {
        if self.degree() < 2 {
            return Err(TopologyError::DegenerateStar {
                degree: self.degree(),
            });
        }

        let outgoing = self.outgoing_edges(graph, node);
        let start = if outgoing.contains(&de) {
            de
        } else {
            let sym = graph.directed_edge(de)?.sym;
            if !outgoing.contains(&sym) {
                return Err(TopologyError::EdgeEndNotFound);
            }
            sym
        };

        let (tail, tip1) = graph.first_segment(start)?;
        let mut best: Option<(DirectedEdgeId, f64)> = None;
        for &candidate in outgoing {
            if candidate == start {
                continue;
            }
            let (_, tip2) = graph.first_segment(candidate)?;
            let mut angle = angle_between(tip1, tail, tip2);
            if !direction.matches(orientation(tail, tip1, tip2)) {
                angle = TAU - angle;
            }
            if best.map_or(true, |(_, best_angle)| angle < best_angle) {
                best = Some((candidate, angle));
            }
        }

        Ok(best.map(|(id, _)| id))
    }
}
