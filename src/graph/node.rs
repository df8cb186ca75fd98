use geo::Coord;

use super::edge::DirectedEdgeId;
use super::edge_star::EdgeStar;
use crate::error::TopologyError;

slotmap::new_key_type! {
    /// Unique identifier for a node in a split graph.
    pub struct NodeId;
}

/// A graph vertex: a coordinate and the directed edges leaving it.
#[derive(Debug, Clone)]
pub struct GraphNode {
    coord: Coord,
    star: EdgeStar,
}

impl GraphNode {
    /// Creates a node with an empty edge star.
    #[must_use]
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            star: EdgeStar::new(),
        }
    }

    #[must_use]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    #[must_use]
    pub fn star(&self) -> &EdgeStar {
        &self.star
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.star.degree()
    }

    /// A node with fewer than two edge-ends cannot lie on a ring.
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        self.degree() < 2
    }

    /// Attaches a directed edge leaving this node.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DuplicateEdgeEnd` if it is already attached.
    pub fn add(&mut self, de: DirectedEdgeId) -> Result<(), TopologyError> {
        self.star.insert(de)
    }

    /// Detaches a directed edge.
    ///
    /// The symmetric end stays attached to its own node; `SplitGraph`
    /// removes both ends together.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EdgeEndNotFound` if it is not attached here.
    pub fn remove(&mut self, de: DirectedEdgeId) -> Result<(), TopologyError> {
        self.star.remove(de)
    }
}
