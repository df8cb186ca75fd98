use geo::Coord;

use super::label::Label;
use super::node::NodeId;
use crate::math::coords_equal;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a split graph.
    pub struct EdgeId;
}

slotmap::new_key_type! {
    /// Unique identifier for one direction of an edge.
    pub struct DirectedEdgeId;
}

/// An immutable run of coordinates between two graph nodes.
#[derive(Debug, Clone)]
pub struct Edge {
    coords: Vec<Coord>,
    label: Label,
    /// Traversal in coordinate order.
    pub(crate) forward: DirectedEdgeId,
    /// Traversal against coordinate order.
    pub(crate) backward: DirectedEdgeId,
}

impl Edge {
    pub(crate) fn new(coords: Vec<Coord>, label: Label) -> Self {
        Self {
            coords,
            label,
            forward: DirectedEdgeId::default(),
            backward: DirectedEdgeId::default(),
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[must_use]
    pub fn label(&self) -> Label {
        self.label
    }

    #[must_use]
    pub fn forward(&self) -> DirectedEdgeId {
        self.forward
    }

    #[must_use]
    pub fn backward(&self) -> DirectedEdgeId {
        self.backward
    }

    /// Returns `true` if the edge starts and ends at the same point.
    #[must_use]
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(&first), Some(&last)) => coords_equal(first, last, tolerance),
            _ => false,
        }
    }
}

/// One traversal direction of an [`Edge`].
///
/// Directed edges come in symmetric pairs: `sym` is the same edge walked
/// the other way, starting at the far node.
#[derive(Debug, Clone, Copy)]
pub struct DirectedEdge {
    pub edge: EdgeId,
    /// `true` when walking in the edge's coordinate order.
    pub forward: bool,
    pub origin: NodeId,
    pub sym: DirectedEdgeId,
}

impl DirectedEdge {
    /// First two distinct points along this direction: the tail at the
    /// origin node and the tip that fixes the outgoing direction.
    #[must_use]
    pub fn first_segment(&self, edge: &Edge) -> Option<(Coord, Coord)> {
        let coords = edge.coords();
        if coords.len() < 2 {
            return None;
        }
        if self.forward {
            Some((coords[0], coords[1]))
        } else {
            let n = coords.len();
            Some((coords[n - 1], coords[n - 2]))
        }
    }
}
