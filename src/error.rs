use thiserror::Error;

/// Top-level error type for polysplit.
#[derive(Debug, Error)]
pub enum PolysplitError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised while building rings and polygons.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("ring is not closed")]
    RingNotClosed,

    #[error("expected at least {min} points, got {actual}")]
    TooFewPoints { min: usize, actual: usize },
}

/// Violations of the split graph's invariants.
///
/// These indicate malformed input topology or a bug in ring tracing and are
/// never recovered from.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("edge not found in split graph")]
    EdgeNotFound,

    #[error("directed edge is not a member of the edge star")]
    EdgeEndNotFound,

    #[error("directed edge already present in the edge star")]
    DuplicateEdgeEnd,

    #[error("graph node not found")]
    NodeNotFound,

    #[error("edge star of degree {degree} cannot answer a closest-edge query")]
    DegenerateStar { degree: usize },

    #[error("edge visited twice while tracing a ring")]
    RepeatedEdge,

    #[error("ring tracing reached a node with no continuation")]
    OpenRing,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to the split operation itself.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(&'static str),

    #[error("self repair produced no polygon parts")]
    IrreparablePolygon,
}

/// Convenience type alias for results using [`PolysplitError`].
pub type Result<T> = std::result::Result<T, PolysplitError>;
