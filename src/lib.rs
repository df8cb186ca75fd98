pub mod error;
pub mod graph;
pub mod kernel;
pub mod math;
pub mod operations;

pub use error::{GeometryError, OperationError, PolysplitError, Result, TopologyError};
pub use operations::{split, Split, SplitOptions, SplitTarget};
