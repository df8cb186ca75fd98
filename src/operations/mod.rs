pub mod split;

pub use split::{split, split_line, split_polygon, Split, SplitOptions, SplitTarget};
