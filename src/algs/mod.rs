//! Algorithms over a built mesh.

pub mod intersection;
pub mod numbering;

pub use intersection::{Intersection, LeafIntersectionIter, LevelIntersectionIter};
pub use numbering::{compute_leaf_indices, compute_level_indices};
