//! Construction of level-0 meshes: the incremental [`MeshBuilder`] and
//! structured generators built on top of it.

pub mod builder;
pub mod structured;

pub use builder::{BuilderOptions, MeshBuilder};
pub use structured::triangle_grid;
