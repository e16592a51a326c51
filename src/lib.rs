#![cfg_attr(docsrs, feature(doc_cfg))]
//! # hier-mesh
//!
//! A hierarchically refinable triangle surface mesh embedded in 3-D space.
//!
//! ## Features
//! - Arena storage of vertices, edges and triangles, addressed by typed handles
//! - Red (1→4) refinement with per-level entity lists and parent/child links
//! - Dense level and leaf indices, and permanent ids stable across refinement
//! - Level and leaf intersection search, including non-conforming neighbors
//!   across refinement levels and edges shared by more than two triangles
//!
//! ## Usage
//! ```rust
//! use hier_mesh::prelude::*;
//!
//! let mut mesh = MeshBuilder::from_raw(
//!     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
//!     &[[0, 1, 2], [1, 3, 2]],
//! )
//! .unwrap();
//! mesh.global_refine(1).unwrap();
//! mesh.update_indices().unwrap();
//! assert_eq!(mesh.leaf_size(0).unwrap(), 8);
//! ```
//!
//! Index queries fail with [`MeshError::StaleIndices`](mesh_error::MeshError)
//! between a refinement and the next [`Mesh::update_indices`](topology::Mesh::update_indices).
//!
//! ## Cargo features
//! - `rayon`: validate elements in parallel.
//! - `strict-invariants`, `check-invariants`: run invariant checks after
//!   every mutation in release builds too.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod mesh_generation;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::intersection::{Intersection, LeafIntersectionIter, LevelIntersectionIter};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{SegmentGeometry, TriangleGeometry};
    pub use crate::mesh_error::MeshError;
    pub use crate::mesh_generation::{BuilderOptions, MeshBuilder, triangle_grid};
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::cell_type::CellType;
    pub use crate::topology::entity::{MarkState, PartitionType};
    pub use crate::topology::id::{EdgeId, ElementId, EntityHandle, GlobalId, VertexId};
    pub use crate::topology::index_set::{IdSet, LeafIndexSet, LevelIndexSet};
    pub use crate::topology::mesh::Mesh;
    pub use crate::topology::refine::RefineOptions;
    pub use crate::topology::validation::{NonManifoldHandling, ValidationOptions};
}
