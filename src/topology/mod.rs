//! Mesh topology: entity records, the arena store, refinement and the index
//! views.
//!
//! Most users build a [`Mesh`] with
//! [`MeshBuilder`](crate::mesh_generation::MeshBuilder) and then work through
//! its query methods and the index sets obtained from it.

pub mod cache;
pub mod cell_type;
pub mod entity;
pub mod hierarchy;
pub mod id;
pub mod index_set;
pub mod mesh;
pub mod refine;
pub mod validation;

pub use cache::InvalidateCache;
pub use cell_type::CellType;
pub use entity::{Edge, Element, MarkState, PartitionType, Vertex};
pub use hierarchy::HierarchicIter;
pub use id::{EdgeId, ElementId, EntityHandle, GlobalId, VertexId};
pub use index_set::{IdSet, LeafIndexSet, LevelIndexSet};
pub use mesh::{LevelEntities, Mesh};
pub use refine::RefineOptions;
