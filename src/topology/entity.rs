//! Entity records stored in the mesh arenas.
//!
//! One concrete record type per codimension: [`Vertex`] (codim 2),
//! [`Edge`] (codim 1) and [`Element`] (codim 0). Records hold only handles
//! into the arenas, never references, so the mesh is the single owner of
//! every entity and parent/child back links form no ownership cycle.

use crate::geometry::{Position, TriangleGeometry};
use crate::topology::id::{EdgeId, ElementId, GlobalId, VertexId};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Refinement request attached to edges and elements.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MarkState {
    /// Leave the entity as it is.
    #[default]
    DoNothing,
    /// Refine the entity on the next `adapt`.
    Refine,
}

/// Parallel partition classification. The mesh is never distributed, so
/// every entity is interior.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum PartitionType {
    #[default]
    Interior,
}

/// Numbering shared by all entity kinds.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Numbering {
    pub(crate) level: usize,
    pub(crate) id: GlobalId,
    pub(crate) level_index: Option<usize>,
    pub(crate) leaf_index: Option<usize>,
}

impl Numbering {
    pub(crate) fn new(level: usize, id: GlobalId) -> Self {
        Self {
            level,
            id,
            level_index: None,
            leaf_index: None,
        }
    }
}

/// A mesh vertex. Each level holds its own copy of a vertex that persists
/// through refinement; copies are chained by `parent`/`child`.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub(crate) position: Position,
    pub(crate) numbering: Numbering,
    pub(crate) parent: Option<VertexId>,
    pub(crate) child: Option<VertexId>,
}

impl Vertex {
    pub(crate) fn new(position: Position, level: usize, id: GlobalId) -> Self {
        Self {
            position,
            numbering: Numbering::new(level, id),
            parent: None,
            child: None,
        }
    }

    /// Position in ambient space.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Refinement level.
    #[inline]
    pub fn level(&self) -> usize {
        self.numbering.level
    }

    /// Permanent id.
    #[inline]
    pub fn id(&self) -> GlobalId {
        self.numbering.id
    }

    /// `true` if no finer copy of this vertex exists.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.child.is_none()
    }

    /// Copy on the next coarser level, if any.
    #[inline]
    pub fn parent(&self) -> Option<VertexId> {
        self.parent
    }

    /// Copy on the next finer level, if any.
    #[inline]
    pub fn child(&self) -> Option<VertexId> {
        self.child
    }
}

/// A mesh edge. Refinement always bisects, so an edge has 0 or 2 children.
#[derive(Clone, Debug)]
pub struct Edge {
    pub(crate) vertices: [VertexId; 2],
    pub(crate) numbering: Numbering,
    /// Incident elements: 1 on the boundary, 2 or more in the interior.
    pub(crate) elements: Vec<ElementId>,
    pub(crate) parent: Option<EdgeId>,
    pub(crate) children: Option<[EdgeId; 2]>,
    pub(crate) mark: MarkState,
    pub(crate) boundary_id: Option<usize>,
}

impl Edge {
    pub(crate) fn new(vertices: [VertexId; 2], level: usize, id: GlobalId) -> Self {
        Self {
            vertices,
            numbering: Numbering::new(level, id),
            elements: Vec::new(),
            parent: None,
            children: None,
            mark: MarkState::DoNothing,
            boundary_id: None,
        }
    }

    /// Endpoint vertices.
    #[inline]
    pub fn vertices(&self) -> [VertexId; 2] {
        self.vertices
    }

    /// Refinement level.
    #[inline]
    pub fn level(&self) -> usize {
        self.numbering.level
    }

    /// Permanent id.
    #[inline]
    pub fn id(&self) -> GlobalId {
        self.numbering.id
    }

    /// Elements sharing this edge.
    #[inline]
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// `true` if exactly one element uses this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.elements.len() == 1
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub fn parent(&self) -> Option<EdgeId> {
        self.parent
    }

    /// The two halves of a bisected edge, ordered from `vertices()[0]` to
    /// `vertices()[1]`.
    #[inline]
    pub fn children(&self) -> Option<[EdgeId; 2]> {
        self.children
    }

    #[inline]
    pub fn mark(&self) -> MarkState {
        self.mark
    }

    /// Boundary segment id, set on boundary edges of the coarse mesh and
    /// inherited by their halves.
    #[inline]
    pub fn boundary_id(&self) -> Option<usize> {
        self.boundary_id
    }

    /// `true` if the edge joins `a` and `b` in either direction.
    #[inline]
    pub(crate) fn joins(&self, a: VertexId, b: VertexId) -> bool {
        (self.vertices[0] == a && self.vertices[1] == b)
            || (self.vertices[0] == b && self.vertices[1] == a)
    }
}

/// A triangle element. Corners and edges follow the reference numbering in
/// [`crate::topology::cell_type`].
#[derive(Debug)]
pub struct Element {
    pub(crate) corners: [VertexId; 3],
    pub(crate) edges: [EdgeId; 3],
    pub(crate) numbering: Numbering,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) mark: MarkState,
    pub(crate) geometry: OnceCell<TriangleGeometry>,
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            corners: self.corners,
            edges: self.edges,
            numbering: self.numbering,
            parent: self.parent,
            children: self.children.clone(),
            mark: self.mark,
            // caches are rebuilt on demand
            geometry: OnceCell::new(),
        }
    }
}

impl Element {
    pub(crate) fn new(
        corners: [VertexId; 3],
        edges: [EdgeId; 3],
        level: usize,
        id: GlobalId,
    ) -> Self {
        Self {
            corners,
            edges,
            numbering: Numbering::new(level, id),
            parent: None,
            children: Vec::new(),
            mark: MarkState::DoNothing,
            geometry: OnceCell::new(),
        }
    }

    /// Corner vertices in reference order.
    #[inline]
    pub fn corners(&self) -> [VertexId; 3] {
        self.corners
    }

    /// Bounding edges in reference order.
    #[inline]
    pub fn edges(&self) -> [EdgeId; 3] {
        self.edges
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.numbering.level
    }

    #[inline]
    pub fn id(&self) -> GlobalId {
        self.numbering.id
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    #[inline]
    pub fn mark(&self) -> MarkState {
        self.mark
    }

    /// Local slot of `edge` in this element, if it bounds it.
    #[inline]
    pub fn edge_slot(&self, edge: EdgeId) -> Option<usize> {
        self.edges.iter().position(|&e| e == edge)
    }
}
