//! MeshError: Unified error type for hier-mesh public APIs
//!
//! Every fallible query or mutation in the crate reports through this type.
//! Variants fall into two families that callers can tell apart:
//! contract violations (bad codimension, stale indices, unsupported refinement
//! depth, ...) and operations that are not available in this implementation
//! ([`MeshError::NotImplemented`]).

use crate::topology::cell_type::CellType;
use thiserror::Error;

/// Unified error type for hier-mesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Attempted to construct a [`GlobalId`](crate::topology::id::GlobalId) with a zero value.
    #[error("GlobalId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidGlobalId,
    /// A handle does not refer to a record of the mesh it was used with.
    #[error("invalid {kind} handle {index}")]
    InvalidHandle { kind: &'static str, index: usize },
    /// Codimension outside `0..=2` for the entity being queried.
    #[error("codimension {codim} is not valid for a {entity} (allowed: {min}..={max})")]
    InvalidCodimension {
        entity: &'static str,
        codim: usize,
        min: usize,
        max: usize,
    },
    /// Local sub-entity number out of range for the requested codimension.
    #[error("sub-entity {index} of codimension {codim} out of range (count {count})")]
    SubEntityOutOfRange {
        codim: usize,
        index: usize,
        count: usize,
    },
    /// Inter-level query on a level-0 entity.
    #[error("element {0} has no parent")]
    NoParent(usize),
    /// Requested refinement level does not exist.
    #[error("level {level} out of range (max level {max_level})")]
    LevelOutOfRange { level: usize, max_level: usize },
    /// Operation requires a leaf element.
    #[error("element {0} is not a leaf")]
    NotLeaf(usize),
    /// The entity has no index in the queried view (other level, or a
    /// bisected edge in the leaf view).
    #[error("{kind} {index} is not contained in this index set")]
    NotInIndexSet { kind: &'static str, index: usize },
    /// Index queries after a structural change and before `update_indices`.
    #[error("indices are stale: call `update_indices` after refinement")]
    StaleIndices,
    /// Leaf numbering only supports edges refined at most one level below themselves.
    #[error("edge {edge} on level {level} is refined more than one level deep; leaf numbering unsupported")]
    DeepEdgeRefinement { edge: usize, level: usize },
    /// Element shape not handled by this mesh.
    #[error("unsupported cell type: {0:?}")]
    UnsupportedCellType(CellType),
    /// Wrong number of corners for the given shape.
    #[error("{cell_type:?} expects {expected} corners, got {found}")]
    CornerCountMismatch {
        cell_type: CellType,
        expected: usize,
        found: usize,
    },
    /// Corner index does not reference an inserted vertex.
    #[error("corner index {index} out of range ({vertex_count} vertices inserted)")]
    InvalidCornerIndex { index: usize, vertex_count: usize },
    /// Element references the same vertex twice.
    #[error("element references vertex {0} more than once")]
    DuplicateCorner(usize),
    /// Degenerate or otherwise unusable geometry.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// The builder already handed out its mesh.
    #[error("builder has already been finalized")]
    BuilderFinalized,
    /// An element does not list an edge it is recorded as incident to, or vice versa.
    #[error("topology error: element {element} and edge {edge} are not linked both ways")]
    BrokenIncidence { element: usize, edge: usize },
    /// An edge's endpoints do not match the corners required by the reference numbering.
    #[error("topology error: edge slot {slot} of element {element} does not match its corners")]
    EdgeCornerMismatch { element: usize, slot: usize },
    /// An edge without any incident element.
    #[error("topology error: edge {0} has no incident element")]
    OrphanEdge(usize),
    /// Parent and child links disagree.
    #[error("topology error: {kind} {child} and its parent {parent} are not linked both ways")]
    BrokenHierarchy {
        kind: &'static str,
        child: usize,
        parent: usize,
    },
    /// An entity is stored in a level list that does not match its level.
    #[error("topology error: {kind} {index} is stored on level {stored} but reports level {found}")]
    LevelMismatch {
        kind: &'static str,
        index: usize,
        stored: usize,
        found: usize,
    },
    /// Two entities of the same kind carry the same permanent id.
    #[error("topology error: permanent id {id} is used by more than one {kind}")]
    DuplicateId { kind: &'static str, id: u64 },
    /// More than two elements share an edge where validation forbids it.
    #[error("topology error: edge {edge} has {count} incident elements")]
    NonManifoldEdge { edge: usize, count: usize },
    /// An arena already holds `u32::MAX + 1` records of this kind.
    #[error("too many {kind} records for a 32-bit handle")]
    ArenaOverflow { kind: &'static str },
    /// Functionality that this mesh does not provide.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl MeshError {
    /// `true` for operations the mesh does not provide, as opposed to misuse.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, MeshError::NotImplemented(_))
    }

    /// `true` for caller contract violations.
    pub fn is_precondition_violation(&self) -> bool {
        !self.is_not_implemented()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_implemented_is_distinguishable() {
        let e = MeshError::NotImplemented("overlap_size");
        assert!(e.is_not_implemented());
        assert!(!e.is_precondition_violation());

        let e = MeshError::StaleIndices;
        assert!(!e.is_not_implemented());
        assert!(e.is_precondition_violation());
    }

    #[test]
    fn display_mentions_context() {
        let e = MeshError::DeepEdgeRefinement { edge: 4, level: 0 };
        let msg = e.to_string();
        assert!(msg.contains("edge 4"));
        assert!(msg.contains("level 0"));
    }
}
