//! Handles and permanent identities for mesh entities.
//!
//! Two kinds of identifiers live here:
//! - Arena handles ([`VertexId`], [`EdgeId`], [`ElementId`]): zero-cost `u32`
//!   newtypes indexing the mesh's per-kind record arenas. They are how every
//!   cross link (corner, edge slot, parent, child, incident element) is
//!   stored, so no record ever holds a reference into another one.
//! - [`GlobalId`]: the permanent id handed out once at creation. It wraps a
//!   `NonZeroU64` so 0 stays reserved as an invalid/sentinel value, and it is
//!   the only identity callers should persist across refinement.

use crate::mesh_error::MeshError;
use std::{fmt, num::NonZeroU64};

/// Permanent identity of a mesh entity.
///
/// # Memory layout
/// `repr(transparent)` over `NonZeroU64`, so `Option<GlobalId>` is the size
/// of a `u64`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct GlobalId(NonZeroU64);

impl GlobalId {
    /// Creates a new `GlobalId` from a raw `u64` value.
    ///
    /// Returns [`MeshError::InvalidGlobalId`] if `raw == 0`.
    ///
    /// ```rust
    /// # use hier_mesh::topology::id::GlobalId;
    /// let id = GlobalId::new(1).unwrap();
    /// assert_eq!(id.get(), 1);
    /// ```
    #[inline]
    pub fn new(raw: u64) -> Result<Self, MeshError> {
        NonZeroU64::new(raw)
            .map(GlobalId)
            .ok_or(MeshError::InvalidGlobalId)
    }

    /// Returns the inner `u64` value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GlobalId").field(&self.get()).finish()
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Monotone per-kind id source. Ids start at 1 and are never handed out twice.
#[derive(Clone, Debug)]
pub(crate) struct IdCounter(NonZeroU64);

impl Default for IdCounter {
    fn default() -> Self {
        IdCounter(NonZeroU64::MIN)
    }
}

impl IdCounter {
    pub(crate) fn next(&mut self) -> GlobalId {
        let id = GlobalId(self.0);
        self.0 = self.0.saturating_add(1);
        id
    }
}

macro_rules! arena_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Human-readable entity kind, used in error messages.
            pub const KIND: &'static str = $kind;

            /// Wraps a raw arena position. Meshes reject handles they did not hand out.
            ///
            /// Meant for positions of records already stored; the arenas never
            /// grow past `u32::MAX` records (see [`Self::try_from_index`]).
            #[inline]
            pub fn from_index(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "arena overflow");
                $name(index as u32)
            }

            /// Handle for the next arena slot, or [`MeshError::ArenaOverflow`]
            /// once the arena is full.
            #[inline]
            pub fn try_from_index(index: usize) -> Result<Self, MeshError> {
                u32::try_from(index)
                    .map($name)
                    .map_err(|_| MeshError::ArenaOverflow { kind: $kind })
            }

            /// Position of the record in its arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.0).finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_handle!(
    /// Handle of a vertex record.
    VertexId,
    "vertex"
);
arena_handle!(
    /// Handle of an edge record.
    EdgeId,
    "edge"
);
arena_handle!(
    /// Handle of a triangle element record.
    ElementId,
    "element"
);

/// Handle of an entity of any codimension.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityHandle {
    /// Codimension 0.
    Element(ElementId),
    /// Codimension 1.
    Edge(EdgeId),
    /// Codimension 2.
    Vertex(VertexId),
}

impl EntityHandle {
    /// Codimension of the referenced entity.
    pub fn codim(self) -> usize {
        match self {
            EntityHandle::Element(_) => 0,
            EntityHandle::Edge(_) => 1,
            EntityHandle::Vertex(_) => 2,
        }
    }

    /// Kind name used in error messages.
    pub fn kind(self) -> &'static str {
        match self {
            EntityHandle::Element(_) => ElementId::KIND,
            EntityHandle::Edge(_) => EdgeId::KIND,
            EntityHandle::Vertex(_) => VertexId::KIND,
        }
    }

    /// Arena position of the referenced record.
    pub fn index(self) -> usize {
        match self {
            EntityHandle::Element(e) => e.index(),
            EntityHandle::Edge(e) => e.index(),
            EntityHandle::Vertex(v) => v.index(),
        }
    }
}

impl From<ElementId> for EntityHandle {
    fn from(e: ElementId) -> Self {
        EntityHandle::Element(e)
    }
}

impl From<EdgeId> for EntityHandle {
    fn from(e: EdgeId) -> Self {
        EntityHandle::Edge(e)
    }
}

impl From<VertexId> for EntityHandle {
    fn from(v: VertexId) -> Self {
        EntityHandle::Vertex(v)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zero_is_rejected() {
        assert_eq!(GlobalId::new(0), Err(MeshError::InvalidGlobalId));
    }

    #[test]
    fn debug_and_display() {
        let id = GlobalId::new(7).unwrap();
        assert_eq!(format!("{:?}", id), "GlobalId(7)");
        assert_eq!(format!("{}", id), "7");
        let e = ElementId::from_index(3);
        assert_eq!(format!("{:?}", e), "ElementId(3)");
        assert_eq!(format!("{}", e), "3");
    }

    #[test]
    fn counter_is_monotone_and_starts_at_one() {
        let mut counter = IdCounter::default();
        let a = counter.next();
        let b = counter.next();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert!(a < b);
    }

    #[test]
    fn handle_index_roundtrip() {
        assert_eq!(EdgeId::from_index(42).index(), 42);
        assert_eq!(VertexId::KIND, "vertex");
    }

    #[test]
    fn handles_stop_at_u32_range() {
        let last = u32::MAX as usize;
        assert_eq!(ElementId::try_from_index(last).unwrap().index(), last);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            VertexId::try_from_index(last + 1),
            Err(MeshError::ArenaOverflow { kind: "vertex" })
        );
    }

    #[test]
    fn entity_handle_codims() {
        let h: EntityHandle = ElementId::from_index(1).into();
        assert_eq!(h.codim(), 0);
        assert_eq!(EntityHandle::from(EdgeId::from_index(2)).codim(), 1);
        let v = EntityHandle::from(VertexId::from_index(9));
        assert_eq!((v.codim(), v.kind(), v.index()), (2, "vertex", 9));
    }
}
