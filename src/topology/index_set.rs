//! Read-only index and id views over a [`Mesh`].
//!
//! Views are obtained from [`Mesh::level_index_set`], [`Mesh::leaf_index_set`]
//! and [`Mesh::id_set`]. The index views fail with [`MeshError::StaleIndices`]
//! when the mesh changed since the last [`Mesh::update_indices`].

use crate::mesh_error::MeshError;
use crate::topology::cell_type::{CellType, MAX_CODIM};
use crate::topology::id::{EntityHandle, GlobalId};
use crate::topology::mesh::{Mesh, geom_types_for};

fn codim_error(codim: usize) -> MeshError {
    MeshError::InvalidCodimension {
        entity: "index set",
        codim,
        min: 0,
        max: MAX_CODIM,
    }
}

/// Dense per-level numbering of one refinement level.
#[derive(Clone, Copy, Debug)]
pub struct LevelIndexSet<'m> {
    mesh: &'m Mesh,
    level: usize,
}

impl<'m> LevelIndexSet<'m> {
    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    /// `true` if `entity` lives on this level.
    pub fn contains(&self, entity: EntityHandle) -> bool {
        self.mesh
            .numbering(entity)
            .is_ok_and(|n| n.level == self.level)
    }

    /// Level index of `entity`, in `0..size(codim)`.
    pub fn index(&self, entity: EntityHandle) -> Result<usize, MeshError> {
        let n = self.mesh.numbering(entity)?;
        if n.level != self.level {
            return Err(MeshError::NotInIndexSet {
                kind: entity.kind(),
                index: entity.index(),
            });
        }
        n.level_index.ok_or(MeshError::StaleIndices)
    }

    /// Level index of sub-entity `i` of codimension `codim` of `entity`.
    pub fn sub_index(
        &self,
        entity: EntityHandle,
        i: usize,
        codim: usize,
    ) -> Result<usize, MeshError> {
        self.index(self.mesh.sub_entity(entity, i, codim)?)
    }

    pub fn size(&self, codim: usize) -> Result<usize, MeshError> {
        self.mesh.indices.level_sizes[self.level]
            .get(codim)
            .copied()
            .ok_or_else(|| codim_error(codim))
    }

    pub fn geom_types(&self, codim: usize) -> Result<Vec<CellType>, MeshError> {
        Ok(geom_types_for(codim, self.size(codim)?))
    }
}

/// Dense numbering of the leaf view.
#[derive(Clone, Copy, Debug)]
pub struct LeafIndexSet<'m> {
    mesh: &'m Mesh,
}

impl<'m> LeafIndexSet<'m> {
    /// `true` if `entity` carries a leaf index. Vertices with finer copies
    /// are contained (they share the finest copy's index); bisected edges
    /// are not.
    pub fn contains(&self, entity: EntityHandle) -> bool {
        self.mesh
            .numbering(entity)
            .is_ok_and(|n| n.leaf_index.is_some())
    }

    pub fn index(&self, entity: EntityHandle) -> Result<usize, MeshError> {
        let n = self.mesh.numbering(entity)?;
        n.leaf_index.ok_or(match entity {
            EntityHandle::Element(e) => MeshError::NotLeaf(e.index()),
            _ => MeshError::NotInIndexSet {
                kind: entity.kind(),
                index: entity.index(),
            },
        })
    }

    pub fn sub_index(
        &self,
        entity: EntityHandle,
        i: usize,
        codim: usize,
    ) -> Result<usize, MeshError> {
        self.index(self.mesh.sub_entity(entity, i, codim)?)
    }

    pub fn size(&self, codim: usize) -> Result<usize, MeshError> {
        self.mesh.leaf_size(codim)
    }

    pub fn geom_types(&self, codim: usize) -> Result<Vec<CellType>, MeshError> {
        Ok(geom_types_for(codim, self.size(codim)?))
    }
}

/// Permanent ids. Unlike indices, ids survive refinement, so this view does
/// not require fresh indices.
#[derive(Clone, Copy, Debug)]
pub struct IdSet<'m> {
    mesh: &'m Mesh,
}

impl<'m> IdSet<'m> {
    pub fn id(&self, entity: EntityHandle) -> Result<GlobalId, MeshError> {
        self.mesh.entity_id(entity)
    }

    pub fn sub_id(&self, entity: EntityHandle, i: usize, codim: usize) -> Result<GlobalId, MeshError> {
        self.id(self.mesh.sub_entity(entity, i, codim)?)
    }
}

impl Mesh {
    /// Level numbering of `level`.
    pub fn level_index_set(&self, level: usize) -> Result<LevelIndexSet<'_>, MeshError> {
        self.level(level)?;
        self.require_fresh()?;
        Ok(LevelIndexSet { mesh: self, level })
    }

    pub fn leaf_index_set(&self) -> Result<LeafIndexSet<'_>, MeshError> {
        self.require_fresh()?;
        Ok(LeafIndexSet { mesh: self })
    }

    #[inline]
    pub fn id_set(&self) -> IdSet<'_> {
        IdSet { mesh: self }
    }
}
