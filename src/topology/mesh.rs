//! The mesh store: per-kind record arenas plus per-level entity lists.
//!
//! All entities live in three `Vec`s owned by [`Mesh`] and are addressed by
//! [`VertexId`], [`EdgeId`] and [`ElementId`]. Level `l` additionally keeps
//! the handles of the entities created on that level, in creation order; the
//! order of those lists is what level indices are assigned from.

use crate::geometry::{LocalTriangleGeometry, Position, SegmentGeometry, TriangleGeometry};
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::cell_type::{CellType, MAX_CODIM};
use crate::topology::entity::{Edge, Element, Numbering, PartitionType, Vertex};
use crate::topology::id::{EdgeId, ElementId, EntityHandle, GlobalId, IdCounter, VertexId};

/// Handles of the entities created on one refinement level.
#[derive(Clone, Debug, Default)]
pub struct LevelEntities {
    pub(crate) vertices: Vec<VertexId>,
    pub(crate) edges: Vec<EdgeId>,
    pub(crate) elements: Vec<ElementId>,
}

impl LevelEntities {
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    #[inline]
    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Number of entities of codimension `codim` on this level.
    pub fn count(&self, codim: usize) -> Option<usize> {
        match codim {
            0 => Some(self.elements.len()),
            1 => Some(self.edges.len()),
            2 => Some(self.vertices.len()),
            _ => None,
        }
    }
}

/// Sizes recorded by the last index update.
#[derive(Clone, Debug, Default)]
pub(crate) struct IndexState {
    pub(crate) fresh: bool,
    /// `level_sizes[l][codim]`
    pub(crate) level_sizes: Vec<[usize; 3]>,
    /// `leaf_sizes[codim]`
    pub(crate) leaf_sizes: [usize; 3],
}

/// Hierarchically refinable triangle surface mesh.
///
/// Build one with [`MeshBuilder`](crate::mesh_generation::MeshBuilder).
#[derive(Clone, Debug)]
pub struct Mesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) elements: Vec<Element>,
    pub(crate) levels: Vec<LevelEntities>,
    pub(crate) vertex_ids: IdCounter,
    pub(crate) edge_ids: IdCounter,
    pub(crate) element_ids: IdCounter,
    pub(crate) indices: IndexState,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// An empty mesh with a single, empty level 0.
    pub(crate) fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            elements: Vec::new(),
            levels: vec![LevelEntities::default()],
            vertex_ids: IdCounter::default(),
            edge_ids: IdCounter::default(),
            element_ids: IdCounter::default(),
            indices: IndexState::default(),
        }
    }

    // --- arena growth -----------------------------------------------------

    pub(crate) fn ensure_level(&mut self, level: usize) {
        while self.levels.len() <= level {
            self.levels.push(LevelEntities::default());
        }
    }

    pub(crate) fn push_vertex(&mut self, position: Position, level: usize) -> Result<VertexId, MeshError> {
        let handle = VertexId::try_from_index(self.vertices.len())?;
        self.ensure_level(level);
        let id = self.vertex_ids.next();
        self.vertices.push(Vertex::new(position, level, id));
        self.levels[level].vertices.push(handle);
        self.indices.fresh = false;
        Ok(handle)
    }

    pub(crate) fn push_edge(&mut self, vertices: [VertexId; 2], level: usize) -> Result<EdgeId, MeshError> {
        let handle = EdgeId::try_from_index(self.edges.len())?;
        self.ensure_level(level);
        let id = self.edge_ids.next();
        self.edges.push(Edge::new(vertices, level, id));
        self.levels[level].edges.push(handle);
        self.indices.fresh = false;
        Ok(handle)
    }

    pub(crate) fn push_element(
        &mut self,
        corners: [VertexId; 3],
        edges: [EdgeId; 3],
        level: usize,
    ) -> Result<ElementId, MeshError> {
        let handle = ElementId::try_from_index(self.elements.len())?;
        self.ensure_level(level);
        let id = self.element_ids.next();
        self.elements.push(Element::new(corners, edges, level, id));
        self.levels[level].elements.push(handle);
        self.indices.fresh = false;
        Ok(handle)
    }

    // --- record access ----------------------------------------------------

    pub fn vertex(&self, v: VertexId) -> Result<&Vertex, MeshError> {
        self.vertices.get(v.index()).ok_or(MeshError::InvalidHandle {
            kind: VertexId::KIND,
            index: v.index(),
        })
    }

    pub fn edge(&self, e: EdgeId) -> Result<&Edge, MeshError> {
        self.edges.get(e.index()).ok_or(MeshError::InvalidHandle {
            kind: EdgeId::KIND,
            index: e.index(),
        })
    }

    pub fn element(&self, e: ElementId) -> Result<&Element, MeshError> {
        self.elements.get(e.index()).ok_or(MeshError::InvalidHandle {
            kind: ElementId::KIND,
            index: e.index(),
        })
    }

    pub(crate) fn check_handle(&self, entity: EntityHandle) -> Result<(), MeshError> {
        let len = match entity {
            EntityHandle::Element(_) => self.elements.len(),
            EntityHandle::Edge(_) => self.edges.len(),
            EntityHandle::Vertex(_) => self.vertices.len(),
        };
        if entity.index() < len {
            Ok(())
        } else {
            Err(MeshError::InvalidHandle {
                kind: entity.kind(),
                index: entity.index(),
            })
        }
    }

    pub(crate) fn numbering(&self, entity: EntityHandle) -> Result<&Numbering, MeshError> {
        Ok(match entity {
            EntityHandle::Element(e) => &self.element(e)?.numbering,
            EntityHandle::Edge(e) => &self.edge(e)?.numbering,
            EntityHandle::Vertex(v) => &self.vertex(v)?.numbering,
        })
    }

    /// Iterate over all vertex records of every level.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::from_index(i), v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::from_index(i), e))
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId::from_index(i), e))
    }

    /// Elements without children, coarse levels first.
    pub fn leaf_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.levels
            .iter()
            .flat_map(|l| l.elements.iter().copied())
            .filter(move |e| self.elements[e.index()].is_leaf())
    }

    // --- levels and sizes -------------------------------------------------

    /// Finest level present.
    #[inline]
    pub fn max_level(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn level(&self, level: usize) -> Result<&LevelEntities, MeshError> {
        self.levels.get(level).ok_or(MeshError::LevelOutOfRange {
            level,
            max_level: self.max_level(),
        })
    }

    /// Number of entities of codimension `codim` on `level`.
    pub fn size(&self, level: usize, codim: usize) -> Result<usize, MeshError> {
        self.level(level)?
            .count(codim)
            .ok_or(MeshError::InvalidCodimension {
                entity: "level",
                codim,
                min: 0,
                max: MAX_CODIM,
            })
    }

    /// Number of leaf entities of codimension `codim`.
    ///
    /// Requires fresh indices: leaf vertices and edges are only counted by
    /// [`update_indices`](Mesh::update_indices).
    pub fn leaf_size(&self, codim: usize) -> Result<usize, MeshError> {
        self.require_fresh()?;
        self.indices
            .leaf_sizes
            .get(codim)
            .copied()
            .ok_or(MeshError::InvalidCodimension {
                entity: "leaf view",
                codim,
                min: 0,
                max: MAX_CODIM,
            })
    }

    /// Geometry types present at `codim` on `level`: empty if the level has
    /// no entity of that codimension.
    pub fn geom_types(&self, level: usize, codim: usize) -> Result<Vec<CellType>, MeshError> {
        let n = self.size(level, codim)?;
        Ok(geom_types_for(codim, n))
    }

    /// `true` if the last [`update_indices`](Mesh::update_indices) still
    /// describes the current structure.
    #[inline]
    pub fn indices_fresh(&self) -> bool {
        self.indices.fresh
    }

    pub(crate) fn require_fresh(&self) -> Result<(), MeshError> {
        if self.indices.fresh {
            Ok(())
        } else {
            Err(MeshError::StaleIndices)
        }
    }

    /// Overlap partition size. The mesh is never distributed.
    pub fn overlap_size(&self, _codim: usize) -> Result<usize, MeshError> {
        Err(MeshError::NotImplemented("overlap_size"))
    }

    /// Ghost partition size. The mesh is never distributed.
    pub fn ghost_size(&self, _codim: usize) -> Result<usize, MeshError> {
        Err(MeshError::NotImplemented("ghost_size"))
    }

    /// Data exchange between processes.
    pub fn communicate(&self) -> Result<(), MeshError> {
        Err(MeshError::NotImplemented("communicate"))
    }

    // --- entity queries ---------------------------------------------------

    /// Refinement level of any entity.
    pub fn entity_level(&self, entity: EntityHandle) -> Result<usize, MeshError> {
        Ok(self.numbering(entity)?.level)
    }

    /// Permanent id of any entity.
    pub fn entity_id(&self, entity: EntityHandle) -> Result<GlobalId, MeshError> {
        Ok(self.numbering(entity)?.id)
    }

    pub fn partition_type(&self, entity: EntityHandle) -> Result<PartitionType, MeshError> {
        self.check_handle(entity)?;
        Ok(PartitionType::Interior)
    }

    /// Number of sub-entities of codimension `codim` contained in `entity`.
    pub fn sub_entity_count(&self, entity: EntityHandle, codim: usize) -> Result<usize, MeshError> {
        self.check_handle(entity)?;
        let shape = CellType::for_codim(entity.codim()).ok_or(MeshError::InvalidCodimension {
            entity: entity.kind(),
            codim: entity.codim(),
            min: 0,
            max: MAX_CODIM,
        })?;
        shape
            .sub_entity_count(codim)
            .ok_or(MeshError::InvalidCodimension {
                entity: entity.kind(),
                codim,
                min: entity.codim(),
                max: MAX_CODIM,
            })
    }

    /// Sub-entity `i` of codimension `codim` of `entity`, in reference numbering.
    ///
    /// `codim` equal to the entity's own codimension returns the entity itself.
    pub fn sub_entity(
        &self,
        entity: EntityHandle,
        i: usize,
        codim: usize,
    ) -> Result<EntityHandle, MeshError> {
        let count = self.sub_entity_count(entity, codim)?;
        if i >= count {
            return Err(MeshError::SubEntityOutOfRange {
                codim,
                index: i,
                count,
            });
        }
        if codim == entity.codim() {
            return Ok(entity);
        }
        Ok(match entity {
            EntityHandle::Element(e) => {
                let rec = self.element(e)?;
                if codim == 1 {
                    EntityHandle::Edge(rec.edges[i])
                } else {
                    EntityHandle::Vertex(rec.corners[i])
                }
            }
            EntityHandle::Edge(e) => EntityHandle::Vertex(self.edge(e)?.vertices[i]),
            // a vertex only contains itself, handled above
            EntityHandle::Vertex(_) => entity,
        })
    }

    // --- geometry ---------------------------------------------------------

    pub fn position(&self, v: VertexId) -> Result<Position, MeshError> {
        Ok(self.vertex(v)?.position)
    }

    /// Affine map of an element, computed on first use and cached until the
    /// next refinement.
    pub fn element_geometry(&self, e: ElementId) -> Result<&TriangleGeometry, MeshError> {
        let rec = self.element(e)?;
        Ok(rec.geometry.get_or_init(|| {
            TriangleGeometry::new(rec.corners.map(|v| self.vertices[v.index()].position))
        }))
    }

    pub fn edge_geometry(&self, e: EdgeId) -> Result<SegmentGeometry, MeshError> {
        let rec = self.edge(e)?;
        Ok(SegmentGeometry::new(
            rec.vertices.map(|v| self.vertices[v.index()].position),
        ))
    }

    /// Position of `e` inside the reference frame of its parent.
    pub fn geometry_in_parent(&self, e: ElementId) -> Result<LocalTriangleGeometry, MeshError> {
        let rec = self.element(e)?;
        let parent = rec.parent.ok_or(MeshError::NoParent(e.index()))?;
        let parent_geo = self.element_geometry(parent)?;
        let mut local = [[0.0; 2]; 3];
        for (slot, v) in rec.corners.iter().enumerate() {
            local[slot] = parent_geo.local(self.vertices[v.index()].position)?;
        }
        Ok(LocalTriangleGeometry::new(local))
    }

    // --- incidence helpers ------------------------------------------------

    /// Local slot of `edge` in `element`, or of the nearest ancestor of
    /// `edge` that `element` is bounded by.
    pub(crate) fn slot_of_edge_or_ancestor(&self, element: ElementId, edge: EdgeId) -> Option<usize> {
        let rec = &self.elements[element.index()];
        let mut cur = Some(edge);
        while let Some(e) = cur {
            if let Some(slot) = rec.edge_slot(e) {
                return Some(slot);
            }
            cur = self.edges[e.index()].parent;
        }
        None
    }
}

pub(crate) fn geom_types_for(codim: usize, count: usize) -> Vec<CellType> {
    match CellType::for_codim(codim) {
        Some(ct) if count > 0 => vec![ct],
        _ => Vec::new(),
    }
}

impl InvalidateCache for Mesh {
    fn invalidate_cache(&mut self) {
        for element in &mut self.elements {
            element.geometry.take();
        }
        self.indices.fresh = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::cell_type::TRIANGLE_EDGE_CORNERS;

    fn single_triangle() -> (Mesh, ElementId) {
        let mut mesh = Mesh::new();
        let v = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]].map(|p| mesh.push_vertex(p, 0).unwrap());
        let e = TRIANGLE_EDGE_CORNERS.map(|(a, b)| mesh.push_edge([v[a], v[b]], 0).unwrap());
        let t = mesh.push_element(v, e, 0).unwrap();
        for edge in e {
            mesh.edges[edge.index()].elements.push(t);
        }
        (mesh, t)
    }

    #[test]
    fn push_assigns_sequential_ids() {
        let (mesh, t) = single_triangle();
        assert_eq!(mesh.element(t).unwrap().id().get(), 1);
        let ids: Vec<u64> = mesh.vertices().map(|(_, v)| v.id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(mesh.size(0, 0).unwrap(), 1);
        assert_eq!(mesh.size(0, 1).unwrap(), 3);
        assert_eq!(mesh.size(0, 2).unwrap(), 3);
        assert!(!mesh.indices_fresh());
    }

    #[test]
    fn invalid_handles_and_codims() {
        let (mesh, _) = single_triangle();
        assert!(matches!(
            mesh.element(ElementId::from_index(9)),
            Err(MeshError::InvalidHandle { kind: "element", index: 9 })
        ));
        assert!(matches!(
            mesh.size(0, 3),
            Err(MeshError::InvalidCodimension { codim: 3, .. })
        ));
        assert!(matches!(
            mesh.size(1, 0),
            Err(MeshError::LevelOutOfRange { level: 1, max_level: 0 })
        ));
        assert_eq!(mesh.leaf_size(0), Err(MeshError::StaleIndices));
    }

    #[test]
    fn sub_entities_follow_reference_numbering() {
        let (mesh, t) = single_triangle();
        let h = EntityHandle::Element(t);
        assert_eq!(mesh.sub_entity_count(h, 1).unwrap(), 3);
        assert_eq!(mesh.sub_entity(h, 0, 0).unwrap(), h);
        let EntityHandle::Edge(e2) = mesh.sub_entity(h, 2, 1).unwrap() else {
            panic!("expected an edge");
        };
        let rec = mesh.element(t).unwrap();
        assert!(mesh.edge(e2).unwrap().joins(rec.corners()[1], rec.corners()[2]));
        assert!(matches!(
            mesh.sub_entity(h, 3, 2),
            Err(MeshError::SubEntityOutOfRange { .. })
        ));
        let edge = EntityHandle::Edge(e2);
        assert!(matches!(
            mesh.sub_entity_count(edge, 0),
            Err(MeshError::InvalidCodimension { .. })
        ));
        assert_eq!(mesh.sub_entity_count(edge, 2).unwrap(), 2);
    }

    #[test]
    fn geometry_is_cached_and_invalidated() {
        let (mut mesh, t) = single_triangle();
        assert!((mesh.element_geometry(t).unwrap().volume() - 0.5).abs() < 1e-12);
        assert!(mesh.elements[t.index()].geometry.get().is_some());
        mesh.invalidate_cache();
        assert!(mesh.elements[t.index()].geometry.get().is_none());
        assert_eq!(mesh.geometry_in_parent(t), Err(MeshError::NoParent(t.index())));
    }

    #[test]
    fn distributed_queries_are_not_implemented() {
        let (mesh, _) = single_triangle();
        assert!(mesh.overlap_size(0).unwrap_err().is_not_implemented());
        assert!(mesh.ghost_size(2).unwrap_err().is_not_implemented());
        assert!(mesh.communicate().unwrap_err().is_not_implemented());
    }
}
