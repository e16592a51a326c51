//! Structural validation of a [`Mesh`].
//!
//! Checks the incidence and hierarchy links that refinement and the builder
//! maintain. Every check reports the first violation as a [`MeshError`].

use crate::mesh_error::MeshError;
use crate::topology::cell_type::TRIANGLE_EDGE_CORNERS;
use crate::topology::id::{EdgeId, ElementId, GlobalId, VertexId};
use crate::topology::mesh::Mesh;
use hashbrown::HashSet;

/// Optional validation toggles.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Check parent/child links of every kind.
    pub check_hierarchy: bool,
    /// Check that permanent ids are distinct per kind.
    pub check_ids: bool,
    /// How to handle edges shared by more than two elements.
    pub non_manifold: NonManifoldHandling,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_hierarchy: true,
            check_ids: true,
            non_manifold: NonManifoldHandling::Warn,
        }
    }
}

impl ValidationOptions {
    /// Enable all checks and reject non-manifold edges.
    pub fn all() -> Self {
        Self {
            non_manifold: NonManifoldHandling::Error,
            ..Self::default()
        }
    }
}

/// Behavior for non-manifold detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonManifoldHandling {
    /// Skip non-manifold detection.
    Ignore,
    /// Log a warning on non-manifold edges.
    Warn,
    /// Return an error on non-manifold edges.
    Error,
}

/// Validate the whole mesh.
pub fn validate_mesh(mesh: &Mesh, options: ValidationOptions) -> Result<(), MeshError> {
    validate_levels(mesh)?;
    validate_elements(mesh)?;
    validate_edges(mesh)?;
    if options.check_hierarchy {
        validate_hierarchy(mesh)?;
    }
    if options.check_ids {
        validate_ids(mesh)?;
    }
    validate_non_manifold(mesh, options.non_manifold)
}

fn validate_levels(mesh: &Mesh) -> Result<(), MeshError> {
    for (level, lists) in mesh.levels.iter().enumerate() {
        let stored = lists
            .vertices
            .iter()
            .map(|v| (VertexId::KIND, v.index(), mesh.vertices[v.index()].level()))
            .chain(
                lists
                    .edges
                    .iter()
                    .map(|e| (EdgeId::KIND, e.index(), mesh.edges[e.index()].level())),
            )
            .chain(
                lists
                    .elements
                    .iter()
                    .map(|e| (ElementId::KIND, e.index(), mesh.elements[e.index()].level())),
            );
        for (kind, index, found) in stored {
            if found != level {
                return Err(MeshError::LevelMismatch {
                    kind,
                    index,
                    stored: level,
                    found,
                });
            }
        }
    }
    Ok(())
}

fn check_element(mesh: &Mesh, e: ElementId) -> Result<(), MeshError> {
    let rec = &mesh.elements[e.index()];
    for (slot, &(a, b)) in TRIANGLE_EDGE_CORNERS.iter().enumerate() {
        let edge = &mesh.edges[rec.edges[slot].index()];
        if !edge.joins(rec.corners[a], rec.corners[b]) || edge.level() != rec.level() {
            return Err(MeshError::EdgeCornerMismatch {
                element: e.index(),
                slot,
            });
        }
        if !edge.elements.contains(&e) {
            return Err(MeshError::BrokenIncidence {
                element: e.index(),
                edge: rec.edges[slot].index(),
            });
        }
    }
    for v in rec.corners {
        let found = mesh.vertices[v.index()].level();
        if found != rec.level() {
            return Err(MeshError::LevelMismatch {
                kind: VertexId::KIND,
                index: v.index(),
                stored: rec.level(),
                found,
            });
        }
    }
    Ok(())
}

#[cfg(not(feature = "rayon"))]
fn validate_elements(mesh: &Mesh) -> Result<(), MeshError> {
    (0..mesh.elements.len())
        .map(ElementId::from_index)
        .try_for_each(|e| check_element(mesh, e))
}

#[cfg(feature = "rayon")]
fn validate_elements(mesh: &Mesh) -> Result<(), MeshError> {
    use rayon::prelude::*;
    (0..mesh.elements.len())
        .into_par_iter()
        .map(ElementId::from_index)
        .try_for_each(|e| check_element(mesh, e))
}

/// Every element in an edge's incident list is bounded by the edge or by
/// one of its ancestors (a coarse neighbor of a bisected edge). Coarse
/// neighbors must still be leaves: once refined, their children take over.
fn validate_edges(mesh: &Mesh) -> Result<(), MeshError> {
    for (e, edge) in mesh.edges() {
        if edge.elements.is_empty() {
            return Err(MeshError::OrphanEdge(e.index()));
        }
        for &element in &edge.elements {
            let linked = element.index() < mesh.elements.len()
                && mesh.slot_of_edge_or_ancestor(element, e).is_some();
            let stale = linked && {
                let rec = &mesh.elements[element.index()];
                rec.edge_slot(e).is_none() && !rec.is_leaf()
            };
            if !linked || stale {
                return Err(MeshError::BrokenIncidence {
                    element: element.index(),
                    edge: e.index(),
                });
            }
        }
    }
    Ok(())
}

fn validate_hierarchy(mesh: &Mesh) -> Result<(), MeshError> {
    for (v, rec) in mesh.vertices() {
        if let Some(child) = rec.child {
            let c = &mesh.vertices[child.index()];
            if c.parent != Some(v) || c.level() != rec.level() + 1 || c.position != rec.position {
                return Err(MeshError::BrokenHierarchy {
                    kind: VertexId::KIND,
                    child: child.index(),
                    parent: v.index(),
                });
            }
        }
    }
    for (e, rec) in mesh.edges() {
        for child in rec.children.into_iter().flatten() {
            let c = &mesh.edges[child.index()];
            if c.parent != Some(e) || c.level() != rec.level() + 1 {
                return Err(MeshError::BrokenHierarchy {
                    kind: EdgeId::KIND,
                    child: child.index(),
                    parent: e.index(),
                });
            }
        }
    }
    for (e, rec) in mesh.elements() {
        if !rec.children.is_empty() && rec.children.len() != 4 {
            return Err(MeshError::BrokenHierarchy {
                kind: ElementId::KIND,
                child: rec.children[0].index(),
                parent: e.index(),
            });
        }
        for &child in &rec.children {
            let c = &mesh.elements[child.index()];
            if c.parent != Some(e) || c.level() != rec.level() + 1 {
                return Err(MeshError::BrokenHierarchy {
                    kind: ElementId::KIND,
                    child: child.index(),
                    parent: e.index(),
                });
            }
        }
    }
    Ok(())
}

fn validate_ids(mesh: &Mesh) -> Result<(), MeshError> {
    fn distinct(kind: &'static str, ids: impl Iterator<Item = GlobalId>) -> Result<(), MeshError> {
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                return Err(MeshError::DuplicateId { kind, id: id.get() });
            }
        }
        Ok(())
    }
    distinct(VertexId::KIND, mesh.vertices().map(|(_, v)| v.id()))?;
    distinct(EdgeId::KIND, mesh.edges().map(|(_, e)| e.id()))?;
    distinct(ElementId::KIND, mesh.elements().map(|(_, e)| e.id()))
}

fn validate_non_manifold(mesh: &Mesh, handling: NonManifoldHandling) -> Result<(), MeshError> {
    if handling == NonManifoldHandling::Ignore {
        return Ok(());
    }
    for (e, edge) in mesh.edges() {
        let count = edge.elements.len();
        if count > 2 {
            match handling {
                NonManifoldHandling::Warn => {
                    log::warn!("non-manifold edge {e:?} has {count} incident elements");
                }
                NonManifoldHandling::Error => {
                    return Err(MeshError::NonManifoldEdge {
                        edge: e.index(),
                        count,
                    });
                }
                NonManifoldHandling::Ignore => {}
            }
        }
    }
    Ok(())
}

impl Mesh {
    /// Validate with default options.
    pub fn validate(&self) -> Result<(), MeshError> {
        validate_mesh(self, ValidationOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_generation::MeshBuilder;

    fn two_triangles() -> Mesh {
        MeshBuilder::from_raw(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
            ],
            &[[0, 1, 2], [1, 3, 2]],
        )
        .unwrap()
    }

    #[test]
    fn refined_meshes_validate() {
        let mut mesh = two_triangles();
        mesh.global_refine(2).unwrap();
        assert_eq!(validate_mesh(&mesh, ValidationOptions::all()), Ok(()));
    }

    #[test]
    fn refined_coarse_neighbor_on_fine_edge_is_rejected() {
        let mut mesh = two_triangles();
        let (a, b) = (ElementId::from_index(0), ElementId::from_index(1));
        mesh.refine_element(a).unwrap();
        let shared = mesh.elements[a.index()].edges[2];
        let [half, _] = mesh.edges[shared.index()].children.unwrap();
        assert!(mesh.edges[half.index()].elements.contains(&b));
        assert_eq!(mesh.validate(), Ok(()));

        // b is refined but the half still lists it next to its child
        mesh.refine_element(b).unwrap();
        assert_eq!(mesh.validate(), Ok(()));
        mesh.edges[half.index()].elements.push(b);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::BrokenIncidence {
                element: b.index(),
                edge: half.index(),
            })
        );
    }
}
