//! Incremental construction of a level-0 mesh.

use crate::debug_invariants::DebugInvariants;
use crate::geometry::{Position, TriangleGeometry};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::{CellType, TRIANGLE_EDGE_CORNERS};
use crate::topology::id::{EdgeId, VertexId};
use crate::topology::mesh::Mesh;
use hashbrown::HashMap;
use itertools::Itertools;

/// Optional checks performed while inserting elements.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuilderOptions {
    /// Reject triangles with zero area.
    pub check_geometry: bool,
}

/// Builds the coarsest level of a [`Mesh`] from vertices and triangles.
///
/// Vertices receive their permanent ids on insertion; elements and edges
/// receive theirs in [`finalize`](MeshBuilder::finalize), in insertion order.
#[derive(Debug)]
pub struct MeshBuilder {
    mesh: Option<Mesh>,
    vertices: Vec<VertexId>,
    triangles: Vec<[VertexId; 3]>,
    options: BuilderOptions,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::with_options(BuilderOptions::default())
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Self {
            mesh: Some(Mesh::new()),
            vertices: Vec::new(),
            triangles: Vec::new(),
            options,
        }
    }

    /// Build a mesh in one go from corner positions and triangle corner lists.
    pub fn from_raw(positions: &[Position], triangles: &[[usize; 3]]) -> Result<Mesh, MeshError> {
        let mut builder = Self::new();
        for &p in positions {
            builder.insert_vertex(p)?;
        }
        for t in triangles {
            builder.insert_element(CellType::Triangle, t)?;
        }
        builder.finalize().ok_or(MeshError::BuilderFinalized)
    }

    /// Add a vertex; its insertion number is what `insert_element` refers to.
    pub fn insert_vertex(&mut self, position: Position) -> Result<VertexId, MeshError> {
        let mesh = self.mesh.as_mut().ok_or(MeshError::BuilderFinalized)?;
        let v = mesh.push_vertex(position, 0)?;
        self.vertices.push(v);
        Ok(v)
    }

    /// Add an element given the insertion numbers of its corners.
    pub fn insert_element(&mut self, cell_type: CellType, corners: &[usize]) -> Result<(), MeshError> {
        let mesh = self.mesh.as_ref().ok_or(MeshError::BuilderFinalized)?;
        if cell_type != CellType::Triangle {
            return Err(MeshError::UnsupportedCellType(cell_type));
        }
        let expected = cell_type.corner_count();
        if corners.len() != expected {
            return Err(MeshError::CornerCountMismatch {
                cell_type,
                expected,
                found: corners.len(),
            });
        }
        if let Some(&index) = corners.iter().find(|&&i| i >= self.vertices.len()) {
            return Err(MeshError::InvalidCornerIndex {
                index,
                vertex_count: self.vertices.len(),
            });
        }
        if let Some(&dup) = corners.iter().duplicates().next() {
            return Err(MeshError::DuplicateCorner(dup));
        }

        let handles = [
            self.vertices[corners[0]],
            self.vertices[corners[1]],
            self.vertices[corners[2]],
        ];
        if self.options.check_geometry {
            let geo = TriangleGeometry::new(handles.map(|v| mesh.vertices[v.index()].position));
            if geo.unit_normal().is_err() {
                return Err(MeshError::InvalidGeometry(format!(
                    "triangle {corners:?} has zero area"
                )));
            }
        }
        self.triangles.push(handles);
        Ok(())
    }

    /// Wire edges, number everything and hand out the mesh.
    ///
    /// Returns `None` if the mesh was already handed out or could not be wired;
    /// the reason is logged.
    pub fn finalize(&mut self) -> Option<Mesh> {
        let Some(mut mesh) = self.mesh.take() else {
            log::error!("MeshBuilder::finalize called twice");
            return None;
        };

        if let Err(e) = wire_triangles(&mut mesh, &self.triangles) {
            log::error!("edge wiring failed: {e}");
            return None;
        }

        if let Err(e) = mesh.update_indices() {
            log::error!("index computation failed on a fresh mesh: {e}");
            return None;
        }

        let mut next_boundary = 0;
        for edge in &mut mesh.edges {
            if edge.elements.len() == 1 {
                edge.boundary_id = Some(next_boundary);
                next_boundary += 1;
            }
        }

        mesh.debug_assert_invariants();
        log::debug!(
            "built mesh: {} vertices, {} edges, {} elements, {} boundary segments",
            mesh.vertices.len(),
            mesh.edges.len(),
            mesh.elements.len(),
            next_boundary
        );
        Some(mesh)
    }
}

/// Create the level-0 edges shared by `triangles`, then the elements themselves.
fn wire_triangles(mesh: &mut Mesh, triangles: &[[VertexId; 3]]) -> Result<(), MeshError> {
    let mut edge_map: HashMap<(VertexId, VertexId), EdgeId> =
        HashMap::with_capacity(triangles.len() * 3 / 2 + 1);
    for &corners in triangles {
        let mut edges = [EdgeId::from_index(0); 3];
        for (slot, &(i, j)) in TRIANGLE_EDGE_CORNERS.iter().enumerate() {
            let (a, b) = (corners[i], corners[j]);
            let key = if a <= b { (a, b) } else { (b, a) };
            edges[slot] = match edge_map.get(&key) {
                Some(&e) => e,
                None => {
                    let e = mesh.push_edge([a, b], 0)?;
                    edge_map.insert(key, e);
                    e
                }
            };
        }
        let element = mesh.push_element(corners, edges, 0)?;
        for e in edges {
            mesh.edges[e.index()].elements.push(element);
        }
    }
    Ok(())
}
