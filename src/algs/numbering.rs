//! Level and leaf index assignment.
//!
//! Level indices number the entities of one level densely, in the order of
//! that level's entity lists. Leaf indices number the leaf view densely:
//! - elements and edges without children get a fresh index,
//! - a vertex with a finer copy shares the leaf index of that copy,
//! - an edge whose halves are both leaves gets no leaf index.
//!
//! All kinds are visited from the finest level to the coarsest, so a finer
//! vertex copy always has its index before its coarser copies are reached.

use crate::mesh_error::MeshError;
use crate::topology::mesh::Mesh;

/// Assign dense level indices to every entity on `level`.
pub fn compute_level_indices(mesh: &mut Mesh, level: usize) -> Result<[usize; 3], MeshError> {
    let lists = mesh.level(level)?.clone();

    for (i, v) in lists.vertices.iter().enumerate() {
        mesh.vertices[v.index()].numbering.level_index = Some(i);
    }
    for (i, e) in lists.edges.iter().enumerate() {
        mesh.edges[e.index()].numbering.level_index = Some(i);
    }
    for (i, e) in lists.elements.iter().enumerate() {
        mesh.elements[e.index()].numbering.level_index = Some(i);
    }

    Ok([
        lists.elements.len(),
        lists.edges.len(),
        lists.vertices.len(),
    ])
}

/// Assign leaf indices over the whole hierarchy and return the leaf sizes
/// indexed by codimension.
///
/// Fails with [`MeshError::DeepEdgeRefinement`] if some edge was bisected
/// and one of its halves bisected again.
pub fn compute_leaf_indices(mesh: &mut Mesh) -> Result<[usize; 3], MeshError> {
    let mut next_element = 0;
    let mut next_edge = 0;
    let mut next_vertex = 0;

    for level in (0..mesh.levels.len()).rev() {
        for i in 0..mesh.levels[level].elements.len() {
            let e = mesh.levels[level].elements[i];
            let rec = &mut mesh.elements[e.index()];
            rec.numbering.leaf_index = if rec.is_leaf() {
                next_element += 1;
                Some(next_element - 1)
            } else {
                None
            };
        }

        for i in 0..mesh.levels[level].edges.len() {
            let e = mesh.levels[level].edges[i];
            let leaf_index = match mesh.edges[e.index()].children {
                None => {
                    next_edge += 1;
                    Some(next_edge - 1)
                }
                Some(halves) => {
                    if halves.iter().any(|h| !mesh.edges[h.index()].is_leaf()) {
                        return Err(MeshError::DeepEdgeRefinement {
                            edge: e.index(),
                            level,
                        });
                    }
                    None
                }
            };
            mesh.edges[e.index()].numbering.leaf_index = leaf_index;
        }

        for i in 0..mesh.levels[level].vertices.len() {
            let v = mesh.levels[level].vertices[i];
            let leaf_index = match mesh.vertices[v.index()].child {
                None => {
                    next_vertex += 1;
                    Some(next_vertex - 1)
                }
                Some(child) => mesh.vertices[child.index()].numbering.leaf_index,
            };
            mesh.vertices[v.index()].numbering.leaf_index = leaf_index;
        }
    }

    Ok([next_element, next_edge, next_vertex])
}

impl Mesh {
    /// Recompute level and leaf indices after a structural change.
    ///
    /// Index views are usable again only if this succeeds; on error the
    /// indices stay stale.
    pub fn update_indices(&mut self) -> Result<(), MeshError> {
        self.indices.fresh = false;
        let mut level_sizes = Vec::with_capacity(self.levels.len());
        for level in 0..self.levels.len() {
            level_sizes.push(compute_level_indices(self, level)?);
        }
        let leaf_sizes = compute_leaf_indices(self)?;
        log::debug!(
            "updated indices: {} levels, leaf sizes {:?}",
            level_sizes.len(),
            leaf_sizes
        );
        self.indices.level_sizes = level_sizes;
        self.indices.leaf_sizes = leaf_sizes;
        self.indices.fresh = true;
        Ok(())
    }
}
