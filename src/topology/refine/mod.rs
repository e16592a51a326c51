//! Red (1→4) refinement of triangle elements.
//!
//! # Expected invariants
//! - Only leaf elements are refined; each refinement creates its four
//!   children on the next level.
//! - Every corner gets a copy on the finer level, created once and shared by
//!   all elements refined around it.
//! - Every edge is bisected at most once. The first element refining next to
//!   an edge creates the midpoint and both halves; later neighbors reuse them.
//! - The halves of a bisected edge, and every edge below them, list the
//!   coarse neighbors that are not yet refined, so the leaf view can reach
//!   them from the finer side. When such a neighbor is refined, its child on
//!   that side takes its place all the way down.
//!
//! Refinement never renumbers anything; call
//! [`Mesh::update_indices`](crate::topology::mesh::Mesh::update_indices)
//! afterwards.

use crate::debug_invariants::DebugInvariants;
use crate::geometry::metrics::midpoint;
use crate::mesh_error::MeshError;
use crate::topology::cache::InvalidateCache;
use crate::topology::cell_type::TRIANGLE_EDGE_CORNERS;
use crate::topology::entity::MarkState;
use crate::topology::id::{EdgeId, ElementId, VertexId};
use crate::topology::mesh::Mesh;

/// Optional settings for refinement.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefineOptions {
    /// When enabled, reject degenerate elements before refining them.
    pub check_geometry: bool,
}

/// Reference 1→4 subdivision of a triangle given its corners and the
/// midpoints of its edges in reference order `(0,1)`, `(0,2)`, `(1,2)`.
///
/// Children keep the parent's orientation; child `i < 3` holds corner `i`
/// at local corner `i`, and child 3 is the inner triangle.
pub fn triangle_subdivision(corners: [VertexId; 3], midpoints: [VertexId; 3]) -> [[VertexId; 3]; 4] {
    let [c0, c1, c2] = corners;
    let [m01, m02, m12] = midpoints;
    [
        [c0, m01, m02],
        [m01, c1, m12],
        [m02, m12, c2],
        [m01, m12, m02],
    ]
}

impl Mesh {
    /// Request refinement of `element` on the next [`adapt`](Mesh::adapt).
    ///
    /// Returns `false` for non-leaf elements, which cannot be marked.
    pub fn mark(&mut self, element: ElementId, mark: MarkState) -> Result<bool, MeshError> {
        let rec = self.element(element)?;
        if !rec.is_leaf() {
            return Ok(false);
        }
        let edges = rec.edges;
        self.elements[element.index()].mark = mark;
        if mark == MarkState::Refine {
            for e in edges {
                self.edges[e.index()].mark = MarkState::Refine;
            }
        }
        Ok(true)
    }

    /// Refine every marked leaf element. Returns `true` if anything changed.
    pub fn adapt(&mut self) -> Result<bool, MeshError> {
        self.adapt_with(RefineOptions::default())
    }

    pub fn adapt_with(&mut self, options: RefineOptions) -> Result<bool, MeshError> {
        let marked: Vec<ElementId> = self
            .leaf_elements()
            .filter(|e| self.elements[e.index()].mark == MarkState::Refine)
            .collect();
        for &e in &marked {
            self.refine_element_with(e, options)?;
        }
        for edge in &mut self.edges {
            edge.mark = MarkState::DoNothing;
        }
        if !marked.is_empty() {
            self.invalidate_cache();
            self.debug_assert_invariants();
        }
        log::debug!("adapt refined {} elements", marked.len());
        Ok(!marked.is_empty())
    }

    /// Refine every leaf element `steps` times.
    pub fn global_refine(&mut self, steps: usize) -> Result<(), MeshError> {
        for _ in 0..steps {
            let leaves: Vec<ElementId> = self.leaf_elements().collect();
            for e in leaves {
                self.refine_element(e)?;
            }
        }
        if steps > 0 {
            self.invalidate_cache();
            self.debug_assert_invariants();
        }
        Ok(())
    }

    pub fn refine_element(&mut self, element: ElementId) -> Result<[ElementId; 4], MeshError> {
        self.refine_element_with(element, RefineOptions::default())
    }

    /// Split the leaf `element` into four children on the next level.
    pub fn refine_element_with(
        &mut self,
        element: ElementId,
        options: RefineOptions,
    ) -> Result<[ElementId; 4], MeshError> {
        let rec = self.element(element)?;
        if !rec.is_leaf() {
            return Err(MeshError::NotLeaf(element.index()));
        }
        let corners = rec.corners;
        let edges = rec.edges;
        let fine = rec.level() + 1;
        if options.check_geometry {
            self.element_geometry(element)?.unit_normal()?;
        }

        let mut sons = corners;
        for son in &mut sons {
            *son = self.vertex_child_or_create(*son)?;
        }

        let mut mids = [sons[0]; 3];
        let mut candidates: Vec<EdgeId> = Vec::with_capacity(9);
        for (slot, &edge) in edges.iter().enumerate() {
            let (mid, halves) = self.bisect_edge(edge, element)?;
            mids[slot] = mid;
            candidates.extend_from_slice(&halves);
        }
        let [m01, m02, m12] = mids;
        for pair in [[m01, m02], [m01, m12], [m02, m12]] {
            candidates.push(self.push_edge(pair, fine)?);
        }

        let mut children = [element; 4];
        for (k, child_corners) in triangle_subdivision(sons, mids).into_iter().enumerate() {
            let mut child_edges = [edges[0]; 3];
            for (slot, &(a, b)) in TRIANGLE_EDGE_CORNERS.iter().enumerate() {
                child_edges[slot] = candidates
                    .iter()
                    .copied()
                    .find(|c| self.edges[c.index()].joins(child_corners[a], child_corners[b]))
                    .ok_or(MeshError::EdgeCornerMismatch {
                        element: element.index(),
                        slot,
                    })?;
            }
            let child = self.push_element(child_corners, child_edges, fine)?;
            self.elements[child.index()].parent = Some(element);
            for e in child_edges {
                self.edges[e.index()].elements.push(child);
                self.hand_over_below(e, element, child);
            }
            children[k] = child;
        }

        let rec = &mut self.elements[element.index()];
        rec.children = children.to_vec();
        rec.mark = MarkState::DoNothing;
        self.indices.fresh = false;
        Ok(children)
    }

    /// Copy of `v` on the next finer level, created on first request.
    fn vertex_child_or_create(&mut self, v: VertexId) -> Result<VertexId, MeshError> {
        let rec = &self.vertices[v.index()];
        if let Some(child) = rec.child {
            return Ok(child);
        }
        let (position, level) = (rec.position, rec.level());
        let child = self.push_vertex(position, level + 1)?;
        self.vertices[child.index()].parent = Some(v);
        self.vertices[v.index()].child = Some(child);
        Ok(child)
    }

    /// Midpoint vertex and halves of `edge`, bisecting it if needed.
    /// `refining` is the element being refined; the caller replaces it by its
    /// children in the halves' incident lists and below.
    fn bisect_edge(&mut self, edge: EdgeId, refining: ElementId) -> Result<(VertexId, [EdgeId; 2]), MeshError> {
        if let Some(halves) = self.edges[edge.index()].children {
            for h in halves {
                self.edges[h.index()].elements.retain(|&e| e != refining);
            }
            let mid = self.edges[halves[0].index()].vertices[1];
            return Ok((mid, halves));
        }

        let rec = &self.edges[edge.index()];
        let [a, b] = rec.vertices;
        let fine = rec.level() + 1;
        let boundary_id = rec.boundary_id;
        let inherited: Vec<ElementId> = rec
            .elements
            .iter()
            .copied()
            .filter(|&e| e != refining)
            .collect();

        let sa = self.vertex_child_or_create(a)?;
        let sb = self.vertex_child_or_create(b)?;
        let position = midpoint(self.vertices[a.index()].position, self.vertices[b.index()].position);
        let mid = self.push_vertex(position, fine)?;

        let halves = [self.push_edge([sa, mid], fine)?, self.push_edge([mid, sb], fine)?];
        for h in halves {
            let half = &mut self.edges[h.index()];
            half.parent = Some(edge);
            half.boundary_id = boundary_id;
            half.elements = inherited.clone();
        }
        let rec = &mut self.edges[edge.index()];
        rec.children = Some(halves);
        rec.mark = MarkState::DoNothing;
        Ok((mid, halves))
    }

    /// Replace `from` by `to` in the incident lists of every edge strictly
    /// below `edge`. `to` bounds `edge` itself.
    fn hand_over_below(&mut self, edge: EdgeId, from: ElementId, to: ElementId) {
        let mut stack: Vec<EdgeId> = self.edges[edge.index()].children.into_iter().flatten().collect();
        while let Some(e) = stack.pop() {
            let rec = &mut self.edges[e.index()];
            for incident in &mut rec.elements {
                if *incident == from {
                    *incident = to;
                }
            }
            stack.extend(rec.children.into_iter().flatten());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivision_covers_each_corner_once() {
        let corners = [0, 1, 2].map(VertexId::from_index);
        let mids = [3, 4, 5].map(VertexId::from_index);
        let kids = triangle_subdivision(corners, mids);
        for (i, c) in corners.iter().enumerate() {
            assert_eq!(kids[i][i], *c);
            assert_eq!(kids.iter().filter(|k| k.contains(c)).count(), 1);
        }
        assert!(kids[3].iter().all(|v| mids.contains(v)));
    }
}
