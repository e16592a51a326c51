use super::Intersection;
use crate::mesh_error::MeshError;
use crate::topology::id::{EdgeId, ElementId};
use crate::topology::mesh::Mesh;

/// Leaf-view neighbors of a leaf element.
///
/// Each edge slot of the center is replaced by the leaf edges below it. For
/// every leaf edge, every incident element other than the center yields one
/// intersection; a leaf edge with none yields a boundary intersection. A
/// coarse element next to a refined one therefore sees each finer neighbor
/// through a separate, non-conforming intersection.
#[derive(Clone, Debug)]
pub struct LeafIntersectionIter<'m> {
    mesh: &'m Mesh,
    center: ElementId,
    leaf_edges: [Vec<EdgeId>; 3],
    edge_index: usize,
    leaf_edge_pos: usize,
    neighbor_pos: usize,
    yielded_on_leaf_edge: bool,
}

/// Leaf edges below `edge`, ordered along the edge from `vertices()[0]`.
pub(crate) fn leaf_edges_below(mesh: &Mesh, edge: EdgeId) -> Vec<EdgeId> {
    let mut out = Vec::new();
    let mut stack = vec![edge];
    while let Some(e) = stack.pop() {
        match mesh.edges[e.index()].children {
            None => out.push(e),
            Some([first, second]) => {
                stack.push(second);
                stack.push(first);
            }
        }
    }
    out
}

impl<'m> LeafIntersectionIter<'m> {
    pub(crate) fn new(mesh: &'m Mesh, center: ElementId) -> Result<Self, MeshError> {
        let rec = mesh.element(center)?;
        if !rec.is_leaf() {
            return Err(MeshError::NotLeaf(center.index()));
        }
        Ok(Self {
            mesh,
            center,
            leaf_edges: rec.edges.map(|e| leaf_edges_below(mesh, e)),
            edge_index: 0,
            leaf_edge_pos: 0,
            neighbor_pos: 0,
            yielded_on_leaf_edge: false,
        })
    }

    #[inline]
    pub fn center(&self) -> ElementId {
        self.center
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.edge_index >= 3
    }

    fn advance_leaf_edge(&mut self) {
        self.leaf_edge_pos += 1;
        self.neighbor_pos = 0;
        self.yielded_on_leaf_edge = false;
    }
}

impl<'m> Iterator for LeafIntersectionIter<'m> {
    type Item = Intersection<'m>;

    fn next(&mut self) -> Option<Intersection<'m>> {
        let mesh = self.mesh;
        while self.edge_index < 3 {
            let Some(&leaf) = self.leaf_edges[self.edge_index].get(self.leaf_edge_pos) else {
                self.edge_index += 1;
                self.leaf_edge_pos = 0;
                self.neighbor_pos = 0;
                self.yielded_on_leaf_edge = false;
                continue;
            };
            let incident = &mesh.edges[leaf.index()].elements;

            while self.neighbor_pos < incident.len() {
                let candidate = incident[self.neighbor_pos];
                self.neighbor_pos += 1;
                if candidate != self.center {
                    self.yielded_on_leaf_edge = true;
                    return Some(Intersection::new(
                        mesh,
                        self.center,
                        self.edge_index,
                        leaf,
                        Some(candidate),
                    ));
                }
            }

            if !self.yielded_on_leaf_edge {
                self.yielded_on_leaf_edge = true;
                return Some(Intersection::new(mesh, self.center, self.edge_index, leaf, None));
            }
            self.advance_leaf_edge();
        }
        None
    }
}

impl PartialEq for LeafIntersectionIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.mesh, other.mesh)
            && self.center == other.center
            && self.edge_index == other.edge_index
            && self.leaf_edge_pos == other.leaf_edge_pos
            && self.neighbor_pos == other.neighbor_pos
    }
}

impl Mesh {
    /// Intersections of the leaf element `element` in the leaf view.
    pub fn leaf_intersections(
        &self,
        element: ElementId,
    ) -> Result<LeafIntersectionIter<'_>, MeshError> {
        LeafIntersectionIter::new(self, element)
    }
}
