use super::Intersection;
use crate::mesh_error::MeshError;
use crate::topology::id::ElementId;
use crate::topology::mesh::Mesh;

/// Same-level neighbors of a center element.
///
/// For each of the three edge slots, every element on the center's level
/// sharing that edge yields one intersection. A slot without such an element
/// yields one boundary intersection.
#[derive(Clone, Debug)]
pub struct LevelIntersectionIter<'m> {
    mesh: &'m Mesh,
    center: ElementId,
    edge_index: usize,
    neighbor_index: usize,
    yielded_on_edge: bool,
}

impl<'m> LevelIntersectionIter<'m> {
    pub(crate) fn new(mesh: &'m Mesh, center: ElementId) -> Result<Self, MeshError> {
        mesh.element(center)?;
        Ok(Self {
            mesh,
            center,
            edge_index: 0,
            neighbor_index: 0,
            yielded_on_edge: false,
        })
    }

    /// The exhausted position for `center`.
    pub fn end(mesh: &'m Mesh, center: ElementId) -> Self {
        Self {
            mesh,
            center,
            edge_index: 3,
            neighbor_index: 0,
            yielded_on_edge: false,
        }
    }

    #[inline]
    pub fn center(&self) -> ElementId {
        self.center
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.edge_index >= 3
    }
}

impl<'m> Iterator for LevelIntersectionIter<'m> {
    type Item = Intersection<'m>;

    fn next(&mut self) -> Option<Intersection<'m>> {
        let mesh = self.mesh;
        let center = &mesh.elements[self.center.index()];
        while self.edge_index < 3 {
            let edge = center.edges[self.edge_index];
            let incident = &mesh.edges[edge.index()].elements;

            while self.neighbor_index < incident.len() {
                let candidate = incident[self.neighbor_index];
                self.neighbor_index += 1;
                if candidate != self.center
                    && mesh.elements[candidate.index()].level() == center.level()
                {
                    self.yielded_on_edge = true;
                    return Some(Intersection::new(
                        mesh,
                        self.center,
                        self.edge_index,
                        edge,
                        Some(candidate),
                    ));
                }
            }

            if !self.yielded_on_edge {
                self.yielded_on_edge = true;
                return Some(Intersection::new(mesh, self.center, self.edge_index, edge, None));
            }

            self.edge_index += 1;
            self.neighbor_index = 0;
            self.yielded_on_edge = false;
        }
        self.neighbor_index = 0;
        None
    }
}

impl PartialEq for LevelIntersectionIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.mesh, other.mesh)
            && self.center == other.center
            && self.edge_index == other.edge_index
            && self.neighbor_index == other.neighbor_index
    }
}

impl Mesh {
    /// Intersections of `element` with its same-level neighbors.
    pub fn level_intersections(
        &self,
        element: ElementId,
    ) -> Result<LevelIntersectionIter<'_>, MeshError> {
        LevelIntersectionIter::new(self, element)
    }
}
