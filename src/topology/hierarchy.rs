//! Depth-first traversal of an element's descendants.

use crate::mesh_error::MeshError;
use crate::topology::id::ElementId;
use crate::topology::mesh::Mesh;

/// Iterator over the descendants of an element down to a maximum level.
///
/// Uses an explicit stack; elements come out in stack-pop order, so the last
/// child of each element is visited first. The start element itself is not
/// yielded.
#[derive(Clone, Debug)]
pub struct HierarchicIter<'m> {
    mesh: &'m Mesh,
    max_level: usize,
    stack: Vec<ElementId>,
}

impl<'m> HierarchicIter<'m> {
    pub(crate) fn new(mesh: &'m Mesh, start: ElementId, max_level: usize) -> Result<Self, MeshError> {
        let rec = mesh.element(start)?;
        let mut stack = Vec::new();
        if rec.level() < max_level {
            stack.extend_from_slice(rec.children());
        }
        Ok(Self {
            mesh,
            max_level,
            stack,
        })
    }

    /// Element the iterator will yield next.
    #[inline]
    pub fn current(&self) -> Option<ElementId> {
        self.stack.last().copied()
    }
}

impl Iterator for HierarchicIter<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let top = self.stack.pop()?;
        let rec = &self.mesh.elements[top.index()];
        if rec.level() < self.max_level && !rec.is_leaf() {
            self.stack.extend_from_slice(rec.children());
        }
        Some(top)
    }
}

impl PartialEq for HierarchicIter<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.mesh, other.mesh) && self.current() == other.current()
    }
}

impl Mesh {
    /// Descendants of `element` with level at most `max_level`.
    pub fn descendants(
        &self,
        element: ElementId,
        max_level: usize,
    ) -> Result<HierarchicIter<'_>, MeshError> {
        HierarchicIter::new(self, element, max_level)
    }
}
