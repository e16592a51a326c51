//! Intersections between an element and its neighbors.
//!
//! An [`Intersection`] is one edge (or part of an edge) of a center element
//! together with the element on the other side, if any. Two searches
//! produce them:
//! - [`LevelIntersectionIter`]: neighbors on the center's own level,
//! - [`LeafIntersectionIter`]: neighbors in the leaf view, across levels.
//!
//! Edges shared by more than two elements yield one intersection per
//! neighbor. An edge with no candidate neighbor yields a single intersection
//! without an outside element.

mod leaf;
mod level;

pub use leaf::LeafIntersectionIter;
pub use level::LevelIntersectionIter;

use crate::geometry::metrics::{scale, segment_outer_normal};
use crate::geometry::{LocalSegmentGeometry, Position, SegmentGeometry};
use crate::mesh_error::MeshError;
use crate::topology::id::{EdgeId, ElementId};
use crate::topology::mesh::Mesh;
use once_cell::unsync::OnceCell;

/// Geometry derived from an intersection, built on first access.
#[derive(Clone, Debug)]
struct IntersectionGeometry {
    global: SegmentGeometry,
    in_inside: LocalSegmentGeometry,
    in_outside: Option<LocalSegmentGeometry>,
    unit_outer_normal: Position,
}

/// One element side seen from a center element.
#[derive(Clone, Debug)]
pub struct Intersection<'m> {
    mesh: &'m Mesh,
    inside: ElementId,
    outside: Option<ElementId>,
    index_in_inside: usize,
    edge: EdgeId,
    geometry: OnceCell<IntersectionGeometry>,
}

impl<'m> Intersection<'m> {
    pub(crate) fn new(
        mesh: &'m Mesh,
        inside: ElementId,
        index_in_inside: usize,
        edge: EdgeId,
        outside: Option<ElementId>,
    ) -> Self {
        Self {
            mesh,
            inside,
            outside,
            index_in_inside,
            edge,
            geometry: OnceCell::new(),
        }
    }

    /// The center element.
    #[inline]
    pub fn inside(&self) -> ElementId {
        self.inside
    }

    /// The element on the other side, `None` for a boundary intersection.
    #[inline]
    pub fn outside(&self) -> Option<ElementId> {
        self.outside
    }

    /// The edge this intersection lies on. In the leaf view this may be a
    /// half of an edge of the center element.
    #[inline]
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    #[inline]
    pub fn boundary(&self) -> bool {
        self.outside.is_none()
    }

    #[inline]
    pub fn neighbor(&self) -> bool {
        self.outside.is_some()
    }

    /// Segment id of the domain boundary, if the edge is part of it.
    pub fn boundary_id(&self) -> Option<usize> {
        self.mesh.edges[self.edge.index()].boundary_id
    }

    /// `true` if the intersection covers a whole edge of both elements, which
    /// then live on the same level. Boundary intersections covering a whole
    /// edge of the center are conforming too.
    pub fn conforming(&self) -> bool {
        let inside = &self.mesh.elements[self.inside.index()];
        if inside.edges[self.index_in_inside] != self.edge {
            return false;
        }
        match self.outside {
            None => true,
            Some(out) => {
                let outside = &self.mesh.elements[out.index()];
                outside.level() == inside.level() && outside.edge_slot(self.edge).is_some()
            }
        }
    }

    /// Local edge number in the center element.
    #[inline]
    pub fn index_in_inside(&self) -> usize {
        self.index_in_inside
    }

    /// Local number of the edge (or its coarser ancestor) in the outside element.
    pub fn index_in_outside(&self) -> Option<usize> {
        let out = self.outside?;
        self.mesh.slot_of_edge_or_ancestor(out, self.edge)
    }

    fn cache(&self) -> Result<&IntersectionGeometry, MeshError> {
        self.geometry.get_or_try_init(|| {
            let mesh = self.mesh;
            let global = mesh.edge_geometry(self.edge)?;
            let [a, b] = *global.corners();

            let inside_geo = mesh.element_geometry(self.inside)?;
            let in_inside = LocalSegmentGeometry::new([inside_geo.local(a)?, inside_geo.local(b)?]);
            let in_outside = match self.outside {
                Some(out) => {
                    let geo = mesh.element_geometry(out)?;
                    Some(LocalSegmentGeometry::new([geo.local(a)?, geo.local(b)?]))
                }
                None => None,
            };
            let unit_outer_normal =
                segment_outer_normal([a, b], inside_geo.center(), inside_geo.unit_normal()?)?;

            Ok(IntersectionGeometry {
                global,
                in_inside,
                in_outside,
                unit_outer_normal,
            })
        })
    }

    /// The intersection segment in ambient space.
    pub fn geometry(&self) -> Result<SegmentGeometry, MeshError> {
        Ok(self.cache()?.global.clone())
    }

    /// The segment in the reference frame of the center element.
    pub fn geometry_in_inside(&self) -> Result<LocalSegmentGeometry, MeshError> {
        Ok(self.cache()?.in_inside.clone())
    }

    /// The segment in the reference frame of the outside element, `None` on
    /// the boundary.
    pub fn geometry_in_outside(&self) -> Result<Option<LocalSegmentGeometry>, MeshError> {
        Ok(self.cache()?.in_outside.clone())
    }

    /// Outer normal at local coordinate `xi`, scaled by the segment's
    /// integration element. The map is affine, so it is constant.
    pub fn outer_normal(&self, xi: f64) -> Result<Position, MeshError> {
        self.integration_outer_normal(xi)
    }

    /// Outer normal scaled by the integration element.
    pub fn integration_outer_normal(&self, _xi: f64) -> Result<Position, MeshError> {
        let cache = self.cache()?;
        Ok(scale(
            cache.unit_outer_normal,
            cache.global.integration_element(),
        ))
    }

    pub fn unit_outer_normal(&self, _xi: f64) -> Result<Position, MeshError> {
        Ok(self.cache()?.unit_outer_normal)
    }

    /// Unit outer normal at the segment center.
    pub fn center_unit_outer_normal(&self) -> Result<Position, MeshError> {
        self.unit_outer_normal(0.5)
    }
}
